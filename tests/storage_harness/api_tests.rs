//! Macro-generated REST suite run against any `DocumentStore`.
//!
//! Builds the full router with `ServerBuilder` and drives it through
//! `axum_test::TestServer`, so the same HTTP behavior is checked for every
//! backend.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use devcamper::storage::InMemoryDocumentStore;
//!
//! api_integration_tests!(InMemoryDocumentStore::new());
//! ```

#[macro_export]
macro_rules! api_integration_tests {
    ($factory:expr) => {
        mod api_contract_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use axum_test::multipart::{MultipartForm, Part};
            use devcamper::config::AppConfig;
            use devcamper::core::store::DocumentStore;
            use devcamper::server::ServerBuilder;
            use serde_json::{Value, json};
            use tempfile::TempDir;
            use uuid::Uuid;

            const MAX_UPLOAD: u64 = 1024;

            struct TestApp {
                server: TestServer,
                uploads: TempDir,
            }

            fn build_app(store: impl DocumentStore + 'static) -> TestApp {
                let uploads = TempDir::new().unwrap();
                let mut config = AppConfig::default();
                config.upload.file_upload_path = uploads.path().to_path_buf();
                config.upload.max_file_upload = MAX_UPLOAD;

                let app = ServerBuilder::new()
                    .with_config(config)
                    .with_store(store)
                    .with_default_entities()
                    .build()
                    .unwrap();

                TestApp {
                    server: TestServer::new(app),
                    uploads,
                }
            }

            async fn create_bootcamp(server: &TestServer, name: &str) -> Value {
                let response = server
                    .post("/api/v1/bootcamps")
                    .json(&bootcamp_payload(name))
                    .await;
                response.assert_status(StatusCode::CREATED);
                response.json::<Value>()["data"].clone()
            }

            async fn create_course(
                server: &TestServer,
                bootcamp: &Value,
                title: &str,
                tuition: f64,
            ) -> Value {
                let url = format!("/api/v1/bootcamps/{}/courses", bootcamp["id"].as_str().unwrap());
                let response = server.post(&url).json(&course_payload(title, tuition)).await;
                response.assert_status(StatusCode::CREATED);
                response.json::<Value>()["data"].clone()
            }

            async fn fetch_bootcamp(server: &TestServer, bootcamp: &Value) -> Value {
                let url = format!("/api/v1/bootcamps/{}", bootcamp["id"].as_str().unwrap());
                let response = server.get(&url).await;
                response.assert_status_ok();
                response.json::<Value>()["data"].clone()
            }

            fn data_names(body: &Value) -> Vec<String> {
                body["data"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|d| d["name"].as_str().unwrap_or_default().to_string())
                    .collect()
            }

            // ==============================================================
            // Health
            // ==============================================================

            #[tokio::test]
            async fn test_health_check() {
                let app = build_app($factory);
                let response = app.server.get("/health").await;
                response.assert_status_ok();

                let body: Value = response.json();
                assert_eq!(body["status"], "ok");
                assert_eq!(body["resources"], json!(["bootcamps", "courses"]));
            }

            // ==============================================================
            // Bootcamps
            // ==============================================================

            #[tokio::test]
            async fn test_create_and_get_bootcamp() {
                let app = build_app($factory);
                let created = create_bootcamp(&app.server, "  Devworks Bootcamp ").await;

                assert_eq!(created["name"], "Devworks Bootcamp");
                assert_eq!(created["slug"], "devworks-bootcamp");
                assert_eq!(created["photo"], "no-photo.jpg");
                assert!(created["averageCost"].is_null());

                let fetched = fetch_bootcamp(&app.server, &created).await;
                assert_eq!(fetched["id"], created["id"]);
                assert_eq!(fetched["careers"], json!(["Web Development", "UI/UX"]));
            }

            #[tokio::test]
            async fn test_create_bootcamp_missing_fields() {
                let app = build_app($factory);
                let response = app
                    .server
                    .post("/api/v1/bootcamps")
                    .json(&json!({ "website": "https://example.com" }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);

                let body: Value = response.json();
                assert_eq!(body["success"], false);
                let error = body["error"].as_str().unwrap();
                assert!(error.contains("Please add a name"));
                assert!(error.contains("Please add a description"));
            }

            #[tokio::test]
            async fn test_create_bootcamp_invalid_fields() {
                let app = build_app($factory);
                let mut payload = bootcamp_payload("Devworks");
                payload["website"] = json!("not a url");
                payload["careers"] = json!(["Astrology"]);

                let response = app.server.post("/api/v1/bootcamps").json(&payload).await;
                response.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(response.json::<Value>()["success"], false);
            }

            #[tokio::test]
            async fn test_create_bootcamp_malformed_json() {
                let app = build_app($factory);
                let response = app
                    .server
                    .post("/api/v1/bootcamps")
                    .content_type("application/json")
                    .bytes("{ not json".into())
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
            }

            #[tokio::test]
            async fn test_get_bootcamp_not_found() {
                let app = build_app($factory);
                let id = Uuid::new_v4();
                let response = app.server.get(&format!("/api/v1/bootcamps/{id}")).await;
                response.assert_status(StatusCode::NOT_FOUND);

                let body: Value = response.json();
                assert_eq!(body["success"], false);
                assert_eq!(body["error"], format!("Resource not found with id of {id}"));
            }

            #[tokio::test]
            async fn test_malformed_id_is_not_found() {
                let app = build_app($factory);
                let response = app.server.get("/api/v1/bootcamps/not-an-id").await;
                response.assert_status(StatusCode::NOT_FOUND);
                assert_eq!(
                    response.json::<Value>()["error"],
                    "Resource not found with id of not-an-id"
                );

                let response = app.server.delete("/api/v1/courses/12345").await;
                response.assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_update_bootcamp() {
                let app = build_app($factory);
                let created = create_bootcamp(&app.server, "Devworks").await;
                let url = format!("/api/v1/bootcamps/{}", created["id"].as_str().unwrap());

                let response = app
                    .server
                    .put(&url)
                    .json(&json!({
                        "name": "Devworks Reloaded",
                        "housing": false,
                        "id": Uuid::new_v4(),
                    }))
                    .await;
                response.assert_status_ok();

                let updated = response.json::<Value>()["data"].clone();
                assert_eq!(updated["id"], created["id"]);
                assert_eq!(updated["name"], "Devworks Reloaded");
                assert_eq!(updated["slug"], "devworks-reloaded");
                assert_eq!(updated["housing"], false);
                assert_eq!(updated["createdAt"], created["createdAt"]);
            }

            #[tokio::test]
            async fn test_update_bootcamp_rejects_invalid_values() {
                let app = build_app($factory);
                let created = create_bootcamp(&app.server, "Devworks").await;
                let url = format!("/api/v1/bootcamps/{}", created["id"].as_str().unwrap());

                let response = app
                    .server
                    .put(&url)
                    .json(&json!({ "averageRating": 42 }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);

                let fetched = fetch_bootcamp(&app.server, &created).await;
                assert_eq!(fetched["name"], "Devworks");
            }

            #[tokio::test]
            async fn test_update_bootcamp_keeps_managed_fields() {
                let app = build_app($factory);
                let bootcamp = create_bootcamp(&app.server, "Devworks").await;
                create_course(&app.server, &bootcamp, "Only", 9000.0).await;
                let url = format!("/api/v1/bootcamps/{}", bootcamp["id"].as_str().unwrap());

                let response = app
                    .server
                    .put(&url)
                    .json(&json!({
                        "averageCost": 1,
                        "photo": "elsewhere.jpg",
                        "housing": false,
                    }))
                    .await;
                response.assert_status_ok();

                let updated = fetch_bootcamp(&app.server, &bootcamp).await;
                assert_eq!(updated["averageCost"], 9000.0);
                assert_eq!(updated["photo"], "no-photo.jpg");
                assert_eq!(updated["housing"], false);
            }

            #[tokio::test]
            async fn test_update_bootcamp_not_found() {
                let app = build_app($factory);
                let response = app
                    .server
                    .put(&format!("/api/v1/bootcamps/{}", Uuid::new_v4()))
                    .json(&json!({ "name": "Ghost" }))
                    .await;
                response.assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_delete_bootcamp_cascades_courses() {
                let app = build_app($factory);
                let doomed = create_bootcamp(&app.server, "Doomed").await;
                let kept = create_bootcamp(&app.server, "Kept").await;
                create_course(&app.server, &doomed, "One", 1000.0).await;
                create_course(&app.server, &doomed, "Two", 2000.0).await;
                create_course(&app.server, &kept, "Three", 3000.0).await;

                let url = format!("/api/v1/bootcamps/{}", doomed["id"].as_str().unwrap());
                let response = app.server.delete(&url).await;
                response.assert_status_ok();
                assert_eq!(response.json::<Value>(), json!({ "success": true, "data": {} }));

                app.server.get(&url).await.assert_status(StatusCode::NOT_FOUND);

                let body: Value = app.server.get("/api/v1/courses").await.json();
                assert_eq!(body["count"], 1);
                assert_eq!(body["data"][0]["title"], "Three");

                app.server.delete(&url).await.assert_status(StatusCode::NOT_FOUND);
            }

            // ==============================================================
            // Listing
            // ==============================================================

            #[tokio::test]
            async fn test_list_envelope_and_default_sort() {
                let app = build_app($factory);
                for name in ["Gamma", "Alpha", "Beta"] {
                    create_bootcamp(&app.server, name).await;
                }

                let response = app.server.get("/api/v1/bootcamps").await;
                response.assert_status_ok();

                let body: Value = response.json();
                assert_eq!(body["success"], true);
                assert_eq!(body["count"], 3);
                assert_eq!(body["pagination"], json!({}));
                assert_eq!(data_names(&body), ["Alpha", "Beta", "Gamma"]);
                assert!(body["data"][0]["courses"].is_array());
            }

            #[tokio::test]
            async fn test_list_pagination_links() {
                let app = build_app($factory);
                for i in 1..=25 {
                    create_bootcamp(&app.server, &format!("Bootcamp {i:02}")).await;
                }

                let body: Value = app
                    .server
                    .get("/api/v1/bootcamps")
                    .add_query_param("page", 2)
                    .add_query_param("limit", 10)
                    .await
                    .json();
                assert_eq!(body["count"], 10);
                assert_eq!(body["pagination"]["prev"], json!({ "page": 1, "limit": 10 }));
                assert_eq!(body["pagination"]["next"], json!({ "page": 3, "limit": 10 }));
                assert_eq!(body["data"][0]["name"], "Bootcamp 11");

                let body: Value = app
                    .server
                    .get("/api/v1/bootcamps")
                    .add_query_param("page", 3)
                    .add_query_param("limit", 10)
                    .await
                    .json();
                assert_eq!(body["count"], 5);
                assert!(body["pagination"].get("next").is_none());
                assert_eq!(body["pagination"]["prev"], json!({ "page": 2, "limit": 10 }));
            }

            #[tokio::test]
            async fn test_list_junk_pagination_falls_back() {
                let app = build_app($factory);
                for name in ["Alpha", "Beta"] {
                    create_bootcamp(&app.server, name).await;
                }

                let response = app
                    .server
                    .get("/api/v1/bootcamps")
                    .add_query_param("page", "abc")
                    .add_query_param("limit", "-4")
                    .await;
                response.assert_status_ok();

                let body: Value = response.json();
                assert_eq!(body["count"], 2);
                assert_eq!(body["pagination"], json!({}));
            }

            #[tokio::test]
            async fn test_list_huge_page_is_empty() {
                let app = build_app($factory);
                create_bootcamp(&app.server, "Alpha").await;

                let response = app
                    .server
                    .get("/api/v1/bootcamps")
                    .add_query_param("page", usize::MAX.to_string())
                    .add_query_param("limit", 10)
                    .await;
                response.assert_status_ok();

                let body: Value = response.json();
                assert_eq!(body["count"], 0);
                assert!(body["pagination"].get("next").is_none());
                assert_eq!(body["pagination"]["prev"]["limit"], 10);
            }

            #[tokio::test]
            async fn test_list_select_and_sort() {
                let app = build_app($factory);
                for name in ["Alpha", "Gamma", "Beta"] {
                    create_bootcamp(&app.server, name).await;
                }

                let body: Value = app
                    .server
                    .get("/api/v1/bootcamps")
                    .add_query_param("select", "name,housing")
                    .add_query_param("sort", "-name")
                    .await
                    .json();

                assert_eq!(data_names(&body), ["Gamma", "Beta", "Alpha"]);
                let first = body["data"][0].as_object().unwrap();
                assert!(first.contains_key("id"));
                assert!(first.contains_key("name"));
                assert!(first.contains_key("housing"));
                assert!(!first.contains_key("description"));
                assert!(!first.contains_key("slug"));
            }

            #[tokio::test]
            async fn test_list_operator_filters() {
                let app = build_app($factory);
                let cheap = create_bootcamp(&app.server, "Cheap").await;
                let pricey = create_bootcamp(&app.server, "Pricey").await;
                create_bootcamp(&app.server, "Empty").await;
                create_course(&app.server, &cheap, "Intro", 5000.0).await;
                create_course(&app.server, &pricey, "Advanced", 15000.0).await;

                let body: Value = app
                    .server
                    .get("/api/v1/bootcamps")
                    .add_query_param("averageCost[lte]", 10000)
                    .await
                    .json();
                assert_eq!(data_names(&body), ["Cheap"]);

                let body: Value = app
                    .server
                    .get("/api/v1/bootcamps")
                    .add_query_param("averageCost[gt]", 10000)
                    .await
                    .json();
                assert_eq!(data_names(&body), ["Pricey"]);

                let body: Value = app
                    .server
                    .get("/api/v1/courses")
                    .add_query_param("tuition[gte]", 5000)
                    .add_query_param("sort", "tuition")
                    .await
                    .json();
                assert_eq!(body["count"], 2);
                assert_eq!(body["data"][0]["title"], "Intro");
            }

            #[tokio::test]
            async fn test_list_equality_and_in_filters() {
                let app = build_app($factory);
                create_bootcamp(&app.server, "Web Only").await;
                let mut payload = bootcamp_payload("Data Camp");
                payload["careers"] = json!(["Data Science"]);
                payload["housing"] = json!(false);
                app.server
                    .post("/api/v1/bootcamps")
                    .json(&payload)
                    .await
                    .assert_status(StatusCode::CREATED);

                let body: Value = app
                    .server
                    .get("/api/v1/bootcamps")
                    .add_query_param("housing", "false")
                    .await
                    .json();
                assert_eq!(data_names(&body), ["Data Camp"]);

                let body: Value = app
                    .server
                    .get("/api/v1/bootcamps")
                    .add_query_param("careers[in]", "Data Science,Business")
                    .await
                    .json();
                assert_eq!(data_names(&body), ["Data Camp"]);

                let body: Value = app
                    .server
                    .get("/api/v1/bootcamps?careers=UI/UX&careers=Business")
                    .await
                    .json();
                assert_eq!(data_names(&body), ["Web Only"]);
            }

            // ==============================================================
            // Courses
            // ==============================================================

            #[tokio::test]
            async fn test_course_list_populates_bootcamp_summary() {
                let app = build_app($factory);
                let bootcamp = create_bootcamp(&app.server, "Devworks").await;
                create_course(&app.server, &bootcamp, "Front End", 8000.0).await;

                let body: Value = app.server.get("/api/v1/courses").await.json();
                assert_eq!(body["count"], 1);

                let populated = &body["data"][0]["bootcamp"];
                assert_eq!(populated["id"], bootcamp["id"]);
                assert_eq!(populated["name"], "Devworks");
                assert!(populated["description"].is_string());
                assert!(populated.get("website").is_none());
            }

            #[tokio::test]
            async fn test_courses_for_bootcamp() {
                let app = build_app($factory);
                let first = create_bootcamp(&app.server, "First").await;
                let second = create_bootcamp(&app.server, "Second").await;
                create_course(&app.server, &first, "B Course", 100.0).await;
                create_course(&app.server, &first, "A Course", 200.0).await;
                create_course(&app.server, &second, "Other", 300.0).await;

                let url = format!("/api/v1/bootcamps/{}/courses", first["id"].as_str().unwrap());
                let body: Value = app.server.get(&url).await.json();
                assert_eq!(body["count"], 2);
                assert_eq!(body["data"][0]["title"], "A Course");
                assert_eq!(body["data"][0]["bootcamp"], first["id"]);
            }

            #[tokio::test]
            async fn test_get_course_is_populated() {
                let app = build_app($factory);
                let bootcamp = create_bootcamp(&app.server, "Devworks").await;
                let course = create_course(&app.server, &bootcamp, "Front End", 8000.0).await;
                assert_eq!(course["weeks"], "8");
                assert_eq!(course["minimumSkill"], "beginner");

                let url = format!("/api/v1/courses/{}", course["id"].as_str().unwrap());
                let response = app.server.get(&url).await;
                response.assert_status_ok();

                let data = response.json::<Value>()["data"].clone();
                assert_eq!(data["title"], "Front End");
                assert_eq!(data["bootcamp"]["name"], "Devworks");
            }

            #[tokio::test]
            async fn test_create_course_for_missing_bootcamp() {
                let app = build_app($factory);
                let id = Uuid::new_v4();
                let response = app
                    .server
                    .post(&format!("/api/v1/bootcamps/{id}/courses"))
                    .json(&course_payload("Nowhere", 100.0))
                    .await;
                response.assert_status(StatusCode::NOT_FOUND);
                assert_eq!(
                    response.json::<Value>()["error"],
                    format!("Resource not found with id of {id}")
                );
            }

            #[tokio::test]
            async fn test_create_course_missing_fields() {
                let app = build_app($factory);
                let bootcamp = create_bootcamp(&app.server, "Devworks").await;
                let url = format!("/api/v1/bootcamps/{}/courses", bootcamp["id"].as_str().unwrap());

                let response = app.server.post(&url).json(&json!({ "title": "Half" })).await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let error = response.json::<Value>()["error"].as_str().unwrap().to_string();
                assert!(error.contains("Please add a tuition cost"));
                assert!(error.contains("Please add a minimum skill"));
            }

            #[tokio::test]
            async fn test_update_course_keeps_bootcamp() {
                let app = build_app($factory);
                let bootcamp = create_bootcamp(&app.server, "Devworks").await;
                let course = create_course(&app.server, &bootcamp, "Front End", 8000.0).await;
                let url = format!("/api/v1/courses/{}", course["id"].as_str().unwrap());

                let response = app
                    .server
                    .put(&url)
                    .json(&json!({ "title": "Front End II", "bootcamp": Uuid::new_v4() }))
                    .await;
                response.assert_status_ok();

                let updated = response.json::<Value>()["data"].clone();
                assert_eq!(updated["title"], "Front End II");
                assert_eq!(updated["bootcamp"], bootcamp["id"]);
            }

            // ==============================================================
            // Average cost
            // ==============================================================

            #[tokio::test]
            async fn test_average_cost_follows_courses() {
                let app = build_app($factory);
                let bootcamp = create_bootcamp(&app.server, "Devworks").await;

                let first = create_course(&app.server, &bootcamp, "One", 8000.0).await;
                assert_eq!(fetch_bootcamp(&app.server, &bootcamp).await["averageCost"], 8000.0);

                create_course(&app.server, &bootcamp, "Two", 12000.0).await;
                assert_eq!(fetch_bootcamp(&app.server, &bootcamp).await["averageCost"], 10000.0);

                let url = format!("/api/v1/courses/{}", first["id"].as_str().unwrap());
                app.server
                    .put(&url)
                    .json(&json!({ "tuition": 4000 }))
                    .await
                    .assert_status_ok();
                assert_eq!(fetch_bootcamp(&app.server, &bootcamp).await["averageCost"], 8000.0);

                app.server.delete(&url).await.assert_status_ok();
                assert_eq!(fetch_bootcamp(&app.server, &bootcamp).await["averageCost"], 12000.0);
            }

            #[tokio::test]
            async fn test_average_cost_cleared_without_courses() {
                let app = build_app($factory);
                let bootcamp = create_bootcamp(&app.server, "Devworks").await;
                let course = create_course(&app.server, &bootcamp, "Only", 9000.0).await;

                let url = format!("/api/v1/courses/{}", course["id"].as_str().unwrap());
                app.server.delete(&url).await.assert_status_ok();

                assert!(fetch_bootcamp(&app.server, &bootcamp).await["averageCost"].is_null());
            }

            // ==============================================================
            // Photo upload
            // ==============================================================

            fn photo_url(bootcamp: &Value) -> String {
                format!("/api/v1/bootcamps/{}/photo", bootcamp["id"].as_str().unwrap())
            }

            fn upload_count(app: &TestApp) -> usize {
                std::fs::read_dir(app.uploads.path())
                    .map(|entries| entries.count())
                    .unwrap_or(0)
            }

            #[tokio::test]
            async fn test_photo_upload() {
                let app = build_app($factory);
                let bootcamp = create_bootcamp(&app.server, "Devworks").await;
                let id = bootcamp["id"].as_str().unwrap().to_string();

                let form = MultipartForm::new().add_part(
                    "file",
                    Part::bytes(png_bytes(512))
                        .file_name("campus.png")
                        .mime_type("image/png"),
                );
                let response = app.server.put(&photo_url(&bootcamp)).multipart(form).await;
                response.assert_status_ok();

                let expected = format!("photo_{id}.png");
                assert_eq!(
                    response.json::<Value>(),
                    json!({ "success": true, "data": expected })
                );

                let stored = std::fs::read(app.uploads.path().join(&expected)).unwrap();
                assert_eq!(stored.len(), 512);
                assert_eq!(fetch_bootcamp(&app.server, &bootcamp).await["photo"], expected);
            }

            #[tokio::test]
            async fn test_photo_upload_rejects_non_image() {
                let app = build_app($factory);
                let bootcamp = create_bootcamp(&app.server, "Devworks").await;

                let form = MultipartForm::new().add_part(
                    "file",
                    Part::bytes(b"hello".to_vec())
                        .file_name("notes.txt")
                        .mime_type("text/plain"),
                );
                let response = app.server.put(&photo_url(&bootcamp)).multipart(form).await;
                response.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(
                    response.json::<Value>()["error"],
                    "Uploaded file is not an image"
                );
                assert_eq!(upload_count(&app), 0);
                assert_eq!(fetch_bootcamp(&app.server, &bootcamp).await["photo"], "no-photo.jpg");
            }

            #[tokio::test]
            async fn test_photo_upload_rejects_oversized_file() {
                let app = build_app($factory);
                let bootcamp = create_bootcamp(&app.server, "Devworks").await;

                let form = MultipartForm::new().add_part(
                    "file",
                    Part::bytes(png_bytes(MAX_UPLOAD as usize + 1))
                        .file_name("huge.png")
                        .mime_type("image/png"),
                );
                let response = app.server.put(&photo_url(&bootcamp)).multipart(form).await;
                response.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(
                    response.json::<Value>()["error"],
                    format!("Please upload an image less than {MAX_UPLOAD}")
                );
                assert_eq!(upload_count(&app), 0);
            }

            #[tokio::test]
            async fn test_photo_upload_rejects_far_oversized_file() {
                let app = build_app($factory);
                let bootcamp = create_bootcamp(&app.server, "Devworks").await;

                let form = MultipartForm::new().add_part(
                    "file",
                    Part::bytes(png_bytes(MAX_UPLOAD as usize * 200))
                        .file_name("poster.png")
                        .mime_type("image/png"),
                );
                let response = app.server.put(&photo_url(&bootcamp)).multipart(form).await;
                response.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(
                    response.json::<Value>()["error"],
                    format!("Please upload an image less than {MAX_UPLOAD}")
                );
                assert_eq!(upload_count(&app), 0);

                let form = MultipartForm::new().add_part(
                    "file",
                    Part::bytes(vec![b'a'; MAX_UPLOAD as usize * 200])
                        .file_name("notes.txt")
                        .mime_type("text/plain"),
                );
                let response = app.server.put(&photo_url(&bootcamp)).multipart(form).await;
                response.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(
                    response.json::<Value>()["error"],
                    "Uploaded file is not an image"
                );
                assert_eq!(upload_count(&app), 0);
            }

            #[tokio::test]
            async fn test_photo_upload_at_exact_limit() {
                let app = build_app($factory);
                let bootcamp = create_bootcamp(&app.server, "Devworks").await;

                let form = MultipartForm::new().add_part(
                    "file",
                    Part::bytes(png_bytes(MAX_UPLOAD as usize))
                        .file_name("exact.png")
                        .mime_type("image/png"),
                );
                app.server
                    .put(&photo_url(&bootcamp))
                    .multipart(form)
                    .await
                    .assert_status_ok();
                assert_eq!(upload_count(&app), 1);
            }

            #[tokio::test]
            async fn test_photo_upload_without_file() {
                let app = build_app($factory);
                let bootcamp = create_bootcamp(&app.server, "Devworks").await;

                let form = MultipartForm::new().add_text("caption", "no file here");
                let response = app.server.put(&photo_url(&bootcamp)).multipart(form).await;
                response.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(response.json::<Value>()["error"], "Please upload a file");

                let response = app.server.put(&photo_url(&bootcamp)).json(&json!({})).await;
                response.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(response.json::<Value>()["error"], "Please upload a file");
            }

            #[tokio::test]
            async fn test_photo_upload_unknown_bootcamp() {
                let app = build_app($factory);
                let form = MultipartForm::new().add_part(
                    "file",
                    Part::bytes(png_bytes(64))
                        .file_name("campus.png")
                        .mime_type("image/png"),
                );
                let response = app
                    .server
                    .put(&format!("/api/v1/bootcamps/{}/photo", Uuid::new_v4()))
                    .multipart(form)
                    .await;
                response.assert_status(StatusCode::NOT_FOUND);
                assert_eq!(upload_count(&app), 0);
            }
        }
    };
}
