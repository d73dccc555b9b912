//! Macro-generated contract suite for `DocumentStore` implementations.
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
//! document_store_tests!(InMemoryDocumentStore::new());
//! ```
//!
//! `$factory` is re-evaluated for each test and must yield an empty store.

#[macro_export]
macro_rules! document_store_tests {
    ($factory:expr) => {
        mod document_store_contract_tests {
            use super::*;
            use devcamper::core::filter::{Condition, Filter, FilterOp};
            use devcamper::core::query::{Projection, SortSpec};
            use devcamper::core::store::{AverageAggregation, DocumentStore, FindQuery, Populate};
            use serde_json::{Map, Value, json};
            use uuid::Uuid;

            async fn seeded_bootcamps(store: &impl DocumentStore) -> Vec<Value> {
                let mut docs = Vec::new();
                for (name, cost, housing) in [
                    ("Devworks", Some(10000.0), true),
                    ("ModernTech", Some(8000.0), false),
                    ("Codemasters", Some(12000.0), true),
                    ("Devcentral", None, false),
                ] {
                    let doc = bootcamp_doc(name, cost, housing);
                    docs.push(store.insert(BOOTCAMPS, doc).await.unwrap());
                }
                docs
            }

            fn names(documents: &[Value]) -> Vec<&str> {
                documents
                    .iter()
                    .map(|d| d["name"].as_str().unwrap_or_default())
                    .collect()
            }

            // ==============================================================
            // By id
            // ==============================================================

            #[tokio::test]
            async fn test_insert_and_find_by_id() {
                let store = $factory;
                let doc = bootcamp_doc("Devworks", Some(10000.0), true);
                let id = id_of(&doc);

                store.insert(BOOTCAMPS, doc.clone()).await.unwrap();

                let found = store.find_by_id(BOOTCAMPS, &id).await.unwrap().unwrap();
                assert_eq!(found["id"], doc["id"]);
                assert_eq!(found["name"], "Devworks");
                assert_eq!(found["housing"], true);
                assert_eq!(found["careers"], json!(["Web Development"]));
            }

            #[tokio::test]
            async fn test_find_by_id_missing() {
                let store = $factory;
                let found = store.find_by_id(BOOTCAMPS, &Uuid::new_v4()).await.unwrap();
                assert!(found.is_none());
            }

            #[tokio::test]
            async fn test_insert_duplicate_id_fails() {
                let store = $factory;
                let doc = bootcamp_doc("Devworks", None, false);
                store.insert(BOOTCAMPS, doc.clone()).await.unwrap();
                assert!(store.insert(BOOTCAMPS, doc).await.is_err());
            }

            #[tokio::test]
            async fn test_update_by_id_sets_fields() {
                let store = $factory;
                let doc = store
                    .insert(BOOTCAMPS, bootcamp_doc("Devworks", None, false))
                    .await
                    .unwrap();
                let id = id_of(&doc);

                let mut changes = Map::new();
                changes.insert("averageCost".into(), json!(9500.0));
                changes.insert("id".into(), json!(Uuid::new_v4().to_string()));
                let updated = store
                    .update_by_id(BOOTCAMPS, &id, changes)
                    .await
                    .unwrap()
                    .unwrap();

                assert_eq!(updated["id"], doc["id"]);
                assert_eq!(updated["averageCost"], 9500.0);
                assert_eq!(updated["name"], "Devworks");
            }

            #[tokio::test]
            async fn test_update_by_id_missing() {
                let store = $factory;
                let mut changes = Map::new();
                changes.insert("name".into(), json!("Nowhere"));
                let updated = store
                    .update_by_id(BOOTCAMPS, &Uuid::new_v4(), changes)
                    .await
                    .unwrap();
                assert!(updated.is_none());
            }

            #[tokio::test]
            async fn test_delete_by_id() {
                let store = $factory;
                let doc = store
                    .insert(BOOTCAMPS, bootcamp_doc("Devworks", None, false))
                    .await
                    .unwrap();
                let id = id_of(&doc);

                assert!(store.delete_by_id(BOOTCAMPS, &id).await.unwrap());
                assert!(store.find_by_id(BOOTCAMPS, &id).await.unwrap().is_none());
                assert!(!store.delete_by_id(BOOTCAMPS, &id).await.unwrap());
            }

            // ==============================================================
            // Find
            // ==============================================================

            #[tokio::test]
            async fn test_find_unknown_collection_is_empty() {
                let store = $factory;
                let found = store
                    .find("nothing_here", &FindQuery::default())
                    .await
                    .unwrap();
                assert!(found.is_empty());
                assert_eq!(store.count("nothing_here", &Filter::new()).await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_find_boolean_equality() {
                let store = $factory;
                seeded_bootcamps(&store).await;

                let query = FindQuery {
                    filter: Filter::eq("housing", "true"),
                    sort: Some(SortSpec::ascending("name")),
                    ..FindQuery::default()
                };
                let found = store.find(BOOTCAMPS, &query).await.unwrap();
                assert_eq!(names(&found), ["Codemasters", "Devworks"]);
            }

            #[tokio::test]
            async fn test_find_numeric_comparison() {
                let store = $factory;
                seeded_bootcamps(&store).await;

                let query = FindQuery {
                    filter: Filter::new().and(Condition::new("averageCost", FilterOp::Lte, "10000")),
                    sort: Some(SortSpec::ascending("name")),
                    ..FindQuery::default()
                };
                let found = store.find(BOOTCAMPS, &query).await.unwrap();
                assert_eq!(names(&found), ["Devworks", "ModernTech"]);
            }

            #[tokio::test]
            async fn test_find_array_membership() {
                let store = $factory;
                seeded_bootcamps(&store).await;

                let found = store
                    .find(
                        BOOTCAMPS,
                        &FindQuery::new(Filter::eq("careers", "Web Development")),
                    )
                    .await
                    .unwrap();
                assert_eq!(found.len(), 4);

                let found = store
                    .find(BOOTCAMPS, &FindQuery::new(Filter::eq("careers", "Business")))
                    .await
                    .unwrap();
                assert!(found.is_empty());
            }

            #[tokio::test]
            async fn test_find_sort_skip_limit() {
                let store = $factory;
                seeded_bootcamps(&store).await;

                let query = FindQuery {
                    filter: Filter::new().and(Condition::new("averageCost", FilterOp::Gt, "0")),
                    sort: SortSpec::parse("-averageCost"),
                    skip: 1,
                    limit: Some(1),
                    ..FindQuery::default()
                };
                let found = store.find(BOOTCAMPS, &query).await.unwrap();
                assert_eq!(names(&found), ["Devworks"]);
            }

            #[tokio::test]
            async fn test_find_projection_keeps_id() {
                let store = $factory;
                let docs = seeded_bootcamps(&store).await;

                let query = FindQuery {
                    filter: Filter::eq("name", "Devworks"),
                    projection: Some(Projection::from_fields(["name", "housing"])),
                    ..FindQuery::default()
                };
                let found = store.find(BOOTCAMPS, &query).await.unwrap();
                assert_eq!(found.len(), 1);

                let fields = found[0].as_object().unwrap();
                let mut keys: Vec<&str> = fields.keys().map(String::as_str).collect();
                keys.sort();
                assert_eq!(keys, ["housing", "id", "name"]);
                assert_eq!(found[0]["id"], docs[0]["id"]);
            }

            #[tokio::test]
            async fn test_count_with_filter() {
                let store = $factory;
                seeded_bootcamps(&store).await;

                assert_eq!(store.count(BOOTCAMPS, &Filter::new()).await.unwrap(), 4);
                assert_eq!(
                    store
                        .count(BOOTCAMPS, &Filter::eq("housing", "false"))
                        .await
                        .unwrap(),
                    2
                );
            }

            // ==============================================================
            // Populate
            // ==============================================================

            #[tokio::test]
            async fn test_populate_children() {
                let store = $factory;
                let docs = seeded_bootcamps(&store).await;
                store
                    .insert(COURSES, course_doc("Front End", 8000.0, &docs[0]))
                    .await
                    .unwrap();
                store
                    .insert(COURSES, course_doc("Back End", 12000.0, &docs[0]))
                    .await
                    .unwrap();

                let query = FindQuery {
                    filter: Filter::eq("name", "Devworks"),
                    populate: vec![Populate::children("courses", COURSES, "bootcamp")],
                    ..FindQuery::default()
                };
                let found = store.find(BOOTCAMPS, &query).await.unwrap();
                let courses = found[0]["courses"].as_array().unwrap();
                assert_eq!(courses.len(), 2);
                assert!(courses.iter().all(|c| c["bootcamp"] == docs[0]["id"]));

                let query = FindQuery {
                    filter: Filter::eq("name", "ModernTech"),
                    populate: vec![Populate::children("courses", COURSES, "bootcamp")],
                    ..FindQuery::default()
                };
                let found = store.find(BOOTCAMPS, &query).await.unwrap();
                assert_eq!(found[0]["courses"], json!([]));
            }

            #[tokio::test]
            async fn test_populate_parent_with_select() {
                let store = $factory;
                let docs = seeded_bootcamps(&store).await;
                store
                    .insert(COURSES, course_doc("Front End", 8000.0, &docs[1]))
                    .await
                    .unwrap();

                let query = FindQuery {
                    populate: vec![
                        Populate::parent("bootcamp", BOOTCAMPS)
                            .select(Projection::from_fields(["name", "description"])),
                    ],
                    ..FindQuery::default()
                };
                let found = store.find(COURSES, &query).await.unwrap();
                let bootcamp = &found[0]["bootcamp"];
                assert_eq!(bootcamp["id"], docs[1]["id"]);
                assert_eq!(bootcamp["name"], "ModernTech");
                assert_eq!(bootcamp["description"], "ModernTech description");
                assert!(bootcamp.get("housing").is_none());
            }

            #[tokio::test]
            async fn test_populate_parent_missing_is_null() {
                let store = $factory;
                let orphan_parent = bootcamp_doc("Gone", None, false);
                store
                    .insert(COURSES, course_doc("Orphan", 100.0, &orphan_parent))
                    .await
                    .unwrap();

                let query = FindQuery {
                    populate: vec![Populate::parent("bootcamp", BOOTCAMPS)],
                    ..FindQuery::default()
                };
                let found = store.find(COURSES, &query).await.unwrap();
                assert!(found[0]["bootcamp"].is_null());
            }

            // ==============================================================
            // Bulk operations
            // ==============================================================

            #[tokio::test]
            async fn test_delete_many() {
                let store = $factory;
                let docs = seeded_bootcamps(&store).await;
                for title in ["A", "B", "C"] {
                    store
                        .insert(COURSES, course_doc(title, 100.0, &docs[0]))
                        .await
                        .unwrap();
                }
                store
                    .insert(COURSES, course_doc("Other", 100.0, &docs[1]))
                    .await
                    .unwrap();

                let bootcamp_id = docs[0]["id"].as_str().unwrap();
                let removed = store
                    .delete_many(COURSES, &Filter::eq("bootcamp", bootcamp_id))
                    .await
                    .unwrap();
                assert_eq!(removed, 3);
                assert_eq!(store.count(COURSES, &Filter::new()).await.unwrap(), 1);
            }

            #[tokio::test]
            async fn test_aggregate_average() {
                let store = $factory;
                let docs = seeded_bootcamps(&store).await;
                for tuition in [8000.0, 12000.0, 10000.0] {
                    store
                        .insert(COURSES, course_doc("Course", tuition, &docs[0]))
                        .await
                        .unwrap();
                }
                store
                    .insert(COURSES, course_doc("Course", 1.0, &docs[1]))
                    .await
                    .unwrap();

                let bootcamp_id = docs[0]["id"].as_str().unwrap();
                let groups = store
                    .aggregate_average(
                        COURSES,
                        &AverageAggregation {
                            match_filter: Filter::eq("bootcamp", bootcamp_id),
                            group_by: "bootcamp".to_string(),
                            average_of: "tuition".to_string(),
                        },
                    )
                    .await
                    .unwrap();

                assert_eq!(groups.len(), 1);
                assert_eq!(groups[0].key, docs[0]["id"]);
                assert!((groups[0].average - 10000.0).abs() < f64::EPSILON);
            }

            #[tokio::test]
            async fn test_aggregate_average_no_match() {
                let store = $factory;
                let groups = store
                    .aggregate_average(
                        COURSES,
                        &AverageAggregation {
                            match_filter: Filter::eq("bootcamp", Uuid::new_v4().to_string()),
                            group_by: "bootcamp".to_string(),
                            average_of: "tuition".to_string(),
                        },
                    )
                    .await
                    .unwrap();
                assert!(groups.is_empty());
            }
        }
    };
}
