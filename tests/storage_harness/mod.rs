//! Shared test harness for document store backends
//!
//! Provides document builders and two macro-generated suites:
//! - `document_store_tests!` checks a `DocumentStore` directly
//! - `api_integration_tests!` drives the REST API on top of a store
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//!
//! document_store_tests!(InMemoryDocumentStore::new());
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod document_store_tests;
#[macro_use]
pub mod api_tests;

use serde_json::{Value, json};
use uuid::Uuid;

pub const BOOTCAMPS: &str = "bootcamps";
pub const COURSES: &str = "courses";

/// Raw bootcamp document as a store holds it
pub fn bootcamp_doc(name: &str, average_cost: Option<f64>, housing: bool) -> Value {
    json!({
        "id": Uuid::new_v4().to_string(),
        "name": name,
        "slug": name.to_lowercase().replace(' ', "-"),
        "description": format!("{name} description"),
        "careers": ["Web Development"],
        "averageCost": average_cost,
        "housing": housing,
    })
}

/// Raw course document referencing a bootcamp
pub fn course_doc(title: &str, tuition: f64, bootcamp: &Value) -> Value {
    json!({
        "id": Uuid::new_v4().to_string(),
        "title": title,
        "tuition": tuition,
        "bootcamp": bootcamp["id"],
    })
}

/// Parse the `id` field of a document
pub fn id_of(document: &Value) -> Uuid {
    Uuid::parse_str(document["id"].as_str().expect("document has an id")).expect("valid uuid")
}

/// Body of a valid `POST /api/v1/bootcamps`
pub fn bootcamp_payload(name: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{name} teaches full stack web development"),
        "website": "https://example.com",
        "phone": "(111) 111-1111",
        "email": "enroll@example.com",
        "address": "233 Bay State Rd Boston MA 02215",
        "careers": ["Web Development", "UI/UX"],
        "housing": true,
        "jobAssistance": true,
    })
}

/// Body of a valid `POST /api/v1/bootcamps/{id}/courses`
pub fn course_payload(title: &str, tuition: f64) -> Value {
    json!({
        "title": title,
        "description": "Learn the fundamentals",
        "weeks": 8,
        "tuition": tuition,
        "minimumSkill": "beginner",
        "scholarshipAvailable": false,
    })
}

/// Minimal PNG signature, enough for an upload body
pub fn png_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.resize(len.max(bytes.len()), 0);
    bytes
}
