//! Entity descriptor for Course

use super::handlers::{
    CourseAppState, create_course, delete_course, get_course, list_bootcamp_courses,
    list_courses, update_course,
};
use super::service::CourseService;
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::ServerHost;
use axum::{Router, routing::get};

/// Descriptor for the Course entity
///
/// Courses are also reachable below their bootcamp
/// (`/api/v1/bootcamps/{id}/courses`).
pub struct CourseDescriptor;

impl EntityDescriptor for CourseDescriptor {
    fn entity_type(&self) -> &str {
        "course"
    }

    fn plural(&self) -> &str {
        "courses"
    }

    fn build_routes(&self, host: &ServerHost) -> Router {
        let state = CourseAppState {
            service: CourseService::new(host.store.clone(), host.config.listing.clone()),
        };

        Router::new()
            .route("/api/v1/courses", get(list_courses))
            .route(
                "/api/v1/courses/{id}",
                get(get_course).put(update_course).delete(delete_course),
            )
            .route(
                "/api/v1/bootcamps/{id}/courses",
                get(list_bootcamp_courses).post(create_course),
            )
            .with_state(state)
    }
}
