//! Entity descriptor for Bootcamp

use super::handlers::{
    BootcampAppState, create_bootcamp, delete_bootcamp, get_bootcamp, list_bootcamps,
    update_bootcamp, upload_bootcamp_photo,
};
use super::service::BootcampService;
use crate::core::upload::UploadPolicy;
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::ServerHost;
use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    routing::{get, put},
};

/// Descriptor for the Bootcamp entity
pub struct BootcampDescriptor;

impl EntityDescriptor for BootcampDescriptor {
    fn entity_type(&self) -> &str {
        "bootcamp"
    }

    fn plural(&self) -> &str {
        "bootcamps"
    }

    fn build_routes(&self, host: &ServerHost) -> Router {
        let upload = UploadPolicy::from_config(&host.config.upload);

        let state = BootcampAppState {
            service: BootcampService::new(
                host.store.clone(),
                host.config.listing.clone(),
                upload,
            ),
        };

        Router::new()
            .route(
                "/api/v1/bootcamps",
                get(list_bootcamps).post(create_bootcamp),
            )
            .route(
                "/api/v1/bootcamps/{id}",
                get(get_bootcamp)
                    .put(update_bootcamp)
                    .delete(delete_bootcamp),
            )
            // The upload policy bounds the file while it streams
            .route(
                "/api/v1/bootcamps/{id}/photo",
                put(upload_bootcamp_photo).layer(DefaultBodyLimit::disable()),
            )
            .with_state(state)
    }
}
