//! Server host: the state shared by every exposed entity
//!
//! The host owns the configuration, the document store and the entity
//! registry. Exposures (currently REST) turn it into a router.

use crate::config::AppConfig;
use crate::core::store::DocumentStore;
use crate::server::entity_registry::EntityRegistry;
use std::sync::Arc;

/// Host context containing all application state
///
/// # Example
///
/// ```rust,ignore
/// let host = ServerHost::new(config, Arc::new(InMemoryDocumentStore::new()), registry);
/// let app = RestExposure::build_router(Arc::new(host), vec![])?;
/// ```
pub struct ServerHost {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Backend every repository reads and writes through
    pub store: Arc<dyn DocumentStore>,

    /// Entity registry for CRUD routes
    pub entity_registry: EntityRegistry,
}

impl ServerHost {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn DocumentStore>,
        entity_registry: EntityRegistry,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            entity_registry,
        }
    }

    /// Registered entity types
    pub fn entity_types(&self) -> Vec<&str> {
        self.entity_registry.entity_types()
    }
}
