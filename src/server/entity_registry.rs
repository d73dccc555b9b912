//! Entity registry for managing entity descriptors and building their routes

use super::host::ServerHost;
use axum::Router;
use std::collections::BTreeMap;

/// Trait that describes how to build routes for an entity
///
/// Each entity (Bootcamp, Course) implements this trait to provide its
/// routes, built from the shared [`ServerHost`].
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (singular, e.g., "bootcamp")
    fn entity_type(&self) -> &str;

    /// The plural form (e.g., "bootcamps")
    fn plural(&self) -> &str;

    /// Build the routes for this entity
    fn build_routes(&self, host: &ServerHost) -> Router;
}

/// Registry for all entities in the application
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity descriptor
    ///
    /// The entity type name is the key; registering a type twice replaces
    /// the earlier descriptor.
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Build a router with all registered entity routes
    pub fn build_routes(&self, host: &ServerHost) -> Router {
        self.descriptors
            .values()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes(host))
            })
    }

    /// Get all registered entity types
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }

    /// Plural resource names, as they appear in URLs
    pub fn resources(&self) -> Vec<&str> {
        self.descriptors.values().map(|d| d.plural()).collect()
    }
}
