//! Server module for building the HTTP server
//!
//! `ServerBuilder` collects the configuration, the document store and the
//! entity descriptors, then exposes them as a REST router.

pub mod builder;
pub mod entity_registry;
pub mod exposure;
pub mod host;

pub use builder::ServerBuilder;
pub use entity_registry::{EntityDescriptor, EntityRegistry};
pub use exposure::RestExposure;
pub use host::ServerHost;
