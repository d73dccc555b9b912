//! Bootcamp entity module

pub mod descriptor;
pub mod handlers;
pub mod model;
pub mod service;

pub use descriptor::BootcampDescriptor;
pub use model::{Bootcamp, CreateBootcamp};
pub use service::BootcampService;
