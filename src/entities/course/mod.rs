//! Course entity module

pub mod descriptor;
pub mod handlers;
pub mod model;
pub mod service;

pub use descriptor::CourseDescriptor;
pub use model::{Course, CreateCourse, MinimumSkill};
pub use service::CourseService;
