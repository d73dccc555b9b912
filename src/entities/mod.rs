//! Entities module - the bootcamp directory's resources

pub mod bootcamp;
pub mod course;

pub use bootcamp::{Bootcamp, BootcampDescriptor, BootcampService};
pub use course::{Course, CourseDescriptor, CourseService};
