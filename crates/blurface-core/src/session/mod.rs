//! Session domain model.

mod model;

pub use model::{Session, SourceDescriptor, SourceType};
