//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements the filesystem boundary and wires up services.

pub mod di;
pub mod error;
pub mod traits;

pub use di::ServiceContainer;
pub use error::InfraError;
