//! Domain layer for the refinement controller
//!
//! This module contains the core models, the error taxonomy, and the port
//! traits that external collaborators implement.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{DomainError, DomainResult};
