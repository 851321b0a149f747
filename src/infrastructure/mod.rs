//! Infrastructure layer module
//!
//! - Configuration management
//! - Logging infrastructure
//! - Structured-output parsing for proposer, verifier and analyzer replies

pub mod config;
pub mod logging;
pub mod validators;
