//! In-process storage adapters.
//!
//! Sessions live only as long as the process. Durable storage plugs in
//! through the same `SessionRepository` port.

pub mod session_repository;

pub use session_repository::InMemorySessionRepository;
