//! Ports module (Hexagonal Architecture)
//!
//! The engine has a single outbound dependency: the backend holding form
//! types and submissions.

pub mod outbound;

pub use outbound::*;
