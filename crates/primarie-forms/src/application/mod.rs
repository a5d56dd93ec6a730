//! Application layer
//!
//! Use cases on top of the wizard and the gateway port.

pub mod dto;
pub mod portal;

pub use dto::SubmissionTracking;
pub use portal::FormsPortal;
