//! Infrastructure layer
//!
//! Gateway implementations and the built-in form catalogue.

pub mod catalog;
pub mod http;
pub mod memory;

pub use catalog::builtin_form_types;
pub use http::{HttpFormsGateway, HttpGatewayConfig};
pub use memory::InMemoryFormsGateway;
