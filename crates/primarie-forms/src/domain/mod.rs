//! Domain module
//!
//! Schema engine and submission wizard. Nothing in here performs I/O except
//! through the [`crate::ports::FormsGateway`] handed to the wizard.

pub mod aggregates;
pub mod events;
pub mod services;
pub mod value_objects;

pub use aggregates::*;
pub use events::*;
pub use value_objects::*;
