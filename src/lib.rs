//! Derives a printable invoice from a hand-edited JSON configuration.
//!
//! [`invoice::assemble`] turns a [`model::Configuration`] into a
//! [`invoice::ResolvedInvoice`]: dates resolved, `%dateRange%` titles expanded,
//! period quantities computed from business days, totals summed. The rest of
//! the crate stores the configuration, runs the edit loop and renders output.

pub mod dates;
pub mod error;
pub mod invoice;
pub mod line_item;
pub mod model;
pub mod money;
pub mod render;
pub mod session;
pub mod settings;
pub mod store;

pub use error::{Error, Result};
pub use invoice::{ResolvedInvoice, assemble};
pub use model::Configuration;
