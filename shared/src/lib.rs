//! Shared types for the table ordering client
//!
//! Domain models, order state types, the error taxonomy, and small
//! utilities used by every screen of the application.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use error::{OrderError, OrderResult};
pub use serde::{Deserialize, Serialize};
