//! Shared types for the Paddock farm server
//!
//! Domain models and small utilities used by the server and any API
//! consumers. Kept free of web-framework types on purpose.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
