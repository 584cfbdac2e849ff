//! Utility module — common helpers and types
//!
//! - [`AppError`] / [`AppResult`] - application error type and alias
//! - [`logger`] - tracing setup
//! - [`validation`] - input validation predicates

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResult, ErrorBody};
