//! Data models
//!
//! Shared between farm-server and API consumers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod cattle;
pub mod ledger;
pub mod livestock;
pub mod module;
pub mod riding;
pub mod site;
pub mod subscription;
pub mod task;
pub mod user;

// Re-exports
pub use cattle::*;
pub use ledger::*;
pub use livestock::*;
pub use module::*;
pub use riding::*;
pub use site::*;
pub use subscription::*;
pub use task::*;
pub use user::*;
