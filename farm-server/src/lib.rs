//! Paddock Farm Server
//!
//! Backend for a small farm's day-to-day bookkeeping:
//!
//! - **Egg ledger** (`db::repository::ledger`): append-only production and
//!   disposal movements with a derived, never-stored balance
//! - **Subscriptions** (`subscriptions`): weekly egg pickups and the daily
//!   booking pass
//! - **Access control** (`access`): module visibility rules and the
//!   code-declared module catalog
//! - **Auth** (`auth`): PIN login with JWT sessions
//! - **HTTP API** (`api`): RESTful routes per feature area
//!
//! # Module structure
//!
//! ```text
//! farm-server/src/
//! ├── core/            # config, state, HTTP server
//! ├── auth/            # PIN hashing, JWT, middleware
//! ├── access/          # visibility resolver, module registry
//! ├── subscriptions.rs # booking workflow
//! ├── api/             # routes and handlers
//! ├── db/              # pool, migrations, repositories
//! └── utils/           # errors, logging, validation
//! ```

pub mod access;
pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod subscriptions;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    ____            __    __            __
   / __ \____ _____/ /___/ /___  ______/ /__
  / /_/ / __ `/ __  / __  / __ \/ ___/ //_/
 / ____/ /_/ / /_/ / /_/ / /_/ / /__/ ,<
/_/    \__,_/\__,_/\__,_/\____/\___/_/|_|
    "#
    );
}
