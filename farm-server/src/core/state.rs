use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppError;

/// Shared server state
///
/// Cloned into every handler; all members are cheap to clone (`Arc` or
/// pool handles).
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            pool,
            jwt_service,
        }
    }

    /// Initialize the server state:
    /// 1. open the database (runs migrations),
    /// 2. reconcile the module catalog,
    /// 3. seed the default admin and sites on first run.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.work_dir)
            .map_err(|e| AppError::internal(format!("Failed to create work dir: {e}")))?;

        let db = DbService::new(&config.database_path).await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let state = Self::new(config.clone(), db.pool, jwt_service);

        crate::access::registry::bootstrap(&state.pool, &state.config.pin_pepper).await?;
        crate::access::registry::reconcile(&state.pool).await;

        Ok(state)
    }
}
