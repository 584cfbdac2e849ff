use crate::auth::JwtConfig;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/paddock | working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | DATABASE_PATH | <WORK_DIR>/paddock.db | SQLite database file |
/// | PIN_PEPPER | (dev default) | server-side pepper for PIN hashing |
/// | JWT_SECRET | (random per start) | JWT signing secret |
/// | JWT_EXPIRATION_MINUTES | 1440 | token lifetime |
/// | ENVIRONMENT | development | development \| staging \| production |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/paddock HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// SQLite database file path
    pub database_path: String,
    /// Server-side pepper mixed into PIN digests
    pub pin_pepper: String,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/paddock".into());
        let database_path = std::env::var("DATABASE_PATH")
            .unwrap_or_else(|_| format!("{work_dir}/paddock.db"));

        let mut jwt = JwtConfig::default();
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            jwt.secret = secret;
        }
        if let Some(minutes) = std::env::var("JWT_EXPIRATION_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            jwt.expiration_minutes = minutes;
        }

        Self {
            work_dir,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path,
            pin_pepper: std::env::var("PIN_PEPPER")
                .unwrap_or_else(|_| "paddock-dev-pepper".into()),
            jwt,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the paths and port, keeping everything else from the
    /// environment. Used by tests.
    pub fn with_overrides(
        work_dir: impl Into<String>,
        database_path: impl Into<String>,
        http_port: u16,
    ) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.database_path = database_path.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
