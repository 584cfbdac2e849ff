use crate::api;
use crate::core::ServerState;
use crate::utils::AppError;

/// HTTP server wrapper
pub struct Server {
    state: ServerState,
}

impl Server {
    pub fn with_state(state: ServerState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &ServerState {
        &self.state
    }

    /// Bind and serve until the process is stopped.
    pub async fn run(self) -> Result<(), AppError> {
        let app = api::build_app(self.state.clone());
        let addr = format!("0.0.0.0:{}", self.state.config.http_port);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

        tracing::info!("HTTP server listening on http://{addr}");

        axum::serve(listener, app)
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))
    }
}
