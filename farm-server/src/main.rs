use farm_server::{Config, Server, ServerState, print_banner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    if config.is_production() {
        let log_dir = format!("{}/logs", config.work_dir);
        std::fs::create_dir_all(&log_dir)?;
        farm_server::init_logger_with_file(None, Some(&log_dir));
    } else {
        farm_server::init_logger();
    }

    print_banner();
    tracing::info!("Paddock farm server starting...");

    let state = ServerState::initialize(&config).await?;
    let server = Server::with_state(state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {e}");
        return Err(e.into());
    }

    Ok(())
}
