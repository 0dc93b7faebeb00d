mod api;
mod app_config;
mod cli;
mod db;
mod router;
mod session;
mod state;

use tracing::info;

async fn serve(config: study_core::Config) -> anyhow::Result<()> {
    config.log_summary();
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let port = config.server.port;

    let state = app_config::build_state(config).await?;
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://localhost:{}", port);
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = app_config::load_config();
    let args: Vec<String> = std::env::args().collect();

    if cli::dispatch(&config, &args)? {
        return Ok(());
    }
    serve(config).await
}
