use std::sync::Arc;

use imovel_core::Config;

use imovel_api::state::AppState;
use imovel_api::{routes, telemetry};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    telemetry::init_telemetry();

    let config = Config::from_env()?;
    let port = config.server_port;

    let state = Arc::new(AppState::new(config).await?);
    let router = routes::build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port = port, "Asset service listening");
    axum::serve(listener, router).await?;

    Ok(())
}
