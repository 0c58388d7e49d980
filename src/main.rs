use dotenvy::dotenv;
use snafu::ResultExt;
use tokio::net::TcpListener;

use videos::api::{create_app, create_router};
use videos::error::{ApplicationError, BindAddressSnafu, ConnectDatabaseSnafu, WebServerSnafu};
use videos::{config, logger};

#[tokio::main]
async fn main() -> Result<(), ApplicationError> {
    dotenv().ok();

    let config = config::load()?;

    let _guard = logger::init(&config)?;

    let app = create_app(&config.database)
        .await
        .context(ConnectDatabaseSnafu)?;

    let listener = TcpListener::bind(config.host_address)
        .await
        .context(BindAddressSnafu {
            address: config.host_address,
        })?;

    tracing::info!(address = %config.host_address, "serving videos");

    axum::serve(listener, create_router(app))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context(WebServerSnafu)?;

    tracing::info!("server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "cannot listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
}
