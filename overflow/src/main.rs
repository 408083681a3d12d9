//! Overflow Main Entry Point
//!
//! Serves the Q&A HTTP API: questions, answers and comments with up/down votes.

use dotenv::dotenv;
use overflow::config::{LogFormat, create_cors_layer};
use overflow::{Dependencies, ServerError, Settings, server};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging.
fn init_tracing(format: LogFormat) -> Result<(), ServerError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("overflow=info,tower_http=info"));

    let initialized = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init(),
    };
    initialized.map_err(|e| ServerError::Tracing(e.to_string()))?;

    info!(
        service_name = "overflow",
        service_version = env!("CARGO_PKG_VERSION"),
        log_format = ?format,
        "Tracing initialized"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // Load environment variables from .env file
    dotenv().ok();

    let settings = Settings::from_env()?;
    init_tracing(settings.log_format)?;

    info!(store = ?settings.store, addr = %settings.addr(), "Starting overflow");

    let deps = match Dependencies::new(&settings).await {
        Ok(deps) => deps,
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let cors = create_cors_layer(&settings.cors_origins)?;
    let app = server::create_app(deps.state, cors);

    if let Err(e) = server::run_server(app, settings.addr()).await {
        error!(error = %e, "Server failed");
        return Err(e);
    }
    Ok(())
}
