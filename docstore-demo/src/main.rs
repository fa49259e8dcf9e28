//! Docstore Demo Entry Point
//!
//! Indexes a sample item into the configured document store, reads it back,
//! searches for it and optionally cleans up.

use docstore_demo::{Demo, DemoConfig, DemoError};
use dotenv::dotenv;
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), DemoError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("docstore_demo=info,docstore_repository=info"));

    let json_output = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| DemoError::config(format!("Failed to initialize tracing: {}", e)))?;

        info!(
            service_name = "docstore-demo",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| DemoError::config(format!("Failed to initialize tracing: {}", e)))?;

        info!(
            service_name = "docstore-demo",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), DemoError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    info!("Starting docstore demo");

    let demo = match DemoConfig::from_env().and_then(Demo::connect) {
        Ok(demo) => demo,
        Err(e) => {
            error!(error = %e, "Failed to initialize demo");
            return Err(e);
        }
    };

    match demo.run().await {
        Ok(()) => {
            info!("Demo completed successfully");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Demo failed");
            Err(e)
        }
    }
}
