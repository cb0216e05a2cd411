// Freehub - Command-line marketplace client

use std::process;

use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use freehub_app::cli::Cli;
use freehub_app::Freehub;
use freehub_common::{ClientConfig, ScreenScope};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let app = Freehub::from_config(config).map_err(|e| {
        error!("Failed to create client: {}", e);
        e
    })?;

    let scope = ScreenScope::new();
    let interrupt_scope = scope.clone();
    tokio::spawn(async move {
        interrupt_signal().await;
        interrupt_scope.teardown();
    });

    if let Err(e) = cli.run(&app, &scope).await {
        error!(code = e.error_code(), "{}", e);
        eprintln!("error: {}", e.user_message());
        if let Some(route) = e.fallback_route() {
            eprintln!("next: {}", route);
        }
        process::exit(1);
    }

    Ok(())
}

async fn interrupt_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, discarding the pending response");
        },
        _ = terminate => {
            info!("Received terminate signal, discarding the pending response");
        },
    }
}
