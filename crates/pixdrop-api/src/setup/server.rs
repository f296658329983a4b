//! Server startup and graceful shutdown

use anyhow::{Context, Result};
use axum::Router;
use pixdrop_core::Config;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// A bound listener plus the router it will serve
pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    /// Bind `0.0.0.0:<port>`. Port 0 picks an ephemeral port; see [`Server::local_addr`].
    pub async fn bind(config: &Config, router: Router) -> Result<Self> {
        let addr = format!("0.0.0.0:{}", config.server_port());
        tracing::info!(addr = %addr, "Starting server");

        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        tracing::info!(
            addr = %listener.local_addr()?,
            max_upload_mb = config.max_file_size_bytes() / 1024 / 1024,
            max_dimension = config.max_dimension(),
            output_format = %config.output_format(),
            storage_dir = %config.storage_dir().display(),
            "Server ready and accepting connections"
        );

        Ok(Self { listener, router })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until Ctrl+C or SIGTERM, then drain in-flight requests
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(shutdown_signal()).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

/// Signal handler for graceful shutdown
///
/// Listens for Ctrl+C (SIGINT) and SIGTERM signals to initiate graceful shutdown.
/// A handler that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
