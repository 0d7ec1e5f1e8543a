// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown (the desktop shell kills the backend this way)
// - SIGINT:  Graceful shutdown (Ctrl+C)

/// Resolves once the process is asked to stop
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to register Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to register SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    // Windows fallback - only handles Ctrl+C
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("[SIGNAL] SIGINT received, shutting down"),
        () = terminate => tracing::info!("[SIGNAL] SIGTERM received, shutting down"),
    }
}
