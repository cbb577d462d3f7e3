//! Backend startup

use crate::Result;
use crate::config::Settings;
use prescripto_http::{ApiRouters, HttpServer};
use std::future::Future;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Bind the configured address and serve until `shutdown` resolves
///
/// # Errors
///
/// Returns an error if the server cannot be assembled, bound or run
pub async fn run<F>(settings: Settings, api: ApiRouters, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let server = HttpServer::new(settings.server.clone(), api)?;
    let listener = server.bind().await?;
    serve(settings, server, listener, shutdown).await
}

/// Serve on an already bound listener
///
/// # Errors
///
/// Returns an error if the server fails while running
pub async fn serve<F>(
    settings: Settings,
    server: HttpServer,
    listener: TcpListener,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    log_collaborators(&settings);
    server.serve(listener, shutdown).await?;
    Ok(())
}

/// Report which external services the deployment has credentials for
fn log_collaborators(settings: &Settings) {
    if settings.database.uri.is_some() {
        info!("Database connection string configured");
    } else {
        warn!("MONGODB_URI not set; database-backed routes are unavailable");
    }

    if settings.cloudinary.is_configured() {
        info!("Image hosting configured");
    } else {
        warn!("CLOUDINARY_* not fully set; image uploads are unavailable");
    }
}
