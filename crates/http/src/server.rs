//! Backend composition root

use crate::config::ServerConfig;
use crate::error::Result;
use crate::middleware::{cors_layer, preflight_status_middleware};
use crate::routes::{self, ApiRouters};
use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// HTTP server for the booking API
#[derive(Clone, Debug)]
pub struct HttpServer {
    config: ServerConfig,
    app: Router,
}

impl HttpServer {
    /// Assemble the application: routes, request tracing and CORS
    ///
    /// # Errors
    ///
    /// Returns an error if the CORS policy is invalid
    pub fn new(config: ServerConfig, api: ApiRouters) -> Result<Self> {
        let app = Self::build_app(&config, api)?;
        Ok(Self { config, app })
    }

    /// Build the axum application for a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the CORS policy is invalid
    pub fn build_app(config: &ServerConfig, api: ApiRouters) -> Result<Router> {
        let cors = cors_layer(&config.cors)?;

        Ok(routes::router(api)
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .layer(axum::middleware::from_fn(preflight_status_middleware)))
    }

    /// The assembled application
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind the configured address
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound
    pub async fn bind(&self) -> Result<TcpListener> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        Ok(listener)
    }

    /// Serve on a bound listener until `shutdown` resolves
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails while accepting connections
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let port = listener.local_addr()?.port();
        info!("Server started on PORT:{}", port);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped");
        Ok(())
    }
}
