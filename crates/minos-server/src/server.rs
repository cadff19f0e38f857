//! The hyper accept loop.
//!
//! Each connection is served with HTTP/1.1. Bodies are buffered before
//! dispatch, so a [`Request`](minos_core::Request) always carries its full
//! body and handlers never stream.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::router::HttpRoutes;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Type alias for the HTTP response.
pub type HttpResponse = http::Response<Full<Bytes>>;

/// Serves an [`HttpRoutes`] set over TCP.
pub struct Server {
    config: ServerConfig,
    routes: Arc<HttpRoutes>,
}

impl Server {
    /// Creates a server for `routes`.
    #[must_use]
    pub fn new(config: ServerConfig, routes: HttpRoutes) -> Self {
        Self {
            config,
            routes: Arc::new(routes),
        }
    }

    /// The route set being served.
    #[must_use]
    pub fn routes(&self) -> &HttpRoutes {
        &self.routes
    }

    /// Binds `hostname:port` and serves until `shutdown` fires, then waits up
    /// to the shutdown timeout for open connections.
    pub async fn run(self, port: u16, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let listener = TcpListener::bind((self.config.hostname(), port))
            .await
            .map_err(|e| {
                ServerError::Bind(format!("{}:{port}: {e}", self.config.hostname()))
            })?;
        self.serve(listener, shutdown).await
    }

    /// Serves on an already bound listener.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!("Listening on {addr}");

        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote_addr)) => {
                        let routes = Arc::clone(&self.routes);
                        let token = tracker.acquire();
                        let shutdown = shutdown.clone();

                        tokio::spawn(async move {
                            let served =
                                serve_connection(routes, stream, remote_addr, shutdown).await;
                            if let Err(e) = served {
                                tracing::debug!("Connection error from {remote_addr}: {e}");
                            }
                            drop(token);
                        });
                    }
                    Err(e) => tracing::error!("Failed to accept connection: {e}"),
                },
                () = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        let timeout = self.config.shutdown_timeout();
        tokio::select! {
            () = tracker.wait_for_shutdown() => tracing::info!("All connections closed"),
            () = tokio::time::sleep(timeout) => tracing::warn!(
                "Shutdown timeout reached, {} connections still active",
                tracker.active_connections()
            ),
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn serve_connection(
    routes: Arc<HttpRoutes>,
    stream: tokio::net::TcpStream,
    remote_addr: SocketAddr,
    shutdown: ShutdownSignal,
) -> Result<(), hyper::Error> {
    let service = service_fn(move |request: http::Request<Incoming>| {
        let routes = Arc::clone(&routes);
        async move { Ok::<_, Infallible>(handle(&routes, request).await) }
    });

    let connection = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
    tokio::pin!(connection);

    tokio::select! {
        result = connection.as_mut() => result,
        () = shutdown.recv() => {
            connection.as_mut().graceful_shutdown();
            tracing::debug!("Draining connection from {remote_addr}");
            connection.as_mut().await
        }
    }
}

async fn handle(routes: &HttpRoutes, request: http::Request<Incoming>) -> HttpResponse {
    let (parts, body) = request.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            tracing::warn!("Failed to read request body: {e}");
            let mut response = http::Response::new(Full::new(Bytes::from("Bad Request")));
            *response.status_mut() = StatusCode::BAD_REQUEST;
            return response;
        }
    };

    let request = minos_core::Request::from_http(http::Request::from_parts(parts, body));
    routes.handle(request).await.into_http().map(Full::new)
}
