//! Application startup and lifecycle management.

use crate::config::{BackendConfig, RootMode};
use crate::handlers::{db_time, greeting};
use crate::services::Database;
use axum::{middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state for the database variant.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

/// The handler mounted on `/`. Only one variant is ever live.
#[derive(Clone)]
pub enum Root {
    Greeting,
    Database(Database),
}

impl Root {
    fn mode(&self) -> RootMode {
        match self {
            Root::Greeting => RootMode::Greeting,
            Root::Database(_) => RootMode::Database,
        }
    }
}

pub fn build_router(root: Root) -> Router {
    let router = match root {
        Root::Greeting => Router::new().route("/", get(greeting)),
        Root::Database(db) => Router::new()
            .route("/", get(db_time))
            .with_state(AppState { db }),
    };

    // Route-scoped so unmatched paths never reach the metrics labels
    router
        .route_layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    root: Root,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: BackendConfig) -> Result<Self, AppError> {
        let root = match (config.mode, &config.postgres) {
            (RootMode::Greeting, _) => Root::Greeting,
            (RootMode::Database, Some(pg)) => Root::Database(Database::connect_lazy(pg)),
            (RootMode::Database, None) => {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "database mode requires PostgreSQL settings"
                )));
            }
        };

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, mode = ?root.mode(), "HTTP listener bound");

        Ok(Self {
            port,
            listener,
            root,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.root);

        tracing::info!("Backend API listening at http://localhost:{}", self.port);

        axum::serve(self.listener, router).await.map_err(|e| {
            tracing::error!(error = %e, "HTTP server error");
            std::io::Error::other(format!("HTTP server error: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn greeting_router_serves_root_only() {
        let app = build_router(Root::Greeting);

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn root_only_accepts_get() {
        let response = build_router(Root::Greeting)
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
