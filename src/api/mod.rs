//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements the REST API for the story generator using Axum.
// A single POST endpoint turns a topic/style/length request into a story.
//
// | Component      | Description                                                |
// |----------------|------------------------------------------------------------|
// | API            | Main API structure coordinating routes and middleware      |
// | Routes         | Handler functions for API endpoints                        |
// | States         | Shared application state                                   |
// | DTOs           | Data transfer objects for API requests/responses           |
//
//--------------------------------------------------------------------------------------------------
// STRUCTS
//--------------------------------------------------------------------------------------------------
// | Name           | Description                                       | Key Methods       |
// |----------------|---------------------------------------------------|-------------------|
// | AppState       | Shared application state                          | new               |
// | Api            | Main API structure                                | routes, serve     |
//--------------------------------------------------------------------------------------------------
// FUNCTIONS
//--------------------------------------------------------------------------------------------------
// | Name           | Description                                       | Return Type       |
// |----------------|---------------------------------------------------|-------------------|
// | app            | Story router for runtimes that own the listener   | Router            |
//--------------------------------------------------------------------------------------------------

mod dto;
mod error;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Extension, Router,
    body::Body,
    http::{HeaderName, Method, Request, header},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::story::StoryGenerator;

pub use dto::*;
pub use error::{ApiError, ApiResult};

/// Header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shared application state accessible by all handlers
pub struct AppState {
    /// Story flow backed by the configured model provider
    pub generator: StoryGenerator,
}

impl AppState {
    pub fn new(generator: StoryGenerator) -> Self {
        Self { generator }
    }
}

/// Main API structure
pub struct Api {
    /// API address
    addr: SocketAddr,
    /// Shared application state
    state: Arc<AppState>,
}

impl Api {
    /// Creates a new API instance
    pub fn new(addr: SocketAddr, generator: StoryGenerator) -> Self {
        let state = Arc::new(AppState::new(generator));
        Self { addr, state }
    }

    /// Creates all routes for the API
    pub fn routes(&self) -> Router {
        router(self.state.clone())
    }

    /// Starts the API server and runs until ctrl-c
    pub async fn serve(self) -> anyhow::Result<()> {
        let app = self.routes();

        let listener = TcpListener::bind(self.addr).await?;
        info!(
            addr = %listener.local_addr()?,
            provider = self.state.generator.provider(),
            "API listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API stopped");
        Ok(())
    }
}

/// Builds the story router without binding a listener, for runtimes that
/// drive the service themselves such as AWS Lambda.
pub fn app(generator: StoryGenerator) -> Router {
    router(Arc::new(AppState::new(generator)))
}

fn router(state: Arc<AppState>) -> Router {
    // Any origin may call the endpoint; preflights are answered here.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
            let request_id = req
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                request_id = %request_id,
            )
        }))
        .layer(PropagateRequestIdLayer::new(request_id))
        .layer(cors);

    Router::new()
        // Health check
        .route("/health", get(routes::health))
        // Story generation
        .route("/", post(routes::generate_story))
        .route("/story", post(routes::generate_story))
        // Attach application state
        .layer(Extension(state))
        .layer(middleware)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
