use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Request, State};
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::Method;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use contracts::{
    AgricultureMetrics, ApiError, CityState, DashboardView, EngineConfig, EnvironmentMetrics,
    ErrorCode, ExternalReading, HealthMetrics, ScenarioRequest, ScenarioResult, Stamped,
    TrafficMetrics, SCHEMA_VERSION_V1,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Mutex};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::{ApiStatus, CityApi, FeedConfig, FeedError, OpenMeteoFeed, TickReport};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const STREAM_CAPACITY: usize = 256;

include!("error.rs");
include!("state.rs");
include!("routes/query.rs");
include!("routes/control.rs");
include!("routes/stream.rs");
include!("util.rs");

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub engine: EngineConfig,
    /// `None` keeps the live feed off.
    pub feed: Option<FeedConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 3000))),
            engine: EngineConfig::default(),
            feed: None,
        }
    }
}

pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let listener = TcpListener::bind(config.addr).await?;
    serve_on(listener, config).await
}

/// Serves on an already bound listener; `config.addr` is ignored.
pub async fn serve_on(listener: TcpListener, config: ServerConfig) -> Result<(), ServerError> {
    let state = AppState::new(CityApi::from_config(config.engine.clone()));

    spawn_ticker(state.clone(), tick_period(&config.engine));
    if let Some(feed_config) = config.feed {
        let feed = OpenMeteoFeed::new(feed_config)?;
        info!(
            latitude = feed.config().latitude,
            longitude = feed.config().longitude,
            interval_secs = feed.interval().as_secs(),
            "live feed enabled"
        );
        spawn_feed(state.clone(), feed);
    }

    let app = router(state);
    let local_addr = listener.local_addr()?;
    info!(
        addr = %local_addr,
        tick_ms = config.engine.tick_interval_ms,
        seed = ?config.engine.seed,
        "city api listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/traffic", get(get_traffic))
        .route("/api/environment", get(get_environment))
        .route("/api/health", get(get_health))
        .route("/api/agriculture", get(get_agriculture))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/state", get(get_state))
        .route("/api/status", get(get_status))
        .route("/api/scenario", post(post_scenario))
        .route("/api/realtime", post(post_realtime))
        .route("/api/stream", get(stream_ticks))
        .layer(middleware::from_fn(cors_middleware))
        .with_state(state)
}

async fn cors_middleware(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = Response::new(axum::body::Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}
