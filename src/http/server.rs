//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the submission and health handlers
//! - Serve them on one bound listener, optionally over TLS
//! - Publish the service state (Created → Serving → Draining → Stopped)
//! - Hand shutdown to the lifecycle drain sequence

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

use crate::chain::IssuerNameId;
use crate::config::ShutdownConfig;
use crate::health::{HealthReporter, ServingStatus};
use crate::lifecycle::shutdown::{drain_on_shutdown, filter_shutdown_errors, ServiceState, ShutdownError};
use crate::lifecycle::Shutdown;
use crate::net::Listener;
use crate::observability::metrics;
use crate::publisher::Publisher;

/// Response header carrying the user agent presented to CT logs.
pub const CT_USER_AGENT: HeaderName = HeaderName::from_static("x-ct-user-agent");

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub publisher: Arc<Publisher>,
    pub health: HealthReporter,
}

/// Body of `POST /publisher/v1/chain`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainRequest {
    pub issuer_id: IssuerNameId,
    /// Base64 DER of the certificate being submitted.
    pub leaf: String,
    /// Explicitly selected chain; the issuer's default when absent.
    #[serde(default)]
    pub chain_index: Option<usize>,
}

/// Register the submission and health endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/publisher/v1/chain", post(chain_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// HTTP server for the publisher.
pub struct HttpServer {
    router: Router,
    health: HealthReporter,
    state: Arc<watch::Sender<ServiceState>>,
    tls: Option<RustlsConfig>,
    shutdown_config: ShutdownConfig,
}

impl HttpServer {
    /// Create a server exposing `publisher` and `health`.
    pub fn new(publisher: Arc<Publisher>, health: HealthReporter) -> Self {
        let router = build_router(AppState {
            publisher,
            health: health.clone(),
        });
        Self::from_router(router, health)
    }

    /// Create a server around an already assembled router.
    pub fn from_router(router: Router, health: HealthReporter) -> Self {
        let (state, _) = watch::channel(ServiceState::Created);
        Self {
            router,
            health,
            state: Arc::new(state),
            tls: None,
            shutdown_config: ShutdownConfig::default(),
        }
    }

    pub fn with_tls(mut self, tls: RustlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    pub fn with_shutdown_config(mut self, config: ShutdownConfig) -> Self {
        self.shutdown_config = config;
        self
    }

    /// Observe state transitions.
    pub fn state(&self) -> watch::Receiver<ServiceState> {
        self.state.subscribe()
    }

    /// Serve on `listener` until `shutdown` fires and in-flight requests finish.
    ///
    /// Health and state report Serving only once the listener is accepting.
    pub async fn run(self, listener: Listener, shutdown: Shutdown) -> Result<(), ShutdownError> {
        let HttpServer {
            router,
            health,
            state,
            tls,
            shutdown_config,
        } = self;
        let addr = listener.local_addr();
        let handle = Handle::new();
        let supervisor = Supervisor {
            health,
            state,
            shutdown_config,
            tls: tls.is_some(),
        };

        let app = router.into_make_service();
        let serve: Pin<Box<dyn Future<Output = io::Result<()>> + Send>> = match tls {
            Some(tls) => Box::pin(
                axum_server::tls_rustls::from_tcp_rustls(listener.into_std(), tls)
                    .handle(handle.clone())
                    .serve(app),
            ),
            None => Box::pin(
                axum_server::from_tcp(listener.into_std())
                    .handle(handle.clone())
                    .serve(app),
            ),
        };

        supervisor.supervise(addr, handle, shutdown, serve).await
    }
}

/// Drives the state machine around one serve future.
struct Supervisor {
    health: HealthReporter,
    state: Arc<watch::Sender<ServiceState>>,
    shutdown_config: ShutdownConfig,
    tls: bool,
}

impl Supervisor {
    async fn supervise<F>(
        self,
        addr: SocketAddr,
        handle: Handle,
        shutdown: Shutdown,
        serve: F,
    ) -> Result<(), ShutdownError>
    where
        F: Future<Output = io::Result<()>>,
    {
        let announcer = tokio::spawn(announce_serving(
            handle.clone(),
            self.health.clone(),
            Arc::clone(&self.state),
            self.tls,
        ));
        let drainer = tokio::spawn(drain_on_shutdown(
            shutdown.clone(),
            self.health.clone(),
            Arc::clone(&self.state),
            handle,
            self.shutdown_config,
        ));

        let served = serve.await;
        announcer.abort();

        let stopping = shutdown.is_triggered();
        let drained = if stopping {
            drainer
                .await
                .map_err(|e| ShutdownError::Drain(e.to_string()))
        } else {
            drainer.abort();
            Ok(())
        };

        self.health.shutdown();
        self.state.send_replace(ServiceState::Stopped);

        let result = drained.and(filter_shutdown_errors(served, stopping));
        match &result {
            Ok(()) => tracing::info!(address = %addr, "Publisher stopped"),
            Err(e) => tracing::error!(address = %addr, error = %e, "Publisher stopped with error"),
        }
        result
    }
}

/// Flip to Serving once the listener accepts, unless a stop got there first.
async fn announce_serving(
    handle: Handle,
    health: HealthReporter,
    state: Arc<watch::Sender<ServiceState>>,
    tls: bool,
) {
    let Some(addr) = handle.listening().await else {
        return;
    };

    health.set_serving();
    let entered = state.send_if_modified(|current| {
        if *current == ServiceState::Created {
            *current = ServiceState::Serving;
            true
        } else {
            false
        }
    });
    if entered {
        tracing::info!(address = %addr, tls, "Publisher serving");
    }
}

async fn health_handler(State(state): State<AppState>) -> Response {
    let status = state.health.status();
    let code = match status {
        ServingStatus::Serving => StatusCode::OK,
        ServingStatus::NotServing => StatusCode::SERVICE_UNAVAILABLE,
    };
    (code, Json(serde_json::json!({ "status": status }))).into_response()
}

async fn chain_handler(
    State(state): State<AppState>,
    Json(request): Json<ChainRequest>,
) -> Response {
    let leaf = match STANDARD.decode(request.leaf.as_bytes()) {
        Ok(leaf) if !leaf.is_empty() => leaf,
        Ok(_) => return bad_request("leaf certificate is empty".to_string()),
        Err(e) => return bad_request(format!("leaf is not valid base64: {e}")),
    };

    match state
        .publisher
        .add_chain_request(&leaf, request.issuer_id, request.chain_index)
    {
        Ok(body) => {
            metrics::record_chain_request("ok");
            tracing::debug!(
                issuer_id = %request.issuer_id,
                chain_len = body.chain.len(),
                "Built submission chain"
            );
            let mut response = Json(body).into_response();
            if let Ok(ua) = HeaderValue::from_str(state.publisher.user_agent()) {
                response.headers_mut().insert(CT_USER_AGENT, ua);
            }
            response
        }
        Err(e) => {
            metrics::record_chain_request("unknown_chain");
            tracing::warn!(issuer_id = %request.issuer_id, error = %e, "No chain for submission");
            error_response(StatusCode::NOT_FOUND, e.to_string())
        }
    }
}

fn bad_request(message: String) -> Response {
    metrics::record_chain_request("bad_request");
    error_response(StatusCode::BAD_REQUEST, message)
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
