//! Health endpoints: liveness and readiness probes for orchestrators.
//!
//! Readiness needs both the startup flag and a successful storage ping
//! within [`READINESS_PING_TIMEOUT`]; liveness only reflects the drain flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use actix_web::{HttpResponse, get, http::header, web};
use tracing::warn;

use crate::domain::ports::HealthProbe;

/// Upper bound on the readiness ping.
pub const READINESS_PING_TIMEOUT: Duration = Duration::from_secs(1);

/// Shared readiness and liveness state.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
    probe: Arc<dyn HealthProbe>,
}

impl HealthState {
    /// Start not ready but live.
    pub fn new(probe: Arc<dyn HealthProbe>) -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
            probe,
        }
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness so orchestrators stop routing during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    async fn storage_reachable(&self) -> bool {
        match tokio::time::timeout(READINESS_PING_TIMEOUT, self.probe.ping()).await {
            Ok(Ok(())) => true,
            Ok(Err(error)) => {
                warn!(%error, "readiness ping failed");
                false
            }
            Err(_) => {
                warn!(
                    timeout_ms = READINESS_PING_TIMEOUT.as_millis(),
                    "readiness ping timed out"
                );
                false
            }
        }
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };
        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Readiness probe: 200 once started and storage answers, 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is starting or storage is unreachable")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    let ok = state.is_ready() && state.storage_reachable().await;
    HealthState::probe_response(ok)
}

/// Liveness probe: 200 while alive, 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}
