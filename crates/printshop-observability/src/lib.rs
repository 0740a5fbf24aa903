//! Printshop Observability
//!
//! Structured logging, OpenTelemetry tracing and Prometheus metrics for the
//! Printshop API.
//!
//! Exporters are compiled in with the `observability` feature (on by default)
//! and can be switched off at runtime with `OBSERVABILITY_ENABLED=false`, in
//! which case only console logging is installed.
//!
//! ```no_run
//! use printshop_observability::{init_tracing, shutdown_tracer};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     // ... application code ...
//!     shutdown_tracer().await;
//! }
//! ```

mod basic_logging;
mod request;

#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

pub use basic_logging::init_basic_console_logging;
pub use request::logging_middleware;

#[cfg(feature = "observability")]
pub use self::logging::{init_tracing, shutdown_tracer};
#[cfg(feature = "observability")]
pub use self::metrics::{
    PrometheusHandle, init_metrics, metrics_middleware, render_metrics, track_authorization,
    track_user_registered,
};

use std::sync::OnceLock;

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Reads `OBSERVABILITY_ENABLED` once. Anything but `false`/`0` enables exporters.
pub fn is_observability_enabled() -> bool {
    cfg!(feature = "observability")
        && *OBSERVABILITY_ENABLED.get_or_init(|| {
            std::env::var("OBSERVABILITY_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true)
        })
}

#[cfg(not(feature = "observability"))]
mod stubs {
    use axum::{extract::Request, middleware::Next, response::Response};

    #[derive(Clone, Debug)]
    pub struct PrometheusHandle;

    pub fn init_tracing() {
        super::init_basic_console_logging();
    }

    pub async fn shutdown_tracer() {}

    pub fn init_metrics() -> Option<PrometheusHandle> {
        None
    }

    pub fn render_metrics(_handle: &PrometheusHandle) -> String {
        String::new()
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub fn track_user_registered() {}
    pub fn track_authorization(_allowed: bool, _role: &str) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
