use opentelemetry::{KeyValue, global, trace::TraceError};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    propagation::TraceContextPropagator,
    runtime,
    trace::{RandomIdGenerator, Sampler, Tracer},
};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{init_basic_console_logging, is_observability_enabled};

const DEFAULT_LOG_DIR: &str = "storage/logs";

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1"))
        .unwrap_or(false)
}

fn init_tracer() -> Result<Tracer, TraceError> {
    let otlp_endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:4317".to_string());

    global::set_text_map_propagator(TraceContextPropagator::new());

    let resource = Resource::new(vec![
        KeyValue::new(SERVICE_NAME, "printshop"),
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
        KeyValue::new(
            "environment",
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        ),
    ]);

    let otlp_exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(otlp_endpoint);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(otlp_exporter)
        .with_trace_config(
            opentelemetry_sdk::trace::Config::default()
                .with_sampler(Sampler::AlwaysOn)
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(resource),
        )
        .install_batch(runtime::Tokio)
}

/// Installs console, rolling-file (errors and JSON) and, with
/// `OTEL_ENABLED=true`, OTLP layers.
///
/// `LOG_DIR` picks the file directory and `LOG_FORMAT=json` switches the
/// console to JSON lines. Falls back to console logging when
/// `OBSERVABILITY_ENABLED=false` or the log directory cannot be created.
/// Must run inside a Tokio runtime.
pub fn init_tracing() {
    if !is_observability_enabled() {
        init_basic_console_logging();
        return;
    }

    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Failed to create {log_dir}: {e}. Falling back to console logging");
        init_basic_console_logging();
        return;
    }

    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            "printshop=info,printshop_auth=info,printshop_cache=info,tower_http=warn,hyper=info,tonic=info",
        )
    });

    let json_console = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let console_layer = if json_console {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_filter(console_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .compact()
            .with_filter(console_filter)
            .boxed()
    };

    let file_layer = fmt::layer()
        .with_writer(RollingFileAppender::new(Rotation::DAILY, &log_dir, "printshop.log"))
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(EnvFilter::new("error"));

    // Structured logs for Loki ingestion.
    let json_layer = fmt::layer()
        .json()
        .with_writer(RollingFileAppender::new(Rotation::DAILY, &log_dir, "printshop.json"))
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    let registry = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(json_layer);

    if !env_flag("OTEL_ENABLED") {
        registry.init();
        info!(log_dir = %log_dir, "Tracing initialized with file logging");
        return;
    }

    match init_tracer() {
        Ok(tracer) => {
            registry
                .with(tracing_opentelemetry::layer().with_tracer(tracer))
                .init();
            info!("Tracing initialized with OpenTelemetry and file logging");
        }
        Err(e) => {
            registry.init();
            warn!(error = %e, "OpenTelemetry unavailable, tracing initialized with file logging only");
        }
    }
}

pub async fn shutdown_tracer() {
    if !is_observability_enabled() {
        return;
    }

    if env_flag("OTEL_ENABLED") {
        info!("Shutting down OpenTelemetry tracer...");
        global::shutdown_tracer_provider();
    }
}
