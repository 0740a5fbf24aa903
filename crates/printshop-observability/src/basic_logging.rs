use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Console-only logging, used when exporters are disabled and by the CLI.
///
/// `LOG_LEVEL` sets the level for the application crates (default `info`);
/// `RUST_LOG` overrides the whole filter.
pub fn init_basic_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "printshop={log_level},printshop_auth={log_level},printshop_cache={log_level},\
             tower_http=warn,hyper=warn,sqlx=warn"
        ))
    });

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter);

    // A second init (tests, CLI after server setup) is not an error.
    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
