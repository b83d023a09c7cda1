use sysvitals::app_context::AppContext;
use sysvitals::config::load_config;
use sysvitals::jobs::start_background_jobs;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "config.toml";

fn init_json_logging() {
    if let Err(error) = tracing_log::LogTracer::init() {
        eprintln!(
            "logging bridge initialization failed (continuing with existing logger): {}",
            error
        );
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .finish();

    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("global logger initialization failed: {}", error);
    }
}

#[tokio::main]
async fn main() {
    init_json_logging();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_PATH.to_string());
    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("Configuration error: {}", error);
            return;
        }
    };

    tracing::info!(
        source = ?config.source.mode,
        refresh_interval_ms = config.monitor.refresh_interval_ms,
        max_history = config.monitor.max_history,
        "sysvitals is starting"
    );

    let app_context = match AppContext::new(config) {
        Ok(app_context) => app_context,
        Err(error) => {
            tracing::error!("Metrics source setup failed: {}", error);
            return;
        }
    };

    start_background_jobs(&app_context);
    app_context.monitor.start_monitoring().await;

    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", error);
    }

    app_context.monitor.stop_monitoring().await;

    match app_context.monitor.summary().await {
        Some(summary) => tracing::info!(
            samples = summary.sample_count,
            cpu_avg = summary.cpu_avg,
            cpu_min = summary.cpu_min,
            cpu_max = summary.cpu_max,
            memory_avg = summary.memory_avg,
            memory_min = summary.memory_min,
            memory_max = summary.memory_max,
            "history_summary"
        ),
        None => tracing::info!("history_summary samples=0"),
    }

    let alerts = app_context.monitor.snapshot().await.alerts;
    tracing::info!(retained_alerts = alerts.len(), "sysvitals stopped");
}
