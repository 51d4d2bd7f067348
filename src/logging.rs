// Logging setup: runtime log levels from env, pretty console output, optional JSON log file
use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use eyre::{Result, WrapErr};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

const CRATE_TARGET: &str = "promo_budget_planner";

fn crate_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(format!("warn,{}={}", CRATE_TARGET, level))
        .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", CRATE_TARGET)))
}

pub fn init_logging(bin_name: String) -> Result<()> {
    let console_log_level = env::var("CONSOLE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let file_log_level = env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let log_to_file = env::var("LOG_TO_FILE").unwrap_or_else(|_| "false".to_string()) == "true";

    let console_layer = fmt::Layer::new().pretty().with_filter(crate_filter(&console_log_level));

    if !log_to_file {
        tracing_subscriber::registry()
            .with(console_layer)
            .try_init()
            .wrap_err("Failed to install tracing subscriber")?;
        return Ok(());
    }

    let log_dir = Path::new("logs");
    fs::create_dir_all(log_dir).wrap_err("Failed to create log directory")?;
    let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    let file_appender = tracing_appender::rolling::never(log_dir, format!("{}_{}.log", bin_name, timestamp));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    FILE_GUARD.set(guard).ok(); // keep the writer alive for the whole process

    let file_layer = fmt::Layer::new()
        .json()
        .with_writer(non_blocking)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(crate_filter(&file_log_level));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .wrap_err("Failed to install tracing subscriber")?;
    Ok(())
}
