//! lanprefill binary entrypoint: logging setup and subcommand dispatch.

mod args;

use std::fmt;
use std::sync::OnceLock;

use clap::Parser;
use lanprefill::error::PrefillError;

use crate::args::{Args, Context, determine_log_level, process_args};

/// Log timestamps as `YYYY-MM-DD-T HH:MM:SS` in local time.
struct PrefillTimer;

impl tracing_subscriber::fmt::time::FormatTime for PrefillTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        let ts = chrono::Local::now().format("%Y-%m-%d-T %H:%M:%S").to_string();
        w.write_str(&ts)
    }
}

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// What: Install the global tracing subscriber.
///
/// Inputs:
/// - `ctx`: Resolved directories (the log file lives in `logs/`)
/// - `level`: Default filter when `RUST_LOG` is unset
///
/// Details:
/// - Appends to `logs/lanprefill.log` through a non-blocking writer; falls
///   back to stderr when the file cannot be opened.
fn init_logging(ctx: &Context, level: &str) {
    let log_path = ctx.paths.logs_dir().join("lanprefill.log");
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_timer(PrefillTimer)
                .init();
            let _ = LOG_GUARD.set(guard);
            tracing::info!(path = %log_path.display(), "logging initialized");
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(true)
                .with_writer(std::io::stderr)
                .with_timer(PrefillTimer)
                .init();
            tracing::warn!(error = %e, "failed to open log file; using stderr");
        }
    }
}

/// Print a run-level error the way the user should see it.
fn report_error(err: &PrefillError) {
    match err {
        PrefillError::EmptyCatalog => eprintln!("{err}"),
        // The pipeline already printed the partial summary.
        PrefillError::CacheUnreachable { summary, .. } => {
            eprintln!("Error: {err}");
            eprintln!(
                "Stopped after {} apps. Check that the LAN cache is running and reachable.",
                summary.processed()
            );
        }
        _ => eprintln!("Error: {err}"),
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let ctx = Context::load(args.config_dir.as_deref());
    init_logging(&ctx, &determine_log_level(&args));

    tracing::info!(command = ?args.command, version = env!("CARGO_PKG_VERSION"), "lanprefill starting");
    let result = process_args(&args, &ctx).await;
    match result {
        Ok(()) => tracing::info!("lanprefill exited"),
        Err(err) => {
            tracing::error!(error = %err, exit_code = err.exit_code(), "lanprefill failed");
            report_error(&err);
            std::process::exit(err.exit_code());
        }
    }
}
