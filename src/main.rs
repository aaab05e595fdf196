//! Binary entry: CLI parsing, logging setup, database seeding, serve loop.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use taskd::config::ServiceConfig;
use taskd::storage::FileStore;
use taskd::AppContext;

#[derive(Parser)]
#[command(
    name = "taskd",
    version,
    about = "To-do list HTTP service backed by a flat JSON file"
)]
struct Args {
    /// HTTP server port
    #[arg(long, env = "TASKD_PORT")]
    port: Option<u16>,

    /// Directory holding db.json and the optional config.toml
    #[arg(long, env = "TASKD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level filter, e.g. "debug" or "taskd=trace"
    #[arg(long, env = "TASKD_LOG")]
    log: Option<String>,

    /// Bind address (use 0.0.0.0 to expose on the LAN)
    #[arg(long, env = "TASKD_BIND")]
    bind: Option<String>,

    /// Also write logs to this file, rotated daily
    #[arg(long, env = "TASKD_LOG_FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ServiceConfig::new(args.port, args.data_dir, args.log, args.bind);

    // Init once, before any tracing calls.
    let _file_guard = setup_logging(&config.log, args.log_file.as_deref(), &config.log_format);

    install_panic_hook(config.data_dir.clone());

    info!(version = env!("CARGO_PKG_VERSION"), "taskd starting");
    info!(
        data_dir = %config.data_dir.display(),
        bind = %config.bind_address,
        port = config.port,
        "configuration resolved"
    );

    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .with_context(|| {
            format!(
                "could not create data directory '{}'",
                config.data_dir.display()
            )
        })?;

    report_previous_crash(&config.data_dir);

    let store = FileStore::new(config.db_path());
    store
        .init()
        .await
        .context("could not initialize the task database")?;

    let ctx = Arc::new(AppContext::new(config, Arc::new(store)));
    if let Err(e) = taskd::rest::serve(ctx).await {
        error!(error = %e, "server exited with error");
        return Err(e);
    }
    Ok(())
}

/// Initialize the tracing subscriber.
///
/// With a log file set, output goes to both stdout and a daily-rolling file;
/// the returned `WorkerGuard` must stay alive for the process lifetime so
/// buffered lines get flushed. `log_format` is "pretty" or "json".
fn setup_logging(
    log_level: &str,
    log_file: Option<&Path>,
    log_format: &str,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let use_json = log_format == "json";

    let Some(path) = log_file else {
        init_stdout_logging(log_level, use_json);
        return None;
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let filename = path.file_name().unwrap_or_else(|| OsStr::new("taskd.log"));

    // tracing-appender opens the file lazily; the directory must exist first.
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!(
            "warn: could not create log directory '{}': {e}, logging to stdout only",
            dir.display()
        );
        init_stdout_logging(log_level, use_json);
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    if use_json {
        tracing_subscriber::registry()
            .with(EnvFilter::new(log_level))
            .with(fmt::layer().json())
            .with(fmt::layer().json().with_writer(non_blocking))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(EnvFilter::new(log_level))
            .with(fmt::layer().compact())
            .with(fmt::layer().with_writer(non_blocking))
            .init();
    }
    Some(guard)
}

fn init_stdout_logging(log_level: &str, use_json: bool) {
    if use_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(log_level)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(log_level)
            .compact()
            .init();
    }
}

/// Write panic info and a backtrace to `{data_dir}/crash.log` so the next
/// start can report it. The default hook still runs first.
fn install_panic_hook(data_dir: PathBuf) {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        original(info);

        let msg = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(|s| s.as_str()))
            .unwrap_or("unknown panic");
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown location".to_string());
        let backtrace = std::backtrace::Backtrace::capture();

        let content = format!(
            "taskd panic at {location}\nmessage: {msg}\nversion: {}\nbacktrace:\n{backtrace:#}\n",
            env!("CARGO_PKG_VERSION")
        );
        // Best-effort write.
        let _ = std::fs::write(data_dir.join("crash.log"), content);
    }));
}

/// Report and remove a crash log left behind by a previous run.
fn report_previous_crash(data_dir: &Path) {
    let crash_path = data_dir.join("crash.log");
    if let Ok(content) = std::fs::read_to_string(&crash_path) {
        error!(path = %crash_path.display(), "previous run crashed:\n{content}");
        let _ = std::fs::remove_file(&crash_path);
    }
}
