//! Service configuration.
//!
//! Values resolve in priority order: CLI flag / environment variable, then
//! `{data_dir}/config.toml`, then built-in defaults. The TOML file is
//! optional and a malformed one never stops startup.

use std::path::{Path, PathBuf};

use serde::Deserialize;

const DEFAULT_PORT: u16 = 3000;

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

/// `{data_dir}/config.toml`. All fields are optional overrides.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// HTTP server port (default: 3000).
    port: Option<u16>,
    /// Bind address (default: "127.0.0.1"; use "0.0.0.0" for LAN access).
    bind_address: Option<String>,
    /// Log level filter, e.g. "debug" or "taskd=trace" (default: "info").
    log: Option<String>,
    /// Log output format: "pretty" (default) or "json".
    log_format: Option<String>,
}

/// Read `{data_dir}/config.toml` if present. Parse failures are reported on
/// stderr because logging is not initialized until the config is resolved.
fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "warn: could not parse {}: {e}, using defaults",
                path.display()
            );
            None
        }
    }
}

/// Fully resolved configuration, shared by the server and its handlers.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub bind_address: String,
    /// Directory holding `db.json` and the optional `config.toml`.
    pub data_dir: PathBuf,
    pub log: String,
    pub log_format: String,
}

impl ServiceConfig {
    /// Resolve the configuration from CLI/env overrides plus the optional
    /// TOML file. `None` arguments fall through to TOML, then defaults.
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
        bind_address: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(|| PathBuf::from("."));
        let toml = load_toml(&data_dir).unwrap_or_default();

        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let bind_address = bind_address
            .or(toml.bind_address)
            .unwrap_or_else(default_bind_address);
        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());
        let log_format = std::env::var("TASKD_LOG_FORMAT")
            .ok()
            .filter(|v| !v.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        Self {
            port,
            bind_address,
            data_dir,
            log,
            log_format,
        }
    }

    /// Path of the JSON task database.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("db.json")
    }
}
