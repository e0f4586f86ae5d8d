use std::fs;
use std::path::Path;
use std::time::Duration;

use super::parsing::{parse_bool, split_assignment};

/// Content written to `settings.conf` when none exists yet.
pub const SETTINGS_SKELETON: &str = "# lanprefill settings\n\
#\n\
# Format: key = value\n\
# Lines starting with # are comments.\n\
#\n\
# Base URL of the catalog service that lists owned apps and their manifests.\n\
catalog_url = http://127.0.0.1:8080\n\
#\n\
# IP of the LAN cache. Leave empty to detect it through DNS.\n\
cache_server =\n\
#\n\
# Parallel chunk requests per app (1-256).\n\
max_concurrent_requests = 30\n\
#\n\
# Timeout in seconds for a single HTTP request.\n\
request_timeout_secs = 30\n\
#\n\
# Always re-download apps, even when already up to date.\n\
force_default = false\n\
#\n\
# Print chunk counts and other detail while prefilling.\n\
verbose_default = false\n";

/// User settings loaded from `settings.conf`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the catalog service.
    pub catalog_url: String,
    /// Explicit cache address; `None` means detect via DNS.
    pub cache_server: Option<String>,
    /// Chunk requests in flight per app.
    pub max_concurrent_requests: usize,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Default for `--force`.
    pub force_default: bool,
    /// Default for `--verbose`.
    pub verbose_default: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_url: "http://127.0.0.1:8080".to_string(),
            cache_server: None,
            max_concurrent_requests: 30,
            request_timeout: Duration::from_secs(30),
            force_default: false,
            verbose_default: false,
        }
    }
}

/// What: Parse `settings.conf` content on top of the defaults.
///
/// Inputs:
/// - `content`: Full file text
///
/// Output:
/// - Settings where every recognized, well-formed key overrides its default.
///
/// Details:
/// - Unknown keys are ignored; malformed numbers keep the default.
/// - `max_concurrent_requests` is clamped to 1..=256.
pub fn parse_settings(content: &str) -> Settings {
    let mut out = Settings::default();
    for line in content.lines() {
        let Some((key, val)) = split_assignment(line) else {
            continue;
        };
        match key.as_str() {
            "catalog_url" | "api_url" => {
                if !val.is_empty() {
                    out.catalog_url = val.trim_end_matches('/').to_string();
                }
            }
            "cache_server" | "lancache_ip" => {
                out.cache_server = if val.is_empty() {
                    None
                } else {
                    Some(val.to_string())
                };
            }
            "max_concurrent_requests" | "max_concurrency" => {
                if let Ok(v) = val.parse::<usize>() {
                    out.max_concurrent_requests = v.clamp(1, 256);
                }
            }
            "request_timeout_secs" | "request_timeout" => {
                if let Ok(v) = val.parse::<u64>()
                    && v > 0
                {
                    out.request_timeout = Duration::from_secs(v);
                }
            }
            "force_default" | "force" => out.force_default = parse_bool(val),
            "verbose_default" | "verbose" => out.verbose_default = parse_bool(val),
            other => {
                tracing::debug!(key = other, "[Settings] Ignoring unknown key");
            }
        }
    }
    out
}

/// What: Load settings from `path`, writing the skeleton when the file is missing.
///
/// Inputs:
/// - `path`: Location of `settings.conf`
///
/// Output:
/// - Parsed settings, or defaults when the file cannot be read.
///
/// Details:
/// - Failing to write the skeleton is logged and otherwise ignored.
pub fn load_settings(path: &Path) -> Settings {
    if !path.is_file() {
        if let Some(dir) = path.parent() {
            let _ = fs::create_dir_all(dir);
        }
        match fs::write(path, SETTINGS_SKELETON) {
            Ok(()) => tracing::info!(path = %path.display(), "[Settings] Wrote default settings"),
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "[Settings] Failed to write default settings"
            ),
        }
        return parse_settings(SETTINGS_SKELETON);
    }
    match fs::read_to_string(path) {
        Ok(content) => parse_settings(&content),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "[Settings] Failed to read settings; using defaults"
            );
            Settings::default()
        }
    }
}
