//! Configuration parsing – reads a KEY=VALUE file (`taskmap.conf`).

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::routes;

/// Settings shared by the web server and the browser bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // ── remote API ───────────────────────────────────────────────────
    /// Base URL of the project API, without trailing slash.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Sent as `Accept-Language`.
    pub locale: String,

    // ── navigation ───────────────────────────────────────────────────
    pub login_path: String,
    pub explore_path: String,

    // ── preference defaults ──────────────────────────────────────────
    pub default_action: String,
    pub map_shown: bool,

    // ── server ───────────────────────────────────────────────────────
    pub listen_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        parse(&HashMap::new())
    }
}

impl Config {
    /// Default config path.
    pub fn default_path() -> &'static str {
        "/etc/taskmap/taskmap.conf"
    }
}

/// Parse a `KEY=VALUE` configuration file.
///
/// Lines starting with `#` are comments.  Values may be optionally
/// double-quoted.  Unknown keys are silently ignored.
pub fn load(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read config: {}", path.display()))?;

    let config = parse(&parse_conf(&text));
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Like [`load`], but a missing file yields the defaults.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if !path.exists() {
        warn!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    load(path)
}

fn parse(map: &HashMap<String, String>) -> Config {
    let get = |key: &str| -> Option<String> { map.get(key).cloned().filter(|s| !s.is_empty()) };
    let get_bool = |key: &str, default: bool| -> bool {
        get(key)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(default)
    };

    Config {
        api_base_url: get("API_BASE_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| "http://localhost:5000/api/v2".into()),
        request_timeout_secs: get("REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(30),
        locale: get("LOCALE").unwrap_or_else(|| "en".into()),
        login_path: get("LOGIN_PATH").unwrap_or_else(|| routes::DEFAULT_LOGIN.into()),
        explore_path: get("EXPLORE_PATH").unwrap_or_else(|| routes::EXPLORE.into()),
        default_action: get("DEFAULT_ACTION").unwrap_or_else(|| "any".into()),
        map_shown: get_bool("MAP_SHOWN", false),
        listen_addr: get("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
    }
}

/// Parse `KEY=VALUE` lines into a map, stripping optional double-quotes.
fn parse_conf(text: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, val)) = line.split_once('=') {
            let key = key.trim();
            let val = val.trim().trim_matches('"');
            map.insert(key.to_string(), val.to_string());
        }
    }
    map
}

// ─── tests ───────────────────────────────────────────────────────────────
