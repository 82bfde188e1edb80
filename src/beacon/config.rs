// src/beacon/config.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PATH: &str = "BEACON_CONFIG_PATH";

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Credentials and target for one beacon instance. Immutable once built.
#[derive(Clone, serde::Deserialize)]
pub struct BeaconConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub to_number: String,
    /// Minimum seconds between source queries, however often the beacon is
    /// invoked.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

impl BeaconConfig {
    /// True when every required field is present and non-empty.
    pub fn is_complete(&self) -> bool {
        !(self.account_sid.is_empty() || self.auth_token.is_empty() || self.to_number.is_empty())
    }

    /// Identity under which throttle state is kept.
    pub fn beacon_key(&self) -> String {
        format!("{}/{}", self.account_sid, self.to_number)
    }
}

// auth_token is a secret; keep it out of Debug output and logs.
impl std::fmt::Debug for BeaconConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeaconConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("to_number", &self.to_number)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .finish()
    }
}

/// Load beacon config from an explicit path. Supports TOML or JSON formats.
pub fn load_config_from(path: &Path) -> Result<BeaconConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading beacon config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
}

/// Load beacon config using env var + fallbacks:
/// 1) $BEACON_CONFIG_PATH
/// 2) config/beacon.toml
/// 3) config/beacon.json
pub fn load_config_default() -> Result<BeaconConfig> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_config_from(&pb);
        } else {
            return Err(anyhow!("BEACON_CONFIG_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/beacon.toml");
    if toml_p.exists() {
        return load_config_from(&toml_p);
    }
    let json_p = PathBuf::from("config/beacon.json");
    if json_p.exists() {
        return load_config_from(&json_p);
    }
    Err(anyhow!("no beacon config found"))
}

fn parse_config(s: &str, hint_ext: &str) -> Result<BeaconConfig> {
    // Try TOML first if hinted or content looks like toml.
    let try_toml = hint_ext == "toml" || s.contains("account_sid =");
    if try_toml {
        if let Ok(v) = toml::from_str::<BeaconConfig>(s) {
            return validate(v);
        }
    }
    if let Ok(v) = serde_json::from_str::<BeaconConfig>(s) {
        return validate(v);
    }
    // Fallback: also try TOML if not attempted
    if !try_toml {
        if let Ok(v) = toml::from_str::<BeaconConfig>(s) {
            return validate(v);
        }
    }
    Err(anyhow!("unsupported beacon config format"))
}

fn validate(cfg: BeaconConfig) -> Result<BeaconConfig> {
    if cfg.poll_interval_secs == 0 {
        return Err(anyhow!("poll_interval_secs must be positive"));
    }
    Ok(cfg)
}
