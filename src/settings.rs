use crate::color::{self, Xy};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_START_COLOR: &str = "#ff5722";
pub const DEFAULT_JUMP_COLOR: &str = "#ff0000";
pub const DEFAULT_DURATION_SECONDS: i64 = 15;

pub const HUE_BRIDGE_ADDRESS: &str = "HUE_BRIDGE_ADDRESS";
pub const ERROR_DISCORD_WEBHOOK_URL: &str = "ERROR_DISCORD_WEBHOOK_URL";
pub const GROUPED_LIGHT_ID: &str = "GROUPED_LIGHT_ID";
pub const HUE_USERNAME: &str = "HUE_USERNAME";
pub const START_COLOR: &str = "START_COLOR";
pub const JUMP_COLOR: &str = "JUMP_COLOR";
pub const DURATION_SECONDS: &str = "DURATION_SECONDS";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Address the HTTP server listens on
    #[arg(long, env = "HUPROXY_LISTEN", default_value = "0.0.0.0:9090")]
    pub listen: SocketAddr,

    /// Dotenv file loaded before reading settings; existing variables win
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,
}

/// Lookup of raw setting values by name.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;

    fn get_or_empty(&self, key: &str) -> String {
        self.get(key).unwrap_or_default()
    }
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Receives messages about settings that were corrected during resolution.
pub trait WarningSink {
    fn warn(&mut self, message: &str);
}

/// Forwards warnings to `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingWarnings;

impl WarningSink for TracingWarnings {
    fn warn(&mut self, message: &str) {
        warn!("{}", message);
    }
}

impl WarningSink for Vec<String> {
    fn warn(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub bridge_address: String,
    pub error_discord_webhook_url: String,
    pub grouped_light_id: String,
    pub hue_username: String,
    pub start_color_hex: String,
    pub jump_color_hex: String,
    pub start_color_xy: Xy,
    pub jump_color_xy: Xy,
    pub duration_ms: u64,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::resolve(&ProcessEnv, &mut TracingWarnings)
    }

    /// Builds settings from raw values, substituting defaults for anything
    /// missing or invalid. Never fails; corrections are reported to `sink`.
    pub fn resolve(env: &impl EnvSource, sink: &mut impl WarningSink) -> Self {
        let bridge_address = env.get_or_empty(HUE_BRIDGE_ADDRESS);
        let error_discord_webhook_url = env.get_or_empty(ERROR_DISCORD_WEBHOOK_URL);
        let grouped_light_id = env.get_or_empty(GROUPED_LIGHT_ID);
        let hue_username = env.get_or_empty(HUE_USERNAME);

        if error_discord_webhook_url.is_empty() {
            sink.warn("No Discord webhook URL set for error notifications");
        }

        let (start_color_hex, start_color_xy) =
            resolve_color(env.get_or_empty(START_COLOR), START_COLOR, DEFAULT_START_COLOR, sink);
        let (jump_color_hex, jump_color_xy) =
            resolve_color(env.get_or_empty(JUMP_COLOR), JUMP_COLOR, DEFAULT_JUMP_COLOR, sink);

        let duration_ms = resolve_duration_ms(env.get_or_empty(DURATION_SECONDS), sink);

        Self {
            bridge_address,
            error_discord_webhook_url,
            grouped_light_id,
            hue_username,
            start_color_hex,
            jump_color_hex,
            start_color_xy,
            jump_color_xy,
            duration_ms,
        }
    }

    /// True when every value needed to address the bridge is present.
    pub fn is_bridge_configured(&self) -> bool {
        !self.bridge_address.is_empty() && !self.grouped_light_id.is_empty() && !self.hue_username.is_empty()
    }
}

fn resolve_color(raw: String, key: &str, default: &str, sink: &mut impl WarningSink) -> (String, Xy) {
    let hex = if raw.is_empty() { default.to_string() } else { raw };

    match color::hex_to_xy(&hex) {
        Ok(xy) => (hex, xy),
        Err(_) => {
            sink.warn(&format!("Invalid {} value, using default.", key));
            let xy = color::hex_to_xy(default).unwrap_or_default();
            (default.to_string(), xy)
        }
    }
}

fn resolve_duration_ms(raw: String, sink: &mut impl WarningSink) -> u64 {
    let raw = if raw.is_empty() {
        DEFAULT_DURATION_SECONDS.to_string()
    } else {
        raw
    };

    let parsed = raw
        .parse::<i64>()
        .ok()
        .filter(|seconds| *seconds > 0)
        .and_then(|seconds| (seconds as u64).checked_mul(1000));

    match parsed {
        Some(ms) => ms,
        None => {
            sink.warn(&format!(
                "Invalid {} value, using default of {} seconds.",
                DURATION_SECONDS, DEFAULT_DURATION_SECONDS
            ));
            DEFAULT_DURATION_SECONDS as u64 * 1000
        }
    }
}
