use crate::color::Xy;
use serde::{Deserialize, Serialize};

pub mod client;

pub use client::{HueClient, HueError};

/// Body of a grouped_light PUT that starts a signaling effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalingRequest {
    pub signaling: Signaling,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signaling {
    pub signal: String,
    pub duration: u64,
    pub colors: Vec<SignalColor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalColor {
    pub xy: Xy,
}

impl Signaling {
    /// Alternates between `start` and `jump` for `duration_ms`.
    pub fn alternating(duration_ms: u64, start: Xy, jump: Xy) -> Self {
        Self {
            signal: "alternating".to_string(),
            duration: duration_ms,
            colors: vec![SignalColor { xy: start }, SignalColor { xy: jump }],
        }
    }
}

impl From<Signaling> for SignalingRequest {
    fn from(signaling: Signaling) -> Self {
        Self { signaling }
    }
}
