use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod discord;

pub use self::discord::DiscordNotifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.write_str(level)
    }
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("failed to deliver notification: {0}")]
    Request(#[from] reqwest::Error),
}

/// Destination for operator-facing failure reports.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_error(&self, message: &str) -> Result<(), NotifyError>;
}
