use crate::hue::SignalingRequest;
use reqwest::{Client, StatusCode};
use std::net::Ipv6Addr;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HueError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("failed to send request to bridge: {0}")]
    Send(#[source] reqwest::Error),
    #[error("failed to read bridge response: {0}")]
    ReadBody(#[source] reqwest::Error),
    #[error("bridge returned status {0}")]
    Status(StatusCode),
}

pub struct HueClient {
    client: Client,
    base_url: String,
    app_key: String,
}

impl HueClient {
    pub fn new(address: &str, app_key: &str) -> Result<Self, HueError> {
        let base_url = if address.parse::<Ipv6Addr>().is_ok() {
            format!("https://[{}]", address)
        } else {
            format!("https://{}", address)
        };
        Self::with_base_url(base_url, app_key)
    }

    /// Talks to `base_url` (scheme and authority, no trailing slash) instead of
    /// deriving an https URL from the bridge address.
    pub fn with_base_url(base_url: impl Into<String>, app_key: &str) -> Result<Self, HueError> {
        let client = Client::builder()
            .danger_accept_invalid_certs(true) // Hue uses self-signed certs
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(HueError::Build)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            app_key: app_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn signal_grouped_light(&self, id: &str, request: &SignalingRequest) -> Result<(), HueError> {
        let url = format!("{}/clip/v2/resource/grouped_light/{}", self.base_url, id);

        let resp = self
            .client
            .put(&url)
            .header("hue-application-key", &self.app_key)
            .json(request)
            .send()
            .await
            .map_err(HueError::Send)?;

        let status = resp.status();
        // Drain the body so the connection can be reused
        resp.bytes().await.map_err(HueError::ReadBody)?;

        if status != StatusCode::OK {
            return Err(HueError::Status(status));
        }
        Ok(())
    }
}
