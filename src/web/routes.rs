use crate::hue::{HueClient, HueError, Signaling, SignalingRequest};
use crate::settings::Settings;
use crate::web::sns::{DiscordNotifier, Notifier};
use axum::extract::{ConnectInfo, State};
use axum::routing::any;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Body returned by every route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl Response {
    pub fn success() -> Self {
        Self {
            status: "okay".to_string(),
            message: String::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "broke".to_string(),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "okay"
    }
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub hue: Option<Arc<HueClient>>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(settings: Settings, hue: Option<HueClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            settings: Arc::new(settings),
            hue: hue.map(Arc::new),
            notifier,
        }
    }

    pub fn from_settings(settings: Settings) -> Self {
        let hue = if settings.is_bridge_configured() {
            match HueClient::new(&settings.bridge_address, &settings.hue_username) {
                Ok(client) => Some(client),
                Err(e) => {
                    error!("Failed to create Hue client: {}", e);
                    None
                }
            }
        } else {
            None
        };
        let notifier = Arc::new(DiscordNotifier::new(settings.error_discord_webhook_url.clone()));
        Self::new(settings, hue, notifier)
    }

    async fn report(&self, message: String) {
        if let Err(e) = self.notifier.send_error(&message).await {
            warn!("Failed to send error notification: {}", e);
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", any(ping))
        .route("/page", any(page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn ping(State(state): State<AppState>, ConnectInfo(peer): ConnectInfo<SocketAddr>) -> Json<Response> {
    info!("Received /ping request from {}", peer);

    if !state.settings.is_bridge_configured() {
        let message = "Missing one or more environment variables.";
        warn!("{}", message);
        state.report(format!("[PingHandler] {}", message)).await;
        return Json(Response::error(""));
    }

    Json(Response::success())
}

async fn page(State(state): State<AppState>, ConnectInfo(peer): ConnectInfo<SocketAddr>) -> Json<Response> {
    info!("Received /page request from {}", peer);

    let settings = &state.settings;
    if !settings.is_bridge_configured() {
        let message = "Environment variables are not properly set.";
        warn!("{}", message);
        state.report(format!("[PageHandler] {}", message)).await;
        return Json(Response::error(""));
    }

    let Some(client) = &state.hue else {
        let message = "Error creating Hue API request.";
        error!("{}", message);
        state.report(format!("[PageHandler] {}", message)).await;
        return Json(Response::error(""));
    };

    let request = SignalingRequest::from(Signaling::alternating(
        settings.duration_ms,
        settings.start_color_xy,
        settings.jump_color_xy,
    ));

    match client.signal_grouped_light(&settings.grouped_light_id, &request).await {
        Ok(()) => {
            info!("Successfully sent command to Hue Bridge.");
            Json(Response::success())
        }
        Err(HueError::Status(status)) => {
            let message = format!("Received non-200 status code from Hue Bridge: {}", status.as_u16());
            warn!("{}", message);
            state.report(format!("[PageHandler] {}", message)).await;
            Json(Response::error(""))
        }
        Err(e) => {
            let message = match e {
                HueError::ReadBody(_) => "Failed to parse Hue API JSON response.",
                HueError::Build(_) => "Error creating Hue API request.",
                _ => "Error sending Hue API the request.",
            };
            error!("{} ({})", message, e);
            state.report(format!("[PageHandler] {}", message)).await;
            Json(Response::error(""))
        }
    }
}
