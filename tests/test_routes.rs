use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{post, put};
use axum::{Json, Router};
use huproxy::hue::HueClient;
use huproxy::settings::Settings;
use huproxy::web::sns::DiscordNotifier;
use huproxy::web::{create_router, AppState, Response};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug)]
struct BridgeCall {
    light_id: String,
    app_key: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct BridgeMock {
    status: StatusCode,
    tx: mpsc::UnboundedSender<BridgeCall>,
}

async fn bridge_put(
    State(mock): State<BridgeMock>,
    Path(light_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let app_key = headers
        .get("hue-application-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let _ = mock.tx.send(BridgeCall { light_id, app_key, body });
    (mock.status, Json(json!({ "data": [], "errors": [] })))
}

async fn webhook_post(State(tx): State<mpsc::UnboundedSender<String>>, Json(body): Json<Value>) -> StatusCode {
    let content = body["content"].as_str().unwrap_or_default().to_string();
    let _ = tx.send(content);
    StatusCode::NO_CONTENT
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .unwrap();
    });
    addr
}

async fn start_bridge(status: StatusCode) -> (String, mpsc::UnboundedReceiver<BridgeCall>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let router = Router::new()
        .route("/clip/v2/resource/grouped_light/:id", put(bridge_put))
        .with_state(BridgeMock { status, tx });
    let addr = serve(router).await;
    (format!("http://{}", addr), rx)
}

async fn start_webhook() -> (String, mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let router = Router::new().route("/webhook", post(webhook_post)).with_state(tx);
    let addr = serve(router).await;
    (format!("http://{}/webhook", addr), rx)
}

fn settings(pairs: &[(&str, &str)]) -> Settings {
    let env: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    let mut warnings = Vec::new();
    Settings::resolve(&env, &mut warnings)
}

fn complete_settings(webhook_url: &str) -> Settings {
    settings(&[
        ("HUE_BRIDGE_ADDRESS", "192.168.1.2"),
        ("GROUPED_LIGHT_ID", "group1"),
        ("HUE_USERNAME", "user123"),
        ("START_COLOR", "#00ff00"),
        ("JUMP_COLOR", "#0000ff"),
        ("DURATION_SECONDS", "20"),
        ("ERROR_DISCORD_WEBHOOK_URL", webhook_url),
    ])
}

async fn start_app(settings: Settings, bridge_url: Option<&str>) -> String {
    let hue = bridge_url.map(|url| HueClient::with_base_url(url, &settings.hue_username).unwrap());
    let notifier = Arc::new(DiscordNotifier::new(settings.error_discord_webhook_url.clone()));
    let state = AppState::new(settings, hue, notifier);
    let addr = serve(create_router(state)).await;
    format!("http://{}", addr)
}

async fn call(app: &str, route: &str) -> Response {
    let resp = reqwest::get(format!("{}{}", app, route)).await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "application/json");
    resp.json().await.unwrap()
}

#[tokio::test]
async fn test_page_sends_alternating_signal() {
    let (bridge_url, mut bridge_rx) = start_bridge(StatusCode::OK).await;
    let (webhook_url, mut webhook_rx) = start_webhook().await;
    let app = start_app(complete_settings(&webhook_url), Some(&bridge_url)).await;

    let response = call(&app, "/page").await;
    assert!(response.is_success(), "{:?}", response);

    let call = bridge_rx.recv().await.expect("bridge should be called");
    assert_eq!(call.light_id, "group1");
    assert_eq!(call.app_key.as_deref(), Some("user123"));
    assert_eq!(
        call.body,
        json!({
            "signaling": {
                "signal": "alternating",
                "duration": 20000,
                "colors": [
                    { "xy": { "x": 0.3, "y": 0.6 } },
                    { "xy": { "x": 0.15, "y": 0.06 } }
                ]
            }
        })
    );
    assert!(webhook_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_page_reports_bridge_status() {
    let (bridge_url, mut bridge_rx) = start_bridge(StatusCode::SERVICE_UNAVAILABLE).await;
    let (webhook_url, mut webhook_rx) = start_webhook().await;
    let app = start_app(complete_settings(&webhook_url), Some(&bridge_url)).await;

    let response = call(&app, "/page").await;
    assert_eq!(response, Response::error(""));
    assert!(bridge_rx.recv().await.is_some());

    let content = webhook_rx.recv().await.expect("webhook should be notified");
    assert!(content.contains("`[ERROR]`"), "{}", content);
    assert!(
        content.ends_with("[PageHandler] Received non-200 status code from Hue Bridge: 503"),
        "{}",
        content
    );
}

#[tokio::test]
async fn test_page_reports_unreachable_bridge() {
    let closed = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let closed_url = format!("http://{}", closed.local_addr().unwrap());
    drop(closed);

    let (webhook_url, mut webhook_rx) = start_webhook().await;
    let app = start_app(complete_settings(&webhook_url), Some(&closed_url)).await;

    let response = call(&app, "/page").await;
    assert!(!response.is_success());

    let content = webhook_rx.recv().await.unwrap();
    assert!(content.ends_with("[PageHandler] Error sending Hue API the request."), "{}", content);
}

#[tokio::test]
async fn test_page_without_bridge_settings() {
    let (bridge_url, mut bridge_rx) = start_bridge(StatusCode::OK).await;
    let (webhook_url, mut webhook_rx) = start_webhook().await;
    let settings = settings(&[("HUE_BRIDGE_ADDRESS", "192.168.1.2"), ("ERROR_DISCORD_WEBHOOK_URL", webhook_url.as_str())]);
    let app = start_app(settings, Some(&bridge_url)).await;

    let response = call(&app, "/page").await;
    assert_eq!(response, Response::error(""));

    let content = webhook_rx.recv().await.unwrap();
    assert!(content.ends_with("[PageHandler] Environment variables are not properly set."), "{}", content);
    assert!(bridge_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_page_without_client() {
    let (webhook_url, mut webhook_rx) = start_webhook().await;
    let app = start_app(complete_settings(&webhook_url), None).await;

    let response = call(&app, "/page").await;
    assert!(!response.is_success());

    let content = webhook_rx.recv().await.unwrap();
    assert!(content.ends_with("[PageHandler] Error creating Hue API request."), "{}", content);
}

#[tokio::test]
async fn test_ping() {
    let (webhook_url, mut webhook_rx) = start_webhook().await;
    let app = start_app(complete_settings(&webhook_url), None).await;
    assert_eq!(call(&app, "/ping").await, Response::success());
    assert!(webhook_rx.try_recv().is_err());

    let app = start_app(settings(&[("ERROR_DISCORD_WEBHOOK_URL", webhook_url.as_str())]), None).await;
    assert_eq!(call(&app, "/ping").await, Response::error(""));
    let content = webhook_rx.recv().await.unwrap();
    assert!(content.ends_with("[PingHandler] Missing one or more environment variables."), "{}", content);
}

#[tokio::test]
async fn test_ping_accepts_any_method() {
    let app = start_app(complete_settings(""), None).await;
    let resp = reqwest::Client::new().post(format!("{}/ping", app)).send().await.unwrap();
    let body: Response = resp.json().await.unwrap();
    assert!(body.is_success());
}
