use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;
use whisperpair::{health, hub::Hub, res, ws, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app_state = AppState {
        hub: Arc::new(Hub::default()),
    };

    let app = Router::new()
        .route("/", get(res::index))
        .route("/chat.html", get(res::chat))
        .route("/privacy.html", get(res::privacy))
        .route("/terms.html", get(res::terms))
        .route("/health", get(health::health))
        .route("/ws", get(ws::chat_ws))
        .with_state(app_state)
        .layer(CorsLayer::new().allow_origin(Any));

    let port = dotenv::var("PORT").unwrap_or_else(|_| "8080".to_owned());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .unwrap();
    info!("listening on http://0.0.0.0:{port}");
    axum::serve(listener, app).await.unwrap();
}
