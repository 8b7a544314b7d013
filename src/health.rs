use std::sync::Arc;

use axum::{debug_handler, extract::State, Json};
use serde::Serialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::{hub::Hub, AppResult};

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    online: usize,
    waiting: usize,
    timestamp: String,
}

#[debug_handler(state = crate::AppState)]
pub async fn health(State(hub): State<Arc<Hub>>) -> AppResult<Json<Health>> {
    let (online, waiting) = hub.snapshot();
    Ok(Json(Health {
        status: "OK",
        online,
        waiting,
        timestamp: OffsetDateTime::now_utc().format(&Rfc3339)?,
    }))
}
