pub mod appresult;
pub mod health;
pub mod hub;
pub mod res;
pub mod ws;

use std::sync::Arc;

use axum::extract::FromRef;

pub use appresult::{AppError, AppResult};
use hub::Hub;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub hub: Arc<Hub>,
}
