pub mod client;
mod dto;
#[cfg(test)]
pub(crate) mod fake_catalog;
pub mod handlers;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::dish_routes()
}
