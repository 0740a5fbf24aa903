use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_cart, set_cart_item};

pub fn init_cart_router() -> Router<AppState> {
    Router::new().route("/", get(get_cart).post(set_cart_item))
}
