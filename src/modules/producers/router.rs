use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_producer, delete_producer, get_producer, list_producers, update_producer,
};

pub fn init_producers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_producers).post(create_producer))
        .route(
            "/{id}",
            get(get_producer).put(update_producer).delete(delete_producer),
        )
}
