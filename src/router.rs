use axum::{Router, routing::get};
use std::sync::Arc;

use crate::db::CarRepository;
use crate::handlers::{cars::list_cars_handler, heartbeat::heartbeat_handler};

/// Dependencies shared by every handler.
#[derive(Clone)]
pub struct GscState {
    pub cars: Arc<dyn CarRepository>,
}

impl GscState {
    pub fn new(cars: Arc<dyn CarRepository>) -> Self {
        Self { cars }
    }
}

pub fn gsc_router(state: GscState) -> Router {
    Router::new()
        .route("/heartbeat", get(heartbeat_handler))
        .route("/cars", get(list_cars_handler))
        .with_state(state)
}
