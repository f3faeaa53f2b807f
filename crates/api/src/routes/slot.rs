use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/slots", post(handlers::slot::create_slot))
        .route("/api/slots/:id", get(handlers::slot::get_slot))
        .route(
            "/api/slots/:id/availability",
            get(handlers::slot::get_slot_availability),
        )
        .route(
            "/api/doctors/:id/slots",
            get(handlers::slot::list_doctor_slots),
        )
}
