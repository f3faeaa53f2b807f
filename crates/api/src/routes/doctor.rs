use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/doctors", post(handlers::doctor::create_doctor))
        .route("/api/doctors", get(handlers::doctor::list_doctors))
        .route("/api/doctors/:id", get(handlers::doctor::get_doctor))
}
