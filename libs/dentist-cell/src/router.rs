use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use crate::handlers;
use crate::services::DentistService;

pub fn dentist_routes(service: Arc<DentistService>) -> Router {
    Router::new()
        .route("/", get(handlers::get_dentists).post(handlers::create_dentist))
        .route(
            "/{id}",
            get(handlers::get_dentist)
                .put(handlers::update_dentist)
                .patch(handlers::patch_dentist)
                .delete(handlers::delete_dentist),
        )
        .with_state(service)
}
