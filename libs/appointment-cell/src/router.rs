// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::services::AppointmentBookingService;

pub fn appointment_routes(service: Arc<AppointmentBookingService>) -> Router {
    Router::new()
        .route("/", get(handlers::get_appointments).post(handlers::create_appointment))
        .route(
            "/{id}",
            get(handlers::get_appointment)
                .put(handlers::update_appointment)
                .patch(handlers::patch_appointment)
                .delete(handlers::delete_appointment),
        )
        .route("/patient/{identity_number}", get(handlers::get_patient_appointments))
        .route("/dentist/{license_number}", get(handlers::get_dentist_appointments))
        .route("/conflicts/check", get(handlers::check_appointment_conflicts))
        .with_state(service)
}
