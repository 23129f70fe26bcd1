use axum::{
    Router,
    routing::get,
};

use appointment_cell::appointment_routes;
use dentist_cell::dentist_routes;
use patient_cell::patient_routes;

use crate::state::AppServices;

pub fn create_router(services: &AppServices) -> Router {
    Router::new()
        .route("/", get(|| async { "Dental Clinic API is running!" }))
        .nest("/appointments", appointment_routes(services.appointments.clone()))
        .nest("/dentists", dentist_routes(services.dentists.clone()))
        .nest("/patients", patient_routes(services.patients.clone()))
}
