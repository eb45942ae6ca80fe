use utoipa_axum::router::OpenApiRouter;

use crate::app_state::AppState;

pub mod appointments;
pub mod auth;
pub mod doctors;
pub mod patients;
pub mod pharmacy;
pub mod prescriptions;

/// Every API route, with its OpenAPI description.
pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    auth::routes_with_openapi()
        .merge(doctors::routes_with_openapi())
        .merge(appointments::routes_with_openapi())
        .merge(prescriptions::routes_with_openapi())
        .merge(pharmacy::routes_with_openapi())
        .merge(patients::routes_with_openapi())
}
