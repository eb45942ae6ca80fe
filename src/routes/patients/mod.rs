use utoipa_axum::router::OpenApiRouter;

use crate::app_state::AppState;

pub mod appointments;
pub mod orders;
pub mod prescriptions;

/// Patient-scoped read endpoints under `/api/patients/{patient_id}`.
pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest(
        "/api/patients",
        appointments::routes()
            .merge(prescriptions::routes())
            .merge(orders::routes()),
    )
}
