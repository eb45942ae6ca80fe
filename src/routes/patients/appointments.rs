use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use diesel::{ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    app_error::{AppError, ErrorResponse},
    app_state::AppState,
    models::PatientAppointmentRow,
    schema::{appointments, doctors},
};

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(utoipa_axum::routes!(get_patient_appointments))
}

/// Fetch a patient's appointments, most recent first.
#[utoipa::path(
    get,
    path = "/{patient_id}/appointments",
    tags = ["Appointments"],
    params(
        ("patient_id" = i32, Path, description = "Patient whose appointments to fetch")
    ),
    responses(
        (status = 200, description = "Patient's appointments", body = Vec<PatientAppointmentRow>),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
async fn get_patient_appointments(
    Path(patient_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state.db_pool.get().await.map_err(AppError::unavailable)?;

    let appointments: Vec<PatientAppointmentRow> = appointments::table
        .inner_join(doctors::table)
        .filter(appointments::patient_id.eq(patient_id))
        .order_by(appointments::appointment_time.desc())
        .select((
            appointments::appointment_id,
            appointments::patient_id,
            appointments::appointment_time,
            appointments::status,
            appointments::visit_notes,
            doctors::doctor_id,
            doctors::first_name,
            doctors::last_name,
            doctors::specialization,
        ))
        .load(conn)
        .await?;

    Ok(Json(appointments))
}
