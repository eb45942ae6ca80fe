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
    models::PatientPrescriptionRow,
    schema::{appointments, doctors, prescriptions},
};

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(utoipa_axum::routes!(get_patient_prescriptions))
}

/// Fetch every prescription issued to a patient, with its ordered flag.
#[utoipa::path(
    get,
    path = "/{patient_id}/prescriptions",
    tags = ["Prescriptions"],
    params(
        ("patient_id" = i32, Path, description = "Patient whose prescriptions to fetch")
    ),
    responses(
        (status = 200, description = "Patient's prescriptions", body = Vec<PatientPrescriptionRow>),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
async fn get_patient_prescriptions(
    Path(patient_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state.db_pool.get().await.map_err(AppError::unavailable)?;

    let prescriptions: Vec<PatientPrescriptionRow> = prescriptions::table
        .inner_join(appointments::table.inner_join(doctors::table))
        .filter(appointments::patient_id.eq(patient_id))
        .order_by((
            appointments::appointment_time.desc(),
            prescriptions::prescription_id.asc(),
        ))
        .select((
            prescriptions::prescription_id,
            prescriptions::medication_name,
            prescriptions::dosage,
            prescriptions::instructions,
            prescriptions::is_ordered,
            appointments::appointment_time,
            doctors::first_name,
            doctors::last_name,
        ))
        .load(conn)
        .await?;

    Ok(Json(prescriptions))
}
