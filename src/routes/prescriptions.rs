use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use diesel_async::RunQueryDsl;
use serde::Deserialize;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    app_error::{AppError, ErrorResponse, MessageResponse},
    app_state::AppState,
    extract::{AppJson, non_blank, positive_id},
    models::CreatePrescriptionEntity,
    schema::prescriptions,
};

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest(
        "/api/prescriptions",
        OpenApiRouter::new().routes(utoipa_axum::routes!(issue_prescription)),
    )
}

#[derive(Deserialize, ToSchema)]
struct IssuePrescriptionReq {
    appointment_id: Option<i32>,
    medication_name: Option<String>,
    dosage: Option<String>,
    instructions: Option<String>,
}

/// Issue a prescription during an appointment.
#[utoipa::path(
    post,
    path = "/issue",
    tags = ["Prescriptions"],
    request_body = IssuePrescriptionReq,
    responses(
        (status = 201, description = "Prescription issued", body = MessageResponse),
        (status = 400, description = "Missing fields or invalid appointment_id", body = ErrorResponse)
    )
)]
async fn issue_prescription(
    State(state): State<AppState>,
    AppJson(body): AppJson<IssuePrescriptionReq>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(appointment_id), Some(medication_name), Some(dosage)) = (
        positive_id(body.appointment_id),
        non_blank(body.medication_name),
        non_blank(body.dosage),
    ) else {
        return Err(AppError::BadRequest(
            "appointment_id, medication_name, and dosage are required".into(),
        ));
    };

    let conn = &mut state.db_pool.get().await.map_err(AppError::unavailable)?;

    let prescription_id: i32 = diesel::insert_into(prescriptions::table)
        .values(CreatePrescriptionEntity {
            appointment_id,
            medication_name,
            dosage,
            instructions: non_blank(body.instructions),
        })
        .returning(prescriptions::prescription_id)
        .get_result(conn)
        .await
        .map_err(|err| AppError::from(err).on_invalid_reference("Invalid appointment_id"))?;

    tracing::info!(prescription_id, appointment_id, "Prescription issued");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Prescription issued successfully")),
    ))
}
