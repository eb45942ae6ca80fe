use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDateTime;
use diesel::QueryDsl;
use diesel_async::RunQueryDsl;
use serde::Deserialize;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    app_error::{AppError, ErrorResponse, MessageResponse},
    app_state::AppState,
    extract::{AppJson, non_blank, positive_id},
    models::{CreateAppointmentEntity, UpdateAppointmentEntity},
    schema::appointments,
};

pub const SCHEDULED: &str = "Scheduled";

const APPOINTMENT_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest(
        "/api/appointments",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(book_appointment))
            .routes(utoipa_axum::routes!(update_appointment)),
    )
}

/// Parses an appointment time such as `2025-11-20 10:00:00`.
pub fn parse_appointment_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    APPOINTMENT_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

#[derive(Deserialize, ToSchema)]
struct BookAppointmentReq {
    patient_id: Option<i32>,
    doctor_id: Option<i32>,
    /// e.g. `2025-11-20 10:00:00`
    appointment_time: Option<String>,
}

/// Book an appointment slot with a doctor.
#[utoipa::path(
    post,
    path = "/book",
    tags = ["Appointments"],
    request_body = BookAppointmentReq,
    responses(
        (status = 201, description = "Appointment booked", body = MessageResponse),
        (status = 400, description = "Missing fields or unknown patient/doctor", body = ErrorResponse),
        (status = 409, description = "Time slot taken", body = ErrorResponse)
    )
)]
async fn book_appointment(
    State(state): State<AppState>,
    AppJson(body): AppJson<BookAppointmentReq>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(patient_id), Some(doctor_id), Some(appointment_time)) = (
        positive_id(body.patient_id),
        positive_id(body.doctor_id),
        non_blank(body.appointment_time),
    ) else {
        return Err(AppError::BadRequest(
            "patient_id, doctor_id, and appointment_time are required".into(),
        ));
    };

    let appointment_time = parse_appointment_time(&appointment_time).ok_or_else(|| {
        AppError::BadRequest(format!(
            "appointment_time must look like YYYY-MM-DD HH:MM:SS, got {}",
            appointment_time
        ))
    })?;

    let conn = &mut state.db_pool.get().await.map_err(AppError::unavailable)?;

    let appointment_id: i32 = diesel::insert_into(appointments::table)
        .values(CreateAppointmentEntity {
            patient_id,
            doctor_id,
            appointment_time,
            status: SCHEDULED.into(),
        })
        .returning(appointments::appointment_id)
        .get_result(conn)
        .await
        .map_err(|err| {
            AppError::from(err)
                .on_conflict("This time slot is unavailable. Please choose another time.")
                .on_invalid_reference("Invalid patient_id or doctor_id")
        })?;

    tracing::info!(appointment_id, patient_id, doctor_id, "Appointment booked");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Appointment booked successfully")),
    ))
}

#[derive(Deserialize, ToSchema)]
struct UpdateAppointmentReq {
    status: Option<String>,
    visit_notes: Option<String>,
}

impl From<UpdateAppointmentReq> for UpdateAppointmentEntity {
    fn from(req: UpdateAppointmentReq) -> Self {
        Self {
            status: non_blank(req.status),
            visit_notes: non_blank(req.visit_notes),
        }
    }
}

/// Update an appointment's status and/or visit notes.
#[utoipa::path(
    put,
    path = "/{appointment_id}",
    tags = ["Appointments"],
    params(
        ("appointment_id" = i32, Path, description = "Appointment to update")
    ),
    request_body = UpdateAppointmentReq,
    responses(
        (status = 200, description = "Appointment updated", body = MessageResponse),
        (status = 400, description = "Nothing to update", body = ErrorResponse),
        (status = 404, description = "Appointment not found", body = ErrorResponse)
    )
)]
async fn update_appointment(
    Path(appointment_id): Path<i32>,
    State(state): State<AppState>,
    AppJson(body): AppJson<UpdateAppointmentReq>,
) -> Result<impl IntoResponse, AppError> {
    let changes = UpdateAppointmentEntity::from(body);
    if changes.is_empty() {
        return Err(AppError::BadRequest(
            "At least one field (status or visit_notes) is required".into(),
        ));
    }

    let conn = &mut state.db_pool.get().await.map_err(AppError::unavailable)?;

    let updated = diesel::update(appointments::table.find(appointment_id))
        .set(&changes)
        .execute(conn)
        .await?;

    if updated == 0 {
        return Err(AppError::NotFound(
            "Appointment not found or no changes made".into(),
        ));
    }

    tracing::info!(appointment_id, "Appointment updated");

    Ok(Json(MessageResponse::new("Appointment updated successfully")))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 20)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, m, s).unwrap())
    }

    #[test]
    fn parses_space_and_t_separated_times() {
        assert_eq!(parse_appointment_time("2025-11-20 10:00:00"), Some(at(10, 0, 0)));
        assert_eq!(parse_appointment_time("2025-11-20T14:30:15"), Some(at(14, 30, 15)));
        assert_eq!(parse_appointment_time(" 2025-11-20 09:45 "), Some(at(9, 45, 0)));
    }

    #[test]
    fn rejects_unparseable_times() {
        assert_eq!(parse_appointment_time("tomorrow at ten"), None);
        assert_eq!(parse_appointment_time("2025-13-40 10:00:00"), None);
    }

    #[test]
    fn update_only_carries_supplied_fields() {
        let changes = UpdateAppointmentEntity::from(UpdateAppointmentReq {
            status: Some("Completed".into()),
            visit_notes: Some("".into()),
        });
        assert_eq!(
            changes,
            UpdateAppointmentEntity {
                status: Some("Completed".into()),
                visit_notes: None,
            }
        );
        assert!(!changes.is_empty());

        let empty = UpdateAppointmentEntity::from(UpdateAppointmentReq {
            status: None,
            visit_notes: None,
        });
        assert!(empty.is_empty());
    }
}
