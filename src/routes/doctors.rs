use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use diesel::{ExpressionMethods, PgTextExpressionMethods, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;
use serde::Deserialize;
use utoipa::IntoParams;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    app_error::{AppError, ErrorResponse},
    app_state::AppState,
    extract::non_blank,
    models::{DoctorAppointmentRow, DoctorProfile},
    schema::{appointments, doctors, patients},
};

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest(
        "/api/doctors",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(search_doctors))
            .routes(utoipa_axum::routes!(get_doctor_appointments)),
    )
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
struct DoctorSearchQuery {
    /// Case-insensitive substring of the specialization.
    specialization: Option<String>,
}

/// List doctors, optionally filtered by specialization.
#[utoipa::path(
    get,
    path = "/",
    tags = ["Doctors"],
    params(DoctorSearchQuery),
    responses(
        (status = 200, description = "Matching doctors", body = Vec<DoctorProfile>),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
async fn search_doctors(
    State(state): State<AppState>,
    Query(query): Query<DoctorSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state.db_pool.get().await.map_err(AppError::unavailable)?;

    let mut doctors_query = doctors::table
        .select(DoctorProfile::as_select())
        .order_by(doctors::doctor_id.asc())
        .into_boxed();

    if let Some(term) = non_blank(query.specialization) {
        doctors_query = doctors_query.filter(doctors::specialization.ilike(contains_pattern(&term)));
    }

    let doctors: Vec<DoctorProfile> = doctors_query.load(conn).await?;

    Ok(Json(doctors))
}

/// `ILIKE` pattern matching `term` anywhere, with its wildcards taken literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// List a doctor's appointments, earliest first.
#[utoipa::path(
    get,
    path = "/{doctor_id}/appointments",
    tags = ["Doctors"],
    params(
        ("doctor_id" = i32, Path, description = "Doctor whose schedule to fetch")
    ),
    responses(
        (status = 200, description = "Doctor's appointments", body = Vec<DoctorAppointmentRow>),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
async fn get_doctor_appointments(
    Path(doctor_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state.db_pool.get().await.map_err(AppError::unavailable)?;

    let appointments: Vec<DoctorAppointmentRow> = appointments::table
        .inner_join(patients::table)
        .filter(appointments::doctor_id.eq(doctor_id))
        .order_by(appointments::appointment_time.asc())
        .select((
            appointments::appointment_id,
            appointments::doctor_id,
            appointments::appointment_time,
            appointments::status,
            appointments::visit_notes,
            patients::patient_id,
            patients::first_name,
            patients::last_name,
        ))
        .load(conn)
        .await?;

    Ok(Json(appointments))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_term_is_wrapped_in_wildcards() {
        assert_eq!(contains_pattern("cardio"), "%cardio%");
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern(r"c\d"), r"%c\\d%");
    }
}
