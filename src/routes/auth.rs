use anyhow::Context;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    app_error::{AppError, ErrorResponse, MessageResponse},
    app_state::AppState,
    extract::{AppJson, non_blank},
    models::{CreateDoctorEntity, CreatePatientEntity, DoctorEntity, PatientEntity},
    password::{hash_password, verify_password},
    schema::{doctors, patients},
};

/// Registration and credential verification for patients and doctors.
pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(utoipa_axum::routes!(register_patient))
        .routes(utoipa_axum::routes!(login_patient))
        .routes(utoipa_axum::routes!(register_doctor))
        .routes(utoipa_axum::routes!(login_doctor))
}

const EMAIL_TAKEN: &str = "Email already exists";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

async fn hash_in_background(password: String) -> Result<String, AppError> {
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("Password hashing task failed")?
        .map_err(|err| anyhow::anyhow!("Failed to hash password: {err}"))?;
    Ok(hash)
}

#[derive(Deserialize, ToSchema)]
struct RegisterPatientReq {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

/// Register a new patient account.
#[utoipa::path(
    post,
    path = "/api/register/patient",
    tags = ["Auth"],
    request_body = RegisterPatientReq,
    responses(
        (status = 201, description = "Patient registered", body = MessageResponse),
        (status = 400, description = "Missing required fields", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse)
    )
)]
async fn register_patient(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterPatientReq>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(first_name), Some(last_name), Some(email), Some(password)) = (
        non_blank(body.first_name),
        non_blank(body.last_name),
        non_blank(body.email),
        non_blank(body.password),
    ) else {
        return Err(AppError::BadRequest("Missing required fields".into()));
    };

    let password_hash = hash_in_background(password).await?;

    let conn = &mut state.db_pool.get().await.map_err(AppError::unavailable)?;

    let patient_id: i32 = diesel::insert_into(patients::table)
        .values(CreatePatientEntity {
            first_name,
            last_name,
            email,
            password_hash,
        })
        .returning(patients::patient_id)
        .get_result(conn)
        .await
        .map_err(|err| AppError::from(err).on_conflict(EMAIL_TAKEN))?;

    tracing::info!(patient_id, "Patient registered");

    Ok((
        StatusCode::CREATED,
        axum::Json(MessageResponse::new("Patient registered successfully")),
    ))
}

#[derive(Deserialize, ToSchema)]
struct RegisterDoctorReq {
    first_name: Option<String>,
    last_name: Option<String>,
    specialization: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

/// Register a new doctor account.
#[utoipa::path(
    post,
    path = "/api/register/doctor",
    tags = ["Auth"],
    request_body = RegisterDoctorReq,
    responses(
        (status = 201, description = "Doctor registered", body = MessageResponse),
        (status = 400, description = "Missing required fields", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse)
    )
)]
async fn register_doctor(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterDoctorReq>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(first_name), Some(last_name), Some(specialization), Some(email), Some(password)) = (
        non_blank(body.first_name),
        non_blank(body.last_name),
        non_blank(body.specialization),
        non_blank(body.email),
        non_blank(body.password),
    ) else {
        return Err(AppError::BadRequest("Missing required fields".into()));
    };

    let password_hash = hash_in_background(password).await?;

    let conn = &mut state.db_pool.get().await.map_err(AppError::unavailable)?;

    let doctor_id: i32 = diesel::insert_into(doctors::table)
        .values(CreateDoctorEntity {
            first_name,
            last_name,
            specialization,
            email,
            password_hash,
        })
        .returning(doctors::doctor_id)
        .get_result(conn)
        .await
        .map_err(|err| AppError::from(err).on_conflict(EMAIL_TAKEN))?;

    tracing::info!(doctor_id, "Doctor registered");

    Ok((
        StatusCode::CREATED,
        axum::Json(MessageResponse::new("Doctor registered successfully")),
    ))
}

#[derive(Deserialize, ToSchema)]
struct LoginReq {
    email: Option<String>,
    password: Option<String>,
}

impl LoginReq {
    fn credentials(self) -> Result<(String, String), AppError> {
        match (non_blank(self.email), non_blank(self.password)) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(AppError::BadRequest(
                "Email and password are required".into(),
            )),
        }
    }
}

#[derive(Serialize, ToSchema)]
struct PatientLoginRes {
    message: String,
    patient_id: i32,
    first_name: String,
}

/// Verify patient credentials.
#[utoipa::path(
    post,
    path = "/api/login/patient",
    tags = ["Auth"],
    request_body = LoginReq,
    responses(
        (status = 200, description = "Login successful", body = PatientLoginRes),
        (status = 400, description = "Email and password are required", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
async fn login_patient(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginReq>,
) -> Result<impl IntoResponse, AppError> {
    let (email, password) = body.credentials()?;

    let conn = &mut state.db_pool.get().await.map_err(AppError::unavailable)?;

    let patient: PatientEntity = patients::table
        .filter(patients::email.eq(&email))
        .select(PatientEntity::as_select())
        .first(conn)
        .await
        .optional()?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    if !verify_password(&password, &patient.password_hash) {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    tracing::info!(patient_id = patient.patient_id, "Patient logged in");

    Ok(axum::Json(PatientLoginRes {
        message: "Login successful".into(),
        patient_id: patient.patient_id,
        first_name: patient.first_name,
    }))
}

#[derive(Serialize, ToSchema)]
struct DoctorLoginRes {
    message: String,
    doctor_id: i32,
    first_name: String,
    specialization: String,
}

/// Verify doctor credentials.
#[utoipa::path(
    post,
    path = "/api/login/doctor",
    tags = ["Auth"],
    request_body = LoginReq,
    responses(
        (status = 200, description = "Login successful", body = DoctorLoginRes),
        (status = 400, description = "Email and password are required", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
async fn login_doctor(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginReq>,
) -> Result<impl IntoResponse, AppError> {
    let (email, password) = body.credentials()?;

    let conn = &mut state.db_pool.get().await.map_err(AppError::unavailable)?;

    let doctor: DoctorEntity = doctors::table
        .filter(doctors::email.eq(&email))
        .select(DoctorEntity::as_select())
        .first(conn)
        .await
        .optional()?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    if !verify_password(&password, &doctor.password_hash) {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    tracing::info!(doctor_id = doctor.doctor_id, "Doctor logged in");

    Ok(axum::Json(DoctorLoginRes {
        message: "Login successful".into(),
        doctor_id: doctor.doctor_id,
        first_name: doctor.first_name,
        specialization: doctor.specialization,
    }))
}
