use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use utoipa_axum::router::OpenApiRouter;

use crate::{
    app_error::{AppError, ErrorResponse},
    app_state::AppState,
    pharmacy::{self, OrderSummary},
};

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(utoipa_axum::routes!(get_patient_orders))
}

/// Fetch a patient's pharmacy order history, newest first.
#[utoipa::path(
    get,
    path = "/{patient_id}/orders",
    tags = ["Pharmacy"],
    params(
        ("patient_id" = i32, Path, description = "Patient whose orders to fetch")
    ),
    responses(
        (status = 200, description = "Orders with their items", body = Vec<OrderSummary>),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
async fn get_patient_orders(
    Path(patient_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state.db_pool.get().await.map_err(AppError::unavailable)?;

    let orders = pharmacy::list_orders(conn, patient_id).await?;

    Ok(Json(orders))
}
