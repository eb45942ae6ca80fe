use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    app_error::{AppError, ErrorResponse},
    app_state::AppState,
    extract::AppJson,
    pharmacy::{self, NewOrder},
};

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest(
        "/api/pharmacy",
        OpenApiRouter::new().routes(utoipa_axum::routes!(create_pharmacy_order)),
    )
}

#[derive(Deserialize, ToSchema)]
struct CreatePharmacyOrderReq {
    patient_id: Option<i32>,
    shipping_address: Option<String>,
    prescription_ids: Option<Vec<i32>>,
}

#[derive(Serialize, ToSchema)]
struct CreatePharmacyOrderRes {
    message: String,
    order_id: i32,
}

/// Place a pharmacy order for one or more prescriptions.
///
/// The order, its items and the prescriptions' ordered flags are written
/// atomically.
#[utoipa::path(
    post,
    path = "/order",
    tags = ["Pharmacy"],
    request_body = CreatePharmacyOrderReq,
    responses(
        (status = 201, description = "Order placed", body = CreatePharmacyOrderRes),
        (status = 400, description = "Missing fields or unknown prescription", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
async fn create_pharmacy_order(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreatePharmacyOrderReq>,
) -> Result<impl IntoResponse, AppError> {
    let order = NewOrder::new(body.patient_id, body.shipping_address, body.prescription_ids)?;
    let patient_id = order.patient_id;
    let item_count = order.prescription_ids.len();

    let conn = &mut state.db_pool.get().await.map_err(AppError::unavailable)?;

    let order_id = pharmacy::place_order(conn, order).await.inspect_err(|err| {
        tracing::warn!(patient_id, error = %err, "Pharmacy order rolled back");
    })?;

    tracing::info!(order_id, patient_id, item_count, "Pharmacy order placed");

    Ok((
        StatusCode::CREATED,
        Json(CreatePharmacyOrderRes {
            message: "Order placed successfully!".into(),
            order_id,
        }),
    ))
}
