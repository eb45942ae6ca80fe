//! Pharmacy orders: atomic placement and per-patient order history.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::{ExpressionMethods, QueryDsl, prelude::Queryable};
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    app_error::AppError,
    models::{CreatePharmacyOrderEntity, OrderItemEntity},
    schema::{order_items, pharmacy_orders, prescriptions},
};

pub const INITIAL_ORDER_STATUS: &str = "Pending";

/// A validated order placement request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub patient_id: i32,
    pub shipping_address: String,
    /// Non-empty and free of duplicates, in request order.
    pub prescription_ids: Vec<i32>,
}

impl NewOrder {
    /// Validates the raw request fields. Nothing touches the store when this fails.
    pub fn new(
        patient_id: Option<i32>,
        shipping_address: Option<String>,
        prescription_ids: Option<Vec<i32>>,
    ) -> Result<Self, AppError> {
        let missing = || {
            AppError::BadRequest(
                "patient_id, shipping_address, and a list of prescription_ids are required".into(),
            )
        };

        let patient_id = patient_id.filter(|id| *id > 0).ok_or_else(missing)?;
        let shipping_address = shipping_address
            .filter(|address| !address.trim().is_empty())
            .ok_or_else(missing)?;
        let requested = prescription_ids.filter(|ids| !ids.is_empty()).ok_or_else(missing)?;

        let mut prescription_ids = Vec::with_capacity(requested.len());
        for id in requested {
            if !prescription_ids.contains(&id) {
                prescription_ids.push(id);
            }
        }

        Ok(Self {
            patient_id,
            shipping_address,
            prescription_ids,
        })
    }
}

/// Creates the order, links every prescription to it and flags them as
/// ordered, all in one transaction. Returns the new order id.
pub async fn place_order(conn: &mut AsyncPgConnection, order: NewOrder) -> Result<i32, AppError> {
    let NewOrder {
        patient_id,
        shipping_address,
        prescription_ids,
    } = order;

    conn.transaction(move |conn| {
        Box::pin(async move {
            let order_id: i32 = diesel::insert_into(pharmacy_orders::table)
                .values(CreatePharmacyOrderEntity {
                    patient_id,
                    shipping_address,
                    status: INITIAL_ORDER_STATUS.into(),
                })
                .returning(pharmacy_orders::order_id)
                .get_result(conn)
                .await?;

            let items: Vec<OrderItemEntity> = prescription_ids
                .iter()
                .map(|&prescription_id| OrderItemEntity {
                    order_id,
                    prescription_id,
                })
                .collect();

            diesel::insert_into(order_items::table)
                .values(&items)
                .execute(conn)
                .await?;

            let flagged = diesel::update(
                prescriptions::table.filter(prescriptions::prescription_id.eq_any(&prescription_ids)),
            )
            .set(prescriptions::is_ordered.eq(true))
            .execute(conn)
            .await?;

            tracing::debug!(order_id, flagged, "Flagged prescriptions as ordered");

            Ok::<i32, AppError>(order_id)
        })
    })
    .await
    .map_err(|err| err.on_invalid_reference("Invalid patient_id or prescription_id"))
}

/// One row of the order history join.
#[derive(Queryable, Debug, Clone, PartialEq)]
pub struct OrderHistoryRow {
    pub order_id: i32,
    pub order_date: DateTime<Utc>,
    pub status: String,
    pub medication_name: String,
    pub dosage: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct OrderSummary {
    pub order_id: i32,
    pub order_date: DateTime<Utc>,
    pub status: String,
    pub items: Vec<String>,
}

pub fn format_item(medication_name: &str, dosage: &str) -> String {
    format!("{} ({})", medication_name, dosage)
}

/// Folds flat history rows into one summary per order.
///
/// Summaries come out in the order their first row was seen, and each
/// summary's items keep the relative order of their rows.
pub fn group_order_rows(rows: impl IntoIterator<Item = OrderHistoryRow>) -> Vec<OrderSummary> {
    let mut summaries: Vec<OrderSummary> = Vec::new();
    let mut positions: HashMap<i32, usize> = HashMap::new();

    for row in rows {
        let item = format_item(&row.medication_name, &row.dosage);
        match positions.get(&row.order_id) {
            Some(&index) => summaries[index].items.push(item),
            None => {
                positions.insert(row.order_id, summaries.len());
                summaries.push(OrderSummary {
                    order_id: row.order_id,
                    order_date: row.order_date,
                    status: row.status,
                    items: vec![item],
                });
            }
        }
    }

    summaries
}

/// Loads a patient's orders, newest first, each with its items.
pub async fn list_orders(
    conn: &mut AsyncPgConnection,
    patient_id: i32,
) -> Result<Vec<OrderSummary>, AppError> {
    let rows: Vec<OrderHistoryRow> = pharmacy_orders::table
        .inner_join(order_items::table.inner_join(prescriptions::table))
        .filter(pharmacy_orders::patient_id.eq(patient_id))
        .order_by((
            pharmacy_orders::order_date.desc(),
            pharmacy_orders::order_id.desc(),
            prescriptions::prescription_id.asc(),
        ))
        .select((
            pharmacy_orders::order_id,
            pharmacy_orders::order_date,
            pharmacy_orders::status,
            prescriptions::medication_name,
            prescriptions::dosage,
        ))
        .load(conn)
        .await?;

    Ok(group_order_rows(rows))
}
