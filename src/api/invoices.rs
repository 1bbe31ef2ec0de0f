use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::api::common::{is_foreign_key_violation, validate_payload, ApiError, StatusAck};
use crate::models::{Company, Invoice, InvoiceDetail, InvoiceSummary};
use crate::state::AppState;

// ============================================================================
// Request/Response Models
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    #[validate(length(min = 1, message = "comp_code is required"))]
    pub comp_code: String,
    pub amt: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInvoiceRequest {
    pub amt: Decimal,
    pub paid: bool,
}

#[derive(Debug, Serialize)]
pub struct InvoiceListResponse {
    pub invoices: Vec<InvoiceSummary>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub invoice: Invoice,
}

#[derive(Debug, Serialize)]
pub struct InvoiceDetailResponse {
    pub invoice: InvoiceDetail,
}

/// Current paid state of an invoice, read under lock before an update.
#[derive(Debug, sqlx::FromRow)]
struct PaidState {
    paid: bool,
    paid_date: Option<NaiveDate>,
}

// ============================================================================
// Router
// ============================================================================

/// Create invoices router
/// NOTE: Routes are relative - this router is nested under /invoices
pub fn create_invoices_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_invoices))
        .route("/", post(create_invoice))
        .route("/:id", get(get_invoice))
        .route("/:id", put(update_invoice))
        .route("/:id", delete(delete_invoice))
}

// ============================================================================
// Paid transition
// ============================================================================

/// Applies the paid/paid_date transition rule.
///
/// Moving to paid stamps the current date, moving to unpaid clears the
/// date, and an unchanged flag keeps the stored date exactly as it is.
fn next_paid_date(
    currently_paid: bool,
    current_paid_date: Option<NaiveDate>,
    requested_paid: bool,
) -> Option<NaiveDate> {
    match (currently_paid, requested_paid) {
        (false, true) => Some(Utc::now().date_naive()),
        (true, false) => None,
        _ => current_paid_date,
    }
}

// ============================================================================
// Endpoints
// ============================================================================

/// List all invoices as id/comp_code pairs
/// GET /invoices
pub async fn list_invoices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<InvoiceListResponse>, ApiError> {
    let invoices = sqlx::query_as::<_, InvoiceSummary>(
        "SELECT id, comp_code FROM invoices ORDER BY id",
    )
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(InvoiceListResponse { invoices }))
}

/// Get one invoice with its company embedded
/// GET /invoices/:id
pub async fn get_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<InvoiceDetailResponse>, ApiError> {
    let invoice = sqlx::query_as::<_, Invoice>(
        "SELECT id, comp_code, amt, paid, add_date, paid_date FROM invoices WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("invoice {} not found", id)))?;

    // Foreign-key integrity makes a missing company unlikely; if the row
    // is gone anyway the field is null, never a failure.
    let company = sqlx::query_as::<_, Company>(
        "SELECT code, name, description FROM companies WHERE code = $1",
    )
    .bind(&invoice.comp_code)
    .fetch_optional(&state.db_pool)
    .await?;

    Ok(Json(InvoiceDetailResponse {
        invoice: InvoiceDetail {
            id: invoice.id,
            amt: invoice.amt,
            paid: invoice.paid,
            add_date: invoice.add_date,
            paid_date: invoice.paid_date,
            comp_code: invoice.comp_code,
            company,
        },
    }))
}

/// Create a new invoice; starts unpaid with add_date defaulting to today
/// POST /invoices
pub async fn create_invoice(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceResponse>), ApiError> {
    validate_payload(&payload)?;

    let invoice = sqlx::query_as::<_, Invoice>(
        "INSERT INTO invoices (comp_code, amt) VALUES ($1, $2) \
         RETURNING id, comp_code, amt, paid, add_date, paid_date",
    )
    .bind(&payload.comp_code)
    .bind(payload.amt)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            ApiError::UnprocessableEntity(format!(
                "company '{}' does not exist",
                payload.comp_code
            ))
        } else {
            ApiError::from(e)
        }
    })?;

    info!("Created invoice {} for company {}", invoice.id, invoice.comp_code);

    Ok((StatusCode::CREATED, Json(InvoiceResponse { invoice })))
}

/// Update an invoice's amount and paid flag, deriving paid_date
/// PUT /invoices/:id
///
/// Read-then-write runs inside one transaction with the row locked, so
/// two concurrent updates cannot interleave on the paid_date derivation.
pub async fn update_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateInvoiceRequest>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let mut tx = state.db_pool.begin().await?;

    let current = sqlx::query_as::<_, PaidState>(
        "SELECT paid, paid_date FROM invoices WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("invoice {} not found", id)))?;

    let paid_date = next_paid_date(current.paid, current.paid_date, payload.paid);

    let invoice = sqlx::query_as::<_, Invoice>(
        "UPDATE invoices SET amt = $1, paid = $2, paid_date = $3 WHERE id = $4 \
         RETURNING id, comp_code, amt, paid, add_date, paid_date",
    )
    .bind(payload.amt)
    .bind(payload.paid)
    .bind(paid_date)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        "Updated invoice {} (paid {} -> {})",
        id, current.paid, invoice.paid
    );

    Ok(Json(InvoiceResponse { invoice }))
}

/// Delete an invoice
/// DELETE /invoices/:id
pub async fn delete_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<StatusAck>, ApiError> {
    let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(format!("invoice {} not found", id)));
    }

    info!("Deleted invoice {}", id);

    Ok(Json(StatusAck::deleted()))
}
