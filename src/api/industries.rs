use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::api::common::{
    is_foreign_key_violation, is_unique_violation, validate_payload, ApiError, StatusAck,
};
use crate::models::{Industry, IndustryWithCompanies};
use crate::state::AppState;

// ============================================================================
// Request/Response Models
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CreateIndustryRequest {
    #[validate(length(min = 1, message = "code is required"))]
    pub code: String,
    #[validate(length(min = 1, message = "industry is required"))]
    pub industry: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AssociateCompanyRequest {
    #[validate(length(min = 1, message = "comp_code is required"))]
    pub comp_code: String,
}

#[derive(Debug, Serialize)]
pub struct IndustryListResponse {
    pub industries: Vec<IndustryWithCompanies>,
}

#[derive(Debug, Serialize)]
pub struct IndustryResponse {
    pub industry: Industry,
}

// ============================================================================
// Router
// ============================================================================

/// Create industries router
/// NOTE: Routes are relative - this router is nested under /industries
pub fn create_industries_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_industries))
        .route("/", post(create_industry))
        .route("/:code", post(associate_company))
}

// ============================================================================
// Endpoints
// ============================================================================

/// Create a new industry
/// POST /industries
pub async fn create_industry(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateIndustryRequest>,
) -> Result<(StatusCode, Json<IndustryResponse>), ApiError> {
    validate_payload(&payload)?;

    let industry = sqlx::query_as::<_, Industry>(
        "INSERT INTO industries (code, industry) VALUES ($1, $2) RETURNING code, industry",
    )
    .bind(&payload.code)
    .bind(&payload.industry)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict(format!("industry '{}' already exists", payload.code))
        } else {
            ApiError::from(e)
        }
    })?;

    info!("Created industry {}", industry.code);

    Ok((StatusCode::CREATED, Json(IndustryResponse { industry })))
}

/// List every industry with the codes of its associated companies.
/// Industries with no associations carry an empty list; the NULL the
/// outer join produces for them is stripped from the aggregate.
/// GET /industries
pub async fn list_industries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<IndustryListResponse>, ApiError> {
    let industries = sqlx::query_as::<_, IndustryWithCompanies>(
        "SELECT i.code, i.industry, \
                array_remove(array_agg(ci.comp_code ORDER BY ci.comp_code), NULL) AS companies \
         FROM industries AS i \
         LEFT JOIN companies_industries AS ci ON i.code = ci.industry_code \
         GROUP BY i.code, i.industry \
         ORDER BY i.code",
    )
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(IndustryListResponse { industries }))
}

/// Associate a company with an industry
/// POST /industries/:code
pub async fn associate_company(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Json(payload): Json<AssociateCompanyRequest>,
) -> Result<Json<StatusAck>, ApiError> {
    validate_payload(&payload)?;

    sqlx::query("INSERT INTO companies_industries (comp_code, industry_code) VALUES ($1, $2)")
        .bind(&payload.comp_code)
        .bind(&code)
        .execute(&state.db_pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                ApiError::UnprocessableEntity(format!(
                    "company '{}' or industry '{}' does not exist",
                    payload.comp_code, code
                ))
            } else if is_unique_violation(&e) {
                ApiError::Conflict(format!(
                    "company '{}' is already associated with industry '{}'",
                    payload.comp_code, code
                ))
            } else {
                ApiError::from(e)
            }
        })?;

    info!("Associated company {} with industry {}", payload.comp_code, code);

    Ok(Json(StatusAck::associated()))
}
