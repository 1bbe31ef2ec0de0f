use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::api::common::{is_unique_violation, validate_payload, ApiError, StatusAck};
use crate::models::{Company, CompanyDetail, CompanySummary};
use crate::state::AppState;
use crate::utils::slug::slugify;

// ============================================================================
// Request/Response Models
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    /// Explicit code; derived from the name when omitted.
    pub code: Option<String>,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompanyListResponse {
    pub companies: Vec<CompanySummary>,
}

#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub company: Company,
}

#[derive(Debug, Serialize)]
pub struct CompanyDetailResponse {
    pub company: CompanyDetail,
}

// ============================================================================
// Router
// ============================================================================

/// Create companies router
/// NOTE: Routes are relative - this router is nested under /companies
pub fn create_companies_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_companies))
        .route("/", post(create_company))
        .route("/:code", get(get_company))
        .route("/:code", put(update_company))
        .route("/:code", delete(delete_company))
}

// ============================================================================
// Endpoints
// ============================================================================

/// List all companies
/// GET /companies
pub async fn list_companies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CompanyListResponse>, ApiError> {
    let companies = sqlx::query_as::<_, CompanySummary>(
        "SELECT code, name FROM companies ORDER BY code",
    )
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(CompanyListResponse { companies }))
}

/// Get one company with its invoice ids and industry codes
/// GET /companies/:code
pub async fn get_company(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<CompanyDetailResponse>, ApiError> {
    let company = sqlx::query_as::<_, Company>(
        "SELECT code, name, description FROM companies WHERE code = $1",
    )
    .bind(&code)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("company '{}' not found", code)))?;

    let invoices: Vec<i32> =
        sqlx::query_scalar("SELECT id FROM invoices WHERE comp_code = $1 ORDER BY id")
            .bind(&code)
            .fetch_all(&state.db_pool)
            .await?;

    let industries: Vec<String> = sqlx::query_scalar(
        "SELECT industry_code FROM companies_industries WHERE comp_code = $1 ORDER BY industry_code",
    )
    .bind(&code)
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(CompanyDetailResponse {
        company: CompanyDetail {
            code: company.code,
            name: company.name,
            description: company.description,
            invoices,
            industries,
        },
    }))
}

/// Create a new company
/// POST /companies
pub async fn create_company(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyResponse>), ApiError> {
    validate_payload(&payload)?;

    let code = match payload.code.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => code.to_string(),
        _ => slugify(&payload.name),
    };
    if code.is_empty() {
        return Err(ApiError::BadRequest(
            "cannot derive a company code from the given name".to_string(),
        ));
    }

    let company = sqlx::query_as::<_, Company>(
        "INSERT INTO companies (code, name, description) VALUES ($1, $2, $3) \
         RETURNING code, name, description",
    )
    .bind(&code)
    .bind(payload.name.trim())
    .bind(&payload.description)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict(format!("company '{}' already exists", code))
        } else {
            ApiError::from(e)
        }
    })?;

    info!("Created company {}", company.code);

    Ok((StatusCode::CREATED, Json(CompanyResponse { company })))
}

/// Update a company's name and description; the code is immutable
/// PUT /companies/:code
pub async fn update_company(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Json(payload): Json<UpdateCompanyRequest>,
) -> Result<Json<CompanyResponse>, ApiError> {
    validate_payload(&payload)?;

    let company = sqlx::query_as::<_, Company>(
        "UPDATE companies SET name = $1, description = $2 WHERE code = $3 \
         RETURNING code, name, description",
    )
    .bind(payload.name.trim())
    .bind(&payload.description)
    .bind(&code)
    .fetch_optional(&state.db_pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict(format!("another company already uses the name '{}'", payload.name))
        } else {
            ApiError::from(e)
        }
    })?
    .ok_or_else(|| ApiError::NotFound(format!("company '{}' not found", code)))?;

    info!("Updated company {}", company.code);

    Ok(Json(CompanyResponse { company }))
}

/// Delete a company. Dependent invoices and industry associations are
/// removed by the schema's ON DELETE CASCADE.
/// DELETE /companies/:code
pub async fn delete_company(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<StatusAck>, ApiError> {
    let result = sqlx::query("DELETE FROM companies WHERE code = $1")
        .bind(&code)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(format!("company '{}' not found", code)));
    }

    info!("Deleted company {}", code);

    Ok(Json(StatusAck::deleted()))
}
