pub mod common;
pub mod companies;
pub mod industries;
pub mod invoices;
pub mod system;

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// Assemble every resource router under its path prefix, plus the
/// health endpoints at the root.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/companies", companies::create_companies_router())
        .nest("/invoices", invoices::create_invoices_router())
        .nest("/industries", industries::create_industries_router())
        .merge(system::create_system_router())
}
