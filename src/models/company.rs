use serde::Serialize;

/// Full row model for the companies table.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Company {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

/// Listing view: code and name only.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CompanySummary {
    pub code: String,
    pub name: String,
}

/// Detail view with the ids of associated invoices and the codes of
/// associated industries. Both sequences may be empty.
#[derive(Debug, Serialize)]
pub struct CompanyDetail {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub invoices: Vec<i32>,
    pub industries: Vec<String>,
}
