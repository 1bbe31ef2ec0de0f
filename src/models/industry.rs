use serde::Serialize;

/// Row model for the industries table.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Industry {
    pub code: String,
    pub industry: String,
}

/// Listing view grouping the codes of associated companies per industry.
/// An industry with no associations carries an empty list.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct IndustryWithCompanies {
    pub code: String,
    pub industry: String,
    pub companies: Vec<String>,
}
