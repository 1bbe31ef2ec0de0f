use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::company::Company;

/// Full row model for the invoices table.
///
/// `paid_date` is non-null exactly when `paid` was true at the last
/// update that changed the flag.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Invoice {
    pub id: i32,
    pub comp_code: String,
    pub amt: Decimal,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
}

/// Listing view: id and company code only; amounts and dates are
/// intentionally omitted.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct InvoiceSummary {
    pub id: i32,
    pub comp_code: String,
}

/// Detail view embedding the owning company. `company` stays null when
/// the referenced row is gone rather than failing the request.
#[derive(Debug, Serialize)]
pub struct InvoiceDetail {
    pub id: i32,
    pub amt: Decimal,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub comp_code: String,
    pub company: Option<Company>,
}
