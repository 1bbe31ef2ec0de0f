pub mod company;
pub mod industry;
pub mod invoice;

pub use company::{Company, CompanyDetail, CompanySummary};
pub use industry::{Industry, IndustryWithCompanies};
pub use invoice::{Invoice, InvoiceDetail, InvoiceSummary};
