//! CRM core.
//!
//! Each store owns an explicitly injected [`DatabaseConnection`] and runs
//! every write inside a single transaction. Deal stages are validated against
//! the fixed pipeline before anything reaches storage.

pub mod companies;
pub mod contacts;
pub mod deals;
pub mod error;
mod filter;
pub mod pagination;
pub mod seed;
pub mod stage;
mod validate;

pub use companies::{CompanyDeletion, CompanyFilter, CompanyOrder, CompanyPatch, CompanyStore, NewCompany};
pub use contacts::{ContactFilter, ContactPatch, ContactStore, NewContact};
pub use deals::{DealFilter, DealOrder, DealPatch, DealStore, NewDeal};
pub use entity::Stage;
pub use error::{CrmError, CrmResult};
pub use pagination::Page;
pub use seed::{SeedReport, seed_demo};
pub use stage::{stage_keys, validate_stage};

pub use sea_orm::DatabaseConnection;
