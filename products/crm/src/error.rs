use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub type CrmResult<T> = Result<T, CrmError>;

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("invalid stage `{candidate}`; use one of: {}", .valid.join(", "))]
    InvalidStage {
        candidate: String,
        valid: Vec<&'static str>,
    },
    #[error("{0}")]
    Validation(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    #[error("{0}")]
    Referential(String),
    #[error("database error: {0}")]
    Database(#[source] DbErr),
}

impl CrmError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn missing_company(company_id: i32) -> Self {
        Self::Referential(format!("company {company_id} does not exist"))
    }
}

impl From<DbErr> for CrmError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => Self::Referential(detail),
            _ => Self::Database(err),
        }
    }
}
