use sea_orm::error::DbErr;

use crate::validation;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    /// One message per violated field, in field-name order.
    #[error("Validation error: {}", .0.join("; "))]
    ValidationError(Vec<String>),

    #[error("Conflict: a product with SKU '{sku}' already exists")]
    Conflict { sku: String },

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(validation::field_messages(&err))
    }
}

impl ServiceError {
    /// Single-message validation failure.
    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::ValidationError(vec![message.into()])
    }

    /// Messages carried by a validation failure; empty for every other variant.
    pub fn validation_messages(&self) -> &[String] {
        match self {
            Self::ValidationError(messages) => messages,
            _ => &[],
        }
    }

    /// True for failures that were resolved locally and never reached the store.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::Conflict { .. })
    }
}
