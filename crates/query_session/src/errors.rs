use crate::access::AccessDeniedError;
use crate::ids::TransactionId;
use crate::transaction::TransactionError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid query id: {0}")]
    InvalidQueryId(String),

    #[error("Time zone not supported: {0}")]
    InvalidTimeZone(String),

    #[error("Invalid language tag: {0}")]
    InvalidLanguageTag(String),

    #[error("Unknown system session property: {0}")]
    UnknownSystemProperty(String),

    #[error("Unknown session property: {catalog}.{name}")]
    UnknownCatalogProperty { catalog: String, name: String },

    #[error("Invalid value for session property: Property name: {name}, Value: {value}")]
    InvalidPropertyValue { name: String, value: String },

    #[error("Session property catalog does not exist: {0}")]
    UnknownCatalog(String),

    #[error("Prepared statement not found: {0}")]
    PreparedStatementNotFound(String),

    #[error("Session already has an active transaction: {0}")]
    TransactionAlreadyBound(TransactionId),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    AccessDenied(#[from] AccessDeniedError),
}

/// Coarse classification of a [`SessionError`], used by the request layer to
/// pick a response code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionErrorKind {
    InvalidArgument,
    UnknownProperty,
    NotFound,
    Transaction,
    AccessDenied,
}

impl SessionError {
    pub fn kind(&self) -> SessionErrorKind {
        match self {
            Self::InvalidQueryId(_)
            | Self::InvalidTimeZone(_)
            | Self::InvalidLanguageTag(_)
            | Self::InvalidPropertyValue { .. } => SessionErrorKind::InvalidArgument,
            Self::UnknownSystemProperty(_) | Self::UnknownCatalogProperty { .. } => {
                SessionErrorKind::UnknownProperty
            }
            Self::UnknownCatalog(_) | Self::PreparedStatementNotFound(_) => {
                SessionErrorKind::NotFound
            }
            Self::TransactionAlreadyBound(_) | Self::Transaction(_) => {
                SessionErrorKind::Transaction
            }
            Self::AccessDenied(_) => SessionErrorKind::AccessDenied,
        }
    }
}

pub type Result<T, E = SessionError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_errors_keep_their_message() {
        let id = TransactionId::new();
        let err: SessionError = TransactionError::UnknownTransaction(id).into();
        assert_eq!(format!("Unknown transaction ID: {id}"), err.to_string());
        assert_eq!(SessionErrorKind::Transaction, err.kind());

        let err: SessionError = AccessDeniedError::new("Cannot set system session property x").into();
        assert_eq!(
            "Access Denied: Cannot set system session property x",
            err.to_string()
        );
        assert_eq!(SessionErrorKind::AccessDenied, err.kind());
    }
}
