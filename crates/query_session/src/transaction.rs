//! Interface to the transaction manager.
use std::fmt::Debug;

use crate::ids::TransactionId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    #[error("Unknown transaction ID: {0}")]
    UnknownTransaction(TransactionId),

    #[error("Transaction is not active: {0}")]
    TransactionNotActive(TransactionId),

    #[error("Transaction {id} failed: {message}")]
    Failed { id: TransactionId, message: String },
}

/// Transactions that were started by earlier requests.
///
/// Implementations handle their own locking, sessions only make synchronous
/// lookups.
pub trait TransactionRegistry: Debug + Sync + Send {
    /// Check that a transaction exists and can have queries attached.
    fn check_transaction(&self, id: TransactionId) -> Result<(), TransactionError>;

    /// Check if a catalog is visible inside a transaction.
    fn catalog_exists(&self, id: TransactionId, catalog: &str) -> Result<bool, TransactionError>;
}
