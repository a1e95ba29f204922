//! Interface to access control.
use std::fmt::Debug;

use crate::identity::Identity;
use crate::ids::TransactionId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Access Denied: {message}")]
pub struct AccessDeniedError {
    pub message: String,
}

impl AccessDeniedError {
    pub fn new(message: impl Into<String>) -> Self {
        AccessDeniedError {
            message: message.into(),
        }
    }
}

/// Decides if an identity may set session properties.
pub trait AccessControl: Debug + Sync + Send {
    fn check_can_set_system_property(
        &self,
        identity: &Identity,
        property: &str,
    ) -> Result<(), AccessDeniedError>;

    fn check_can_set_catalog_property(
        &self,
        transaction_id: TransactionId,
        identity: &Identity,
        catalog: &str,
        property: &str,
    ) -> Result<(), AccessDeniedError>;
}

/// Access control that allows everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllAccessControl;

impl AccessControl for AllowAllAccessControl {
    fn check_can_set_system_property(
        &self,
        _identity: &Identity,
        _property: &str,
    ) -> Result<(), AccessDeniedError> {
        Ok(())
    }

    fn check_can_set_catalog_property(
        &self,
        _transaction_id: TransactionId,
        _identity: &Identity,
        _catalog: &str,
        _property: &str,
    ) -> Result<(), AccessDeniedError> {
        Ok(())
    }
}
