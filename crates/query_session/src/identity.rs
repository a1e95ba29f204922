use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Authenticated principal backing an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub name: String,
}

impl Principal {
    pub fn new(name: impl Into<String>) -> Self {
        Principal { name: name.into() }
    }
}

/// Role selected for a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectedRole {
    Role(String),
    All,
    None,
}

/// Token handed to a connector's extra authenticator.
///
/// The value never shows up in debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthenticatorToken(String);

impl AuthenticatorToken {
    pub fn new(token: impl Into<String>) -> Self {
        AuthenticatorToken(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthenticatorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthenticatorToken(<redacted>)")
    }
}

/// Result of an authorization layer changing the effective user of a query,
/// for example through impersonation or role assumption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationOutcome {
    pub authorized_user: String,
    pub reason: Option<String>,
}

impl AuthorizationOutcome {
    pub fn new(authorized_user: impl Into<String>, reason: Option<String>) -> Self {
        AuthorizationOutcome {
            authorized_user: authorized_user.into(),
            reason,
        }
    }
}

/// Fields that may differ between an identity and one derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityOverrides {
    pub authorized_user: Option<String>,
    pub reason_for_override: Option<String>,
}

impl From<&AuthorizationOutcome> for IdentityOverrides {
    fn from(outcome: &AuthorizationOutcome) -> Self {
        IdentityOverrides {
            authorized_user: Some(outcome.authorized_user.clone()),
            reason_for_override: outcome.reason.clone(),
        }
    }
}

/// Who is running a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user: String,
    principal: Option<Principal>,
    /// Catalog name to selected role.
    roles: BTreeMap<String, SelectedRole>,
    extra_credentials: BTreeMap<String, String>,
    extra_authenticators: BTreeMap<String, AuthenticatorToken>,
    authorized_user: Option<String>,
    reason_for_override: Option<String>,
}

impl Identity {
    pub fn new(user: impl Into<String>) -> Self {
        Identity {
            user: user.into(),
            principal: None,
            roles: BTreeMap::new(),
            extra_credentials: BTreeMap::new(),
            extra_authenticators: BTreeMap::new(),
            authorized_user: None,
            reason_for_override: None,
        }
    }

    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn with_role(mut self, catalog: impl Into<String>, role: SelectedRole) -> Self {
        self.roles.insert(catalog.into(), role);
        self
    }

    pub fn with_extra_credential(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_credentials.insert(name.into(), value.into());
        self
    }

    pub fn with_extra_authenticator(
        mut self,
        name: impl Into<String>,
        token: AuthenticatorToken,
    ) -> Self {
        self.extra_authenticators.insert(name.into(), token);
        self
    }

    /// Derive a new identity with the override fields replaced.
    ///
    /// User, principal, roles, credentials and authenticators are copied
    /// verbatim.
    pub fn derive(&self, overrides: IdentityOverrides) -> Identity {
        Identity {
            user: self.user.clone(),
            principal: self.principal.clone(),
            roles: self.roles.clone(),
            extra_credentials: self.extra_credentials.clone(),
            extra_authenticators: self.extra_authenticators.clone(),
            authorized_user: overrides.authorized_user,
            reason_for_override: overrides.reason_for_override,
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn roles(&self) -> &BTreeMap<String, SelectedRole> {
        &self.roles
    }

    pub fn extra_credentials(&self) -> &BTreeMap<String, String> {
        &self.extra_credentials
    }

    pub fn extra_authenticators(&self) -> &BTreeMap<String, AuthenticatorToken> {
        &self.extra_authenticators
    }

    pub fn authorized_user(&self) -> Option<&str> {
        self.authorized_user.as_deref()
    }

    pub fn reason_for_override(&self) -> Option<&str> {
        self.reason_for_override.as_deref()
    }

    /// The user access checks should be made against.
    pub fn effective_user(&self) -> &str {
        self.authorized_user.as_deref().unwrap_or(&self.user)
    }
}
