use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Result, SessionError};

static QUERY_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[_a-z0-9]+$").unwrap());

/// Identifier for a single query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QueryId(String);

impl QueryId {
    /// Parse a query id, only lowercase ascii alphanumerics and underscores are
    /// allowed.
    pub fn parse(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if !QUERY_ID_RE.is_match(&id) {
            return Err(SessionError::InvalidQueryId(id));
        }
        Ok(QueryId(id))
    }

    /// Generate a new unique query id prefixed with the current UTC time.
    pub fn generate() -> Self {
        let now = Utc::now().format("%Y%m%d_%H%M%S");
        QueryId(format!("{now}_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for QueryId {
    type Error = SessionError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<QueryId> for String {
    fn from(value: QueryId) -> Self {
        value.0
    }
}

/// Identifier for a transaction started by a previous request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    pub fn new() -> Self {
        TransactionId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TransactionId {
    fn from(value: Uuid) -> Self {
        TransactionId(value)
    }
}

impl FromStr for TransactionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(TransactionId(Uuid::parse_str(s)?))
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
