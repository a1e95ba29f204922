//! SQL functions defined for the lifetime of a single session.
use std::fmt;

use serde::{Deserialize, Serialize};

/// Catalog and schema that session functions live under.
pub const SESSION_FUNCTION_CATALOG: &str = "system";
pub const SESSION_FUNCTION_SCHEMA: &str = "session";

/// Fully qualified function name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedFunctionName {
    pub catalog: String,
    pub schema: String,
    pub name: String,
}

impl QualifiedFunctionName {
    pub fn new(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        QualifiedFunctionName {
            catalog: catalog.into(),
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Name in the schema used for session scoped functions.
    pub fn session_scoped(name: impl Into<String>) -> Self {
        Self::new(SESSION_FUNCTION_CATALOG, SESSION_FUNCTION_SCHEMA, name)
    }
}

impl fmt::Display for QualifiedFunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.catalog, self.schema, self.name)
    }
}

/// Identifies an overload of a function by name and argument types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SqlFunctionId {
    pub name: QualifiedFunctionName,
    pub argument_types: Vec<String>,
}

impl fmt::Display for SqlFunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.argument_types.join(","))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionParameter {
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionLanguage {
    #[default]
    Sql,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Determinism {
    #[default]
    Deterministic,
    NotDeterministic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NullCallClause {
    ReturnsNullOnNullInput,
    #[default]
    CalledOnNullInput,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineCharacteristics {
    pub language: FunctionLanguage,
    pub determinism: Determinism,
    pub null_call_clause: NullCallClause,
}

/// A function defined in SQL by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlInvokedFunction {
    pub name: QualifiedFunctionName,
    pub parameters: Vec<FunctionParameter>,
    pub return_type: String,
    pub description: String,
    pub characteristics: RoutineCharacteristics,
    /// Body of the function, not validated here.
    pub body: String,
}

impl SqlInvokedFunction {
    /// Id of this function, derived from its name and parameter types.
    pub fn function_id(&self) -> SqlFunctionId {
        SqlFunctionId {
            name: self.name.clone(),
            argument_types: self
                .parameters
                .iter()
                .map(|p| p.type_name.clone())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_id_from_signature() {
        let func = SqlInvokedFunction {
            name: QualifiedFunctionName::session_scoped("add_one"),
            parameters: vec![FunctionParameter {
                name: "x".to_string(),
                type_name: "bigint".to_string(),
            }],
            return_type: "bigint".to_string(),
            description: String::new(),
            characteristics: RoutineCharacteristics::default(),
            body: "RETURN x + 1".to_string(),
        };

        let id = func.function_id();
        assert_eq!("system.session.add_one(bigint)", id.to_string());
    }
}
