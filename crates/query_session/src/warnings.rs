//! Interfaces for collecting non-fatal query warnings.
use std::fmt::{self, Debug};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::properties::PropertyValue;

/// How warnings produced during a query are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningHandlingLevel {
    /// Warnings are dropped.
    None,
    /// Warnings are reported to the client.
    #[default]
    Normal,
    /// Warnings fail the query.
    AsError,
}

impl WarningHandlingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Normal => "NORMAL",
            Self::AsError => "AS_ERROR",
        }
    }
}

impl fmt::Display for WarningHandlingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PropertyValue for WarningHandlingLevel {
    fn try_parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" | "SUPPRESS" => Some(Self::None),
            "NORMAL" => Some(Self::Normal),
            "AS_ERROR" => Some(Self::AsError),
            _ => None,
        }
    }

    fn format(&self) -> String {
        self.as_str().to_string()
    }
}

impl FromStr for WarningHandlingLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s).ok_or_else(|| format!("Unknown warning handling level: {s}"))
    }
}

/// A warning raised while processing a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryWarning {
    pub code: u32,
    pub name: String,
    pub message: String,
}

/// Sink for the warnings of one query.
pub trait WarningCollector: Debug + Sync + Send {
    fn add(&self, warning: QueryWarning);

    /// All warnings collected so far.
    fn warnings(&self) -> Vec<QueryWarning>;

    fn has_warnings(&self) -> bool {
        !self.warnings().is_empty()
    }
}

/// Collector that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopWarningCollector;

impl WarningCollector for NoopWarningCollector {
    fn add(&self, _warning: QueryWarning) {}

    fn warnings(&self) -> Vec<QueryWarning> {
        Vec::new()
    }
}

/// Creates a warning collector for a new query.
pub trait WarningCollectorFactory: Sync + Send {
    fn create(&self, level: WarningHandlingLevel) -> Arc<dyn WarningCollector>;
}

impl<F> WarningCollectorFactory for F
where
    F: Fn(WarningHandlingLevel) -> Arc<dyn WarningCollector> + Sync + Send,
{
    fn create(&self, level: WarningHandlingLevel) -> Arc<dyn WarningCollector> {
        self(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_levels() {
        assert_eq!(Some(WarningHandlingLevel::None), WarningHandlingLevel::try_parse("NONE"));
        assert_eq!(
            Some(WarningHandlingLevel::None),
            WarningHandlingLevel::try_parse("suppress")
        );
        assert_eq!(
            Some(WarningHandlingLevel::AsError),
            WarningHandlingLevel::try_parse("as_error")
        );
        assert_eq!(None, WarningHandlingLevel::try_parse("LOUD"));
        assert_eq!("NORMAL", WarningHandlingLevel::default().format());
    }

    #[test]
    fn closure_factory() {
        let factory = |_level: WarningHandlingLevel| -> Arc<dyn WarningCollector> {
            Arc::new(NoopWarningCollector)
        };
        let collector = factory.create(WarningHandlingLevel::Normal);
        collector.add(QueryWarning {
            code: 1,
            name: "TEST".to_string(),
            message: "dropped".to_string(),
        });
        assert!(!collector.has_warnings());
    }
}
