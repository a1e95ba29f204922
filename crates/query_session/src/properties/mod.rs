//! Session property definitions and lookup.
mod constants;
mod value;

use std::collections::HashMap;
use std::fmt::Debug;

pub use constants::{
    HASH_PARTITION_COUNT,
    JOIN_DISTRIBUTION_TYPE,
    LEGACY_TIMESTAMP,
    OPTIMIZE_HASH_GENERATION,
    QUERY_MAX_RUN_TIME_MS,
    QUERY_PRIORITY,
    WARNING_HANDLING,
};
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::debug;
pub use value::PropertyValue;

use crate::errors::{Result, SessionError};

/// Type of values a property accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Boolean,
    Integer,
    Double,
    Varchar,
    /// One of a fixed set of values, compared case-insensitively.
    Enum(&'static [&'static str]),
}

impl PropertyKind {
    /// Check if a raw value is acceptable for this kind.
    pub fn accepts(&self, raw: &str) -> bool {
        match self {
            Self::Boolean => bool::try_parse(raw).is_some(),
            Self::Integer => i64::try_parse(raw).is_some(),
            Self::Double => f64::try_parse(raw).is_some(),
            Self::Varchar => true,
            Self::Enum(values) => values.iter().any(|v| v.eq_ignore_ascii_case(raw.trim())),
        }
    }
}

/// Static description of a session property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyMetadata {
    /// Name of the property.
    pub name: &'static str,

    /// Description of the property.
    pub description: &'static str,

    pub kind: PropertyKind,

    /// Value used when a session doesn't set the property.
    pub default_value: &'static str,
}

impl PropertyMetadata {
    /// Check that a raw value can be used for this property.
    pub fn validate(&self, raw: &str) -> Result<()> {
        if !self.kind.accepts(raw) {
            return Err(SessionError::InvalidPropertyValue {
                name: self.name.to_string(),
                value: raw.to_string(),
            });
        }
        Ok(())
    }
}

/// Knows which session properties exist.
pub trait PropertyRegistry: Debug + Sync + Send {
    /// Get metadata for a system property.
    fn system_property(&self, name: &str) -> Option<PropertyMetadata>;

    /// Get metadata for a property belonging to a catalog.
    fn catalog_property(&self, catalog: &str, name: &str) -> Option<PropertyMetadata>;
}

/// Look up a system property, erroring if it doesn't exist.
pub fn require_system_property(
    registry: &dyn PropertyRegistry,
    name: &str,
) -> Result<PropertyMetadata> {
    registry
        .system_property(name)
        .ok_or_else(|| SessionError::UnknownSystemProperty(name.to_string()))
}

/// Look up a catalog property, erroring if it doesn't exist.
pub fn require_catalog_property(
    registry: &dyn PropertyRegistry,
    catalog: &str,
    name: &str,
) -> Result<PropertyMetadata> {
    registry
        .catalog_property(catalog, name)
        .ok_or_else(|| SessionError::UnknownCatalogProperty {
            catalog: catalog.to_string(),
            name: name.to_string(),
        })
}

/// Registry holding the built-in system properties along with properties
/// registered by catalogs as they're attached.
#[derive(Debug)]
pub struct SessionPropertyRegistry {
    system: IndexMap<&'static str, PropertyMetadata>,
    catalogs: RwLock<HashMap<String, IndexMap<&'static str, PropertyMetadata>>>,
}

impl SessionPropertyRegistry {
    /// Create a registry with only the built-in system properties.
    pub fn new() -> Self {
        Self::with_system_properties(&[])
    }

    /// Create a registry with the built-in system properties plus `extra`.
    ///
    /// Panics if a property name is defined twice.
    pub fn with_system_properties(extra: &[PropertyMetadata]) -> Self {
        let mut system = IndexMap::new();
        for prop in constants::BUILTIN_SYSTEM_PROPERTIES.iter().chain(extra) {
            if system.insert(prop.name, *prop).is_some() {
                panic!("Duplicate session property names: {}", prop.name);
            }
        }

        SessionPropertyRegistry {
            system,
            catalogs: RwLock::new(HashMap::new()),
        }
    }

    /// Register the session properties for a catalog, replacing any
    /// previously registered for the same catalog.
    pub fn register_catalog_properties(
        &self,
        catalog: impl Into<String>,
        properties: &[PropertyMetadata],
    ) {
        let catalog = catalog.into();
        let props: IndexMap<_, _> = properties.iter().map(|p| (p.name, *p)).collect();
        debug!(%catalog, count = props.len(), "registering catalog session properties");
        self.catalogs.write().insert(catalog, props);
    }

    /// Remove a catalog's properties, returning if the catalog was registered.
    pub fn remove_catalog_properties(&self, catalog: &str) -> bool {
        self.catalogs.write().remove(catalog).is_some()
    }

    /// Iterate over all system properties in definition order.
    pub fn system_properties(&self) -> impl Iterator<Item = &PropertyMetadata> {
        self.system.values()
    }
}

impl Default for SessionPropertyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyRegistry for SessionPropertyRegistry {
    fn system_property(&self, name: &str) -> Option<PropertyMetadata> {
        self.system.get(name).copied()
    }

    fn catalog_property(&self, catalog: &str, name: &str) -> Option<PropertyMetadata> {
        self.catalogs.read().get(catalog)?.get(name).copied()
    }
}
