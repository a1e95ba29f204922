use super::{PropertyKind, PropertyMetadata};

pub const WARNING_HANDLING: &str = "warning_handling";
pub const QUERY_MAX_RUN_TIME_MS: &str = "query_max_run_time_ms";
pub const JOIN_DISTRIBUTION_TYPE: &str = "join_distribution_type";
pub const HASH_PARTITION_COUNT: &str = "hash_partition_count";
pub const OPTIMIZE_HASH_GENERATION: &str = "optimize_hash_generation";
pub const QUERY_PRIORITY: &str = "query_priority";
pub const LEGACY_TIMESTAMP: &str = "legacy_timestamp";

pub(super) const WARNING_HANDLING_PROPERTY: PropertyMetadata = PropertyMetadata {
    name: WARNING_HANDLING,
    description: "How warnings raised while planning and executing a query are handled",
    kind: PropertyKind::Enum(&["NONE", "SUPPRESS", "NORMAL", "AS_ERROR"]),
    default_value: "NORMAL",
};

pub(super) const QUERY_MAX_RUN_TIME_MS_PROPERTY: PropertyMetadata = PropertyMetadata {
    name: QUERY_MAX_RUN_TIME_MS,
    description: "Maximum run time of a query in milliseconds, 0 for no limit",
    kind: PropertyKind::Integer,
    default_value: "0",
};

pub(super) const JOIN_DISTRIBUTION_TYPE_PROPERTY: PropertyMetadata = PropertyMetadata {
    name: JOIN_DISTRIBUTION_TYPE,
    description: "Join distribution type",
    kind: PropertyKind::Enum(&["AUTOMATIC", "BROADCAST", "PARTITIONED"]),
    default_value: "AUTOMATIC",
};

pub(super) const HASH_PARTITION_COUNT_PROPERTY: PropertyMetadata = PropertyMetadata {
    name: HASH_PARTITION_COUNT,
    description: "Number of partitions for distributed joins and aggregations",
    kind: PropertyKind::Integer,
    default_value: "100",
};

pub(super) const OPTIMIZE_HASH_GENERATION_PROPERTY: PropertyMetadata = PropertyMetadata {
    name: OPTIMIZE_HASH_GENERATION,
    description: "Compute hash codes for distribution, joins, and aggregations early in query plan",
    kind: PropertyKind::Boolean,
    default_value: "true",
};

pub(super) const QUERY_PRIORITY_PROPERTY: PropertyMetadata = PropertyMetadata {
    name: QUERY_PRIORITY,
    description: "The priority of queries, larger numbers are higher priority",
    kind: PropertyKind::Integer,
    default_value: "1",
};

pub(super) const LEGACY_TIMESTAMP_PROPERTY: PropertyMetadata = PropertyMetadata {
    name: LEGACY_TIMESTAMP,
    description: "Use legacy TIME and TIMESTAMP semantics",
    kind: PropertyKind::Boolean,
    default_value: "true",
};

pub(super) const BUILTIN_SYSTEM_PROPERTIES: &[PropertyMetadata] = &[
    WARNING_HANDLING_PROPERTY,
    QUERY_MAX_RUN_TIME_MS_PROPERTY,
    JOIN_DISTRIBUTION_TYPE_PROPERTY,
    HASH_PARTITION_COUNT_PROPERTY,
    OPTIMIZE_HASH_GENERATION_PROPERTY,
    QUERY_PRIORITY_PROPERTY,
    LEGACY_TIMESTAMP_PROPERTY,
];
