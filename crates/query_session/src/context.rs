use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::functions::{SqlFunctionId, SqlInvokedFunction};
use crate::identity::Identity;
use crate::ids::TransactionId;
use crate::tracer::QueryTracer;

/// Client supplied hints about the resources a query will need.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEstimates {
    pub execution_time: Option<Duration>,
    pub cpu_time: Option<Duration>,
    pub peak_memory_bytes: Option<u64>,
    pub peak_task_memory_bytes: Option<u64>,
}

/// Everything the request layer extracted from an incoming query request.
///
/// Maps keep the order values were provided in by the client.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub identity: Identity,
    pub source: Option<String>,
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub remote_user_address: Option<String>,
    pub user_agent: Option<String>,
    pub client_info: Option<String>,
    pub client_tags: BTreeSet<String>,
    pub trace_token: Option<String>,
    pub resource_estimates: ResourceEstimates,
    pub tracer: Option<Arc<dyn QueryTracer>>,
    pub time_zone_id: Option<String>,
    pub language: Option<String>,
    pub system_properties: IndexMap<String, String>,
    /// Catalog name to property name to value.
    pub catalog_properties: IndexMap<String, IndexMap<String, String>>,
    /// Statement name to SQL text.
    pub prepared_statements: IndexMap<String, String>,
    pub session_functions: IndexMap<SqlFunctionId, SqlInvokedFunction>,
    pub client_transaction_support: bool,
    pub transaction_id: Option<TransactionId>,
}

impl RequestContext {
    /// Create a context for the given identity with everything else unset.
    pub fn new(identity: Identity) -> Self {
        RequestContext {
            identity,
            source: None,
            catalog: None,
            schema: None,
            remote_user_address: None,
            user_agent: None,
            client_info: None,
            client_tags: BTreeSet::new(),
            trace_token: None,
            resource_estimates: ResourceEstimates::default(),
            tracer: None,
            time_zone_id: None,
            language: None,
            system_properties: IndexMap::new(),
            catalog_properties: IndexMap::new(),
            prepared_statements: IndexMap::new(),
            session_functions: IndexMap::new(),
            client_transaction_support: false,
            transaction_id: None,
        }
    }
}
