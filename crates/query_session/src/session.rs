use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::debug;

use crate::access::AccessControl;
use crate::context::ResourceEstimates;
use crate::errors::{Result, SessionError};
use crate::functions::{SqlFunctionId, SqlInvokedFunction};
use crate::identity::Identity;
use crate::ids::{QueryId, TransactionId};
use crate::locale::Locale;
use crate::properties::{
    PropertyRegistry,
    PropertyValue,
    WARNING_HANDLING,
    require_catalog_property,
    require_system_property,
};
use crate::timezone::TimeZoneKey;
use crate::tracer::QueryTracer;
use crate::transaction::TransactionRegistry;
use crate::warnings::{NoopWarningCollector, WarningCollector, WarningHandlingLevel};

/// Immutable snapshot of everything planning and execution need to know about
/// the query being run.
///
/// The only change possible after construction is attaching a transaction
/// with [`Session::begin_transaction_id`], which produces a new session.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) query_id: QueryId,
    pub(crate) transaction_id: Option<TransactionId>,
    pub(crate) client_transaction_support: bool,
    pub(crate) identity: Identity,
    pub(crate) source: Option<String>,
    pub(crate) catalog: Option<String>,
    pub(crate) schema: Option<String>,
    pub(crate) time_zone_key: Option<TimeZoneKey>,
    pub(crate) locale: Option<Locale>,
    pub(crate) remote_user_address: Option<String>,
    pub(crate) user_agent: Option<String>,
    pub(crate) client_info: Option<String>,
    pub(crate) client_tags: BTreeSet<String>,
    pub(crate) trace_token: Option<String>,
    pub(crate) resource_estimates: ResourceEstimates,
    pub(crate) start_time: DateTime<Utc>,
    pub(crate) system_properties: IndexMap<String, String>,
    pub(crate) catalog_properties: IndexMap<String, IndexMap<String, String>>,
    pub(crate) prepared_statements: IndexMap<String, String>,
    pub(crate) session_functions: IndexMap<SqlFunctionId, SqlInvokedFunction>,
    pub(crate) warning_collector: Arc<dyn WarningCollector>,
    pub(crate) tracer: Option<Arc<dyn QueryTracer>>,
    pub(crate) properties: Arc<dyn PropertyRegistry>,
}

impl Session {
    pub fn query_id(&self) -> &QueryId {
        &self.query_id
    }

    pub fn transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }

    pub fn client_transaction_support(&self) -> bool {
        self.client_transaction_support
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Convenience for `identity().user()`.
    pub fn user(&self) -> &str {
        self.identity.user()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn catalog(&self) -> Option<&str> {
        self.catalog.as_deref()
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Time zone for the session, `None` if the engine default should be used.
    pub fn time_zone_key(&self) -> Option<TimeZoneKey> {
        self.time_zone_key
    }

    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    pub fn remote_user_address(&self) -> Option<&str> {
        self.remote_user_address.as_deref()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn client_info(&self) -> Option<&str> {
        self.client_info.as_deref()
    }

    pub fn client_tags(&self) -> &BTreeSet<String> {
        &self.client_tags
    }

    pub fn trace_token(&self) -> Option<&str> {
        self.trace_token.as_deref()
    }

    pub fn resource_estimates(&self) -> &ResourceEstimates {
        &self.resource_estimates
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Raw system property values explicitly set for this session.
    pub fn system_properties(&self) -> &IndexMap<String, String> {
        &self.system_properties
    }

    /// Raw property values for every catalog.
    pub fn all_catalog_properties(&self) -> &IndexMap<String, IndexMap<String, String>> {
        &self.catalog_properties
    }

    /// Raw property values set for a single catalog.
    pub fn catalog_properties(&self, catalog: &str) -> Option<&IndexMap<String, String>> {
        self.catalog_properties.get(catalog)
    }

    pub fn prepared_statements(&self) -> &IndexMap<String, String> {
        &self.prepared_statements
    }

    /// Get the SQL text of a prepared statement.
    pub fn prepared_statement(&self, name: &str) -> Result<&str> {
        self.prepared_statements
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| SessionError::PreparedStatementNotFound(name.to_string()))
    }

    pub fn session_functions(&self) -> &IndexMap<SqlFunctionId, SqlInvokedFunction> {
        &self.session_functions
    }

    pub fn warning_collector(&self) -> &Arc<dyn WarningCollector> {
        &self.warning_collector
    }

    pub fn tracer(&self) -> Option<&Arc<dyn QueryTracer>> {
        self.tracer.as_ref()
    }

    /// Get the typed value of a system property, falling back to the
    /// property's default if the session doesn't set it.
    pub fn system_property<T: PropertyValue>(&self, name: &str) -> Result<T> {
        let metadata = require_system_property(self.properties.as_ref(), name)?;
        let raw = self
            .system_properties
            .get(name)
            .map(String::as_str)
            .unwrap_or(metadata.default_value);

        T::try_parse(raw).ok_or_else(|| SessionError::InvalidPropertyValue {
            name: name.to_string(),
            value: raw.to_string(),
        })
    }

    /// Attach an existing transaction to this session, returning the bound
    /// session.
    ///
    /// Every session property is checked against the transaction and access
    /// control before binding. Errors from the collaborators are returned as
    /// is.
    pub fn begin_transaction_id(
        &self,
        transaction_id: TransactionId,
        transactions: &dyn TransactionRegistry,
        access_control: &dyn AccessControl,
    ) -> Result<Session> {
        if let Some(existing) = self.transaction_id {
            return Err(SessionError::TransactionAlreadyBound(existing));
        }

        transactions.check_transaction(transaction_id)?;

        for (name, value) in &self.system_properties {
            let metadata = require_system_property(self.properties.as_ref(), name)?;
            metadata.validate(value)?;
            access_control.check_can_set_system_property(&self.identity, name)?;
        }

        for (catalog, props) in &self.catalog_properties {
            if !transactions.catalog_exists(transaction_id, catalog)? {
                return Err(SessionError::UnknownCatalog(catalog.clone()));
            }

            for (name, value) in props {
                let metadata = require_catalog_property(self.properties.as_ref(), catalog, name)?;
                metadata.validate(value)?;
                access_control.check_can_set_catalog_property(
                    transaction_id,
                    &self.identity,
                    catalog,
                    name,
                )?;
            }
        }

        debug!(query_id = %self.query_id, %transaction_id, "bound session to transaction");

        Ok(Session {
            transaction_id: Some(transaction_id),
            ..self.clone()
        })
    }
}

/// Accumulates the pieces of a session.
///
/// Owned by a single construction, [`SessionBuilder::build`] consumes it.
#[derive(Debug)]
pub struct SessionBuilder {
    properties: Arc<dyn PropertyRegistry>,
    query_id: QueryId,
    identity: Identity,
    client_transaction_support: bool,
    source: Option<String>,
    catalog: Option<String>,
    schema: Option<String>,
    time_zone_key: Option<TimeZoneKey>,
    locale: Option<Locale>,
    remote_user_address: Option<String>,
    user_agent: Option<String>,
    client_info: Option<String>,
    client_tags: BTreeSet<String>,
    trace_token: Option<String>,
    resource_estimates: ResourceEstimates,
    start_time: Option<DateTime<Utc>>,
    system_properties: IndexMap<String, String>,
    catalog_properties: IndexMap<String, IndexMap<String, String>>,
    prepared_statements: IndexMap<String, String>,
    session_functions: IndexMap<SqlFunctionId, SqlInvokedFunction>,
    warning_collector: Option<Arc<dyn WarningCollector>>,
    tracer: Option<Arc<dyn QueryTracer>>,
}

impl SessionBuilder {
    pub fn new(query_id: QueryId, identity: Identity, properties: Arc<dyn PropertyRegistry>) -> Self {
        SessionBuilder {
            properties,
            query_id,
            identity,
            client_transaction_support: false,
            source: None,
            catalog: None,
            schema: None,
            time_zone_key: None,
            locale: None,
            remote_user_address: None,
            user_agent: None,
            client_info: None,
            client_tags: BTreeSet::new(),
            trace_token: None,
            resource_estimates: ResourceEstimates::default(),
            start_time: None,
            system_properties: IndexMap::new(),
            catalog_properties: IndexMap::new(),
            prepared_statements: IndexMap::new(),
            session_functions: IndexMap::new(),
            warning_collector: None,
            tracer: None,
        }
    }

    pub fn set_source(&mut self, source: Option<String>) -> &mut Self {
        self.source = source;
        self
    }

    pub fn set_catalog(&mut self, catalog: Option<String>) -> &mut Self {
        self.catalog = catalog;
        self
    }

    pub fn set_schema(&mut self, schema: Option<String>) -> &mut Self {
        self.schema = schema;
        self
    }

    pub fn set_remote_user_address(&mut self, address: Option<String>) -> &mut Self {
        self.remote_user_address = address;
        self
    }

    pub fn set_user_agent(&mut self, user_agent: Option<String>) -> &mut Self {
        self.user_agent = user_agent;
        self
    }

    pub fn set_client_info(&mut self, client_info: Option<String>) -> &mut Self {
        self.client_info = client_info;
        self
    }

    pub fn set_client_tags(&mut self, tags: BTreeSet<String>) -> &mut Self {
        self.client_tags = tags;
        self
    }

    pub fn set_trace_token(&mut self, token: Option<String>) -> &mut Self {
        self.trace_token = token;
        self
    }

    pub fn set_resource_estimates(&mut self, estimates: ResourceEstimates) -> &mut Self {
        self.resource_estimates = estimates;
        self
    }

    pub fn set_tracer(&mut self, tracer: Option<Arc<dyn QueryTracer>>) -> &mut Self {
        self.tracer = tracer;
        self
    }

    pub fn set_time_zone_key(&mut self, key: TimeZoneKey) -> &mut Self {
        self.time_zone_key = Some(key);
        self
    }

    pub fn set_locale(&mut self, locale: Locale) -> &mut Self {
        self.locale = Some(locale);
        self
    }

    /// Override the session start time, defaults to the time of `build`.
    pub fn set_start_time(&mut self, start_time: DateTime<Utc>) -> &mut Self {
        self.start_time = Some(start_time);
        self
    }

    /// Set a system property. The name must be known to the property
    /// registry, the value is validated when a transaction is bound.
    pub fn set_system_property(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self> {
        let name = name.into();
        require_system_property(self.properties.as_ref(), &name)?;
        self.system_properties.insert(name, value.into());
        Ok(self)
    }

    /// Set a property for a catalog. Setting the same property twice keeps
    /// the last value.
    pub fn set_catalog_property(
        &mut self,
        catalog: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self> {
        let catalog = catalog.into();
        let name = name.into();
        require_catalog_property(self.properties.as_ref(), &catalog, &name)?;
        self.catalog_properties
            .entry(catalog)
            .or_default()
            .insert(name, value.into());
        Ok(self)
    }

    pub fn add_prepared_statement(
        &mut self,
        name: impl Into<String>,
        statement: impl Into<String>,
    ) -> &mut Self {
        self.prepared_statements.insert(name.into(), statement.into());
        self
    }

    pub fn add_session_function(
        &mut self,
        id: SqlFunctionId,
        function: SqlInvokedFunction,
    ) -> &mut Self {
        self.session_functions.insert(id, function);
        self
    }

    pub fn set_client_transaction_support(&mut self) -> &mut Self {
        self.client_transaction_support = true;
        self
    }

    pub fn set_warning_collector(&mut self, collector: Arc<dyn WarningCollector>) -> &mut Self {
        self.warning_collector = Some(collector);
        self
    }

    /// Typed value of a system property set on this builder so far. Returns
    /// `None` if unset or if the value can't be parsed.
    pub fn system_property<T: PropertyValue>(&self, name: &str) -> Option<T> {
        self.system_properties
            .get(name)
            .and_then(|raw| T::try_parse(raw))
    }

    /// Warning handling level from the properties set so far.
    ///
    /// Falls back to the registry default, then to
    /// [`WarningHandlingLevel::Normal`].
    pub fn warning_handling_level(&self) -> WarningHandlingLevel {
        self.system_property(WARNING_HANDLING)
            .or_else(|| {
                self.properties
                    .system_property(WARNING_HANDLING)
                    .and_then(|meta| WarningHandlingLevel::try_parse(meta.default_value))
            })
            .unwrap_or_default()
    }

    pub fn build(self) -> Session {
        Session {
            query_id: self.query_id,
            transaction_id: None,
            client_transaction_support: self.client_transaction_support,
            identity: self.identity,
            source: self.source,
            catalog: self.catalog,
            schema: self.schema,
            time_zone_key: self.time_zone_key,
            locale: self.locale,
            remote_user_address: self.remote_user_address,
            user_agent: self.user_agent,
            client_info: self.client_info,
            client_tags: self.client_tags,
            trace_token: self.trace_token,
            resource_estimates: self.resource_estimates,
            start_time: self.start_time.unwrap_or_else(Utc::now),
            system_properties: self.system_properties,
            catalog_properties: self.catalog_properties,
            prepared_statements: self.prepared_statements,
            session_functions: self.session_functions,
            warning_collector: self
                .warning_collector
                .unwrap_or_else(|| Arc::new(NoopWarningCollector)),
            tracer: self.tracer,
            properties: self.properties,
        }
    }
}
