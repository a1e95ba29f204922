//! Serializable form of a session for shipping to workers.
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::context::ResourceEstimates;
use crate::errors::Result;
use crate::functions::{SqlFunctionId, SqlInvokedFunction};
use crate::identity::{Identity, IdentityOverrides, Principal, SelectedRole};
use crate::ids::{QueryId, TransactionId};
use crate::locale::Locale;
use crate::properties::PropertyRegistry;
use crate::session::{Session, SessionBuilder};
use crate::timezone::TimeZoneKey;
use crate::warnings::WarningCollector;

/// Everything about a session that can leave the process.
///
/// Extra authenticator tokens, the tracer and the warning collector are local
/// to the coordinator and are not included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRepresentation {
    pub query_id: QueryId,
    pub transaction_id: Option<TransactionId>,
    pub client_transaction_support: bool,
    pub user: String,
    pub principal: Option<Principal>,
    pub roles: BTreeMap<String, SelectedRole>,
    pub extra_credentials: BTreeMap<String, String>,
    pub authorized_user: Option<String>,
    pub reason_for_override: Option<String>,
    pub source: Option<String>,
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub time_zone: Option<String>,
    pub locale: Option<String>,
    pub remote_user_address: Option<String>,
    pub user_agent: Option<String>,
    pub client_info: Option<String>,
    pub client_tags: BTreeSet<String>,
    pub trace_token: Option<String>,
    pub resource_estimates: ResourceEstimates,
    pub start_time: DateTime<Utc>,
    pub system_properties: IndexMap<String, String>,
    pub catalog_properties: IndexMap<String, IndexMap<String, String>>,
    pub prepared_statements: IndexMap<String, String>,
    pub session_functions: Vec<(SqlFunctionId, SqlInvokedFunction)>,
}

impl Session {
    pub fn to_representation(&self) -> SessionRepresentation {
        let identity = &self.identity;
        SessionRepresentation {
            query_id: self.query_id.clone(),
            transaction_id: self.transaction_id,
            client_transaction_support: self.client_transaction_support,
            user: identity.user().to_string(),
            principal: identity.principal().cloned(),
            roles: identity.roles().clone(),
            extra_credentials: identity.extra_credentials().clone(),
            authorized_user: identity.authorized_user().map(str::to_string),
            reason_for_override: identity.reason_for_override().map(str::to_string),
            source: self.source.clone(),
            catalog: self.catalog.clone(),
            schema: self.schema.clone(),
            time_zone: self.time_zone_key.map(|key| key.id()),
            locale: self.locale.as_ref().map(Locale::to_language_tag),
            remote_user_address: self.remote_user_address.clone(),
            user_agent: self.user_agent.clone(),
            client_info: self.client_info.clone(),
            client_tags: self.client_tags.clone(),
            trace_token: self.trace_token.clone(),
            resource_estimates: self.resource_estimates.clone(),
            start_time: self.start_time,
            system_properties: self.system_properties.clone(),
            catalog_properties: self.catalog_properties.clone(),
            prepared_statements: self.prepared_statements.clone(),
            session_functions: self
                .session_functions
                .iter()
                .map(|(id, func)| (id.clone(), func.clone()))
                .collect(),
        }
    }
}

impl SessionRepresentation {
    /// Recreate a session on the receiving side.
    ///
    /// Property names are checked against the local registry. The transaction
    /// id is carried over as is since it was bound on the sending side.
    pub fn into_session(
        self,
        properties: Arc<dyn PropertyRegistry>,
        warning_collector: Arc<dyn WarningCollector>,
    ) -> Result<Session> {
        let mut identity = Identity::new(self.user);
        if let Some(principal) = self.principal {
            identity = identity.with_principal(principal);
        }
        for (catalog, role) in self.roles {
            identity = identity.with_role(catalog, role);
        }
        for (name, value) in self.extra_credentials {
            identity = identity.with_extra_credential(name, value);
        }
        let identity = identity.derive(IdentityOverrides {
            authorized_user: self.authorized_user,
            reason_for_override: self.reason_for_override,
        });

        let mut builder = SessionBuilder::new(self.query_id, identity, properties);
        builder
            .set_source(self.source)
            .set_catalog(self.catalog)
            .set_schema(self.schema)
            .set_remote_user_address(self.remote_user_address)
            .set_user_agent(self.user_agent)
            .set_client_info(self.client_info)
            .set_client_tags(self.client_tags)
            .set_trace_token(self.trace_token)
            .set_resource_estimates(self.resource_estimates)
            .set_start_time(self.start_time)
            .set_warning_collector(warning_collector);

        if let Some(zone) = self.time_zone {
            builder.set_time_zone_key(TimeZoneKey::parse(&zone)?);
        }
        if let Some(tag) = self.locale {
            builder.set_locale(Locale::parse(&tag)?);
        }
        if self.client_transaction_support {
            builder.set_client_transaction_support();
        }

        for (name, value) in self.system_properties {
            builder.set_system_property(name, value)?;
        }
        for (catalog, props) in self.catalog_properties {
            for (name, value) in props {
                builder.set_catalog_property(catalog.as_str(), name, value)?;
            }
        }
        for (name, statement) in self.prepared_statements {
            builder.add_prepared_statement(name, statement);
        }
        for (id, function) in self.session_functions {
            builder.add_session_function(id, function);
        }

        Ok(Session {
            transaction_id: self.transaction_id,
            ..builder.build()
        })
    }
}
