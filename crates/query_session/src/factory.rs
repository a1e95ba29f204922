use std::sync::Arc;

use tracing::info;

use crate::access::AccessControl;
use crate::config::SqlEnvironmentConfig;
use crate::context::RequestContext;
use crate::errors::Result;
use crate::identity::{AuthorizationOutcome, IdentityOverrides};
use crate::ids::QueryId;
use crate::locale::Locale;
use crate::properties::PropertyRegistry;
use crate::session::{Session, SessionBuilder};
use crate::timezone::TimeZoneKey;
use crate::transaction::TransactionRegistry;
use crate::warnings::WarningCollectorFactory;

/// Creates the session for every query admitted by the server.
///
/// Holds no per-query state and can be shared between any number of request
/// handlers.
#[derive(Debug, Clone)]
pub struct SessionFactory {
    transactions: Arc<dyn TransactionRegistry>,
    access_control: Arc<dyn AccessControl>,
    properties: Arc<dyn PropertyRegistry>,
    /// Overrides any time zone requested by clients.
    forced_time_zone: Option<TimeZoneKey>,
}

impl SessionFactory {
    /// Create a new factory.
    ///
    /// Errors if the configured forced time zone can't be resolved.
    pub fn try_new(
        transactions: Arc<dyn TransactionRegistry>,
        access_control: Arc<dyn AccessControl>,
        properties: Arc<dyn PropertyRegistry>,
        config: &SqlEnvironmentConfig,
    ) -> Result<Self> {
        let forced_time_zone = config.forced_time_zone_key()?;
        Ok(SessionFactory {
            transactions,
            access_control,
            properties,
            forced_time_zone,
        })
    }

    pub fn forced_time_zone(&self) -> Option<TimeZoneKey> {
        self.forced_time_zone
    }

    /// Create the session for a query.
    ///
    /// Steps run in a fixed order, later steps may depend on state produced
    /// by earlier ones. Any error aborts construction.
    pub fn create_session(
        &self,
        query_id: QueryId,
        context: &RequestContext,
        warning_collector_factory: &dyn WarningCollectorFactory,
        authorization: Option<&AuthorizationOutcome>,
    ) -> Result<Session> {
        let identity = match authorization {
            Some(outcome) => {
                let identity = context.identity.derive(IdentityOverrides::from(outcome));
                info!(
                    query_id = %query_id,
                    user = %identity.user(),
                    authorized_user = %outcome.authorized_user,
                    "query user replaced by authorized user"
                );
                identity
            }
            None => context.identity.clone(),
        };

        let mut builder = SessionBuilder::new(query_id, identity, self.properties.clone());
        builder
            .set_source(context.source.clone())
            .set_catalog(context.catalog.clone())
            .set_schema(context.schema.clone())
            .set_remote_user_address(context.remote_user_address.clone())
            .set_user_agent(context.user_agent.clone())
            .set_client_info(context.client_info.clone())
            .set_client_tags(context.client_tags.clone())
            .set_trace_token(context.trace_token.clone())
            .set_resource_estimates(context.resource_estimates.clone())
            .set_tracer(context.tracer.clone());

        if let Some(forced) = self.forced_time_zone {
            builder.set_time_zone_key(forced);
        } else if let Some(zone_id) = non_empty(&context.time_zone_id) {
            builder.set_time_zone_key(TimeZoneKey::parse(zone_id)?);
        }

        if let Some(tag) = non_empty(&context.language) {
            builder.set_locale(Locale::parse(tag)?);
        }

        for (name, value) in &context.system_properties {
            builder.set_system_property(name.as_str(), value.as_str())?;
        }

        for (catalog, props) in &context.catalog_properties {
            for (name, value) in props {
                builder.set_catalog_property(catalog.as_str(), name.as_str(), value.as_str())?;
            }
        }

        for (name, statement) in &context.prepared_statements {
            builder.add_prepared_statement(name.as_str(), statement.as_str());
        }

        if context.client_transaction_support {
            builder.set_client_transaction_support();
        }

        for (id, function) in &context.session_functions {
            builder.add_session_function(id.clone(), function.clone());
        }

        // Must come after the system properties are copied to the builder.
        let collector = warning_collector_factory.create(builder.warning_handling_level());
        builder.set_warning_collector(collector);

        let session = builder.build();
        match context.transaction_id {
            Some(transaction_id) => session.begin_transaction_id(
                transaction_id,
                self.transactions.as_ref(),
                self.access_control.as_ref(),
            ),
            None => Ok(session),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
