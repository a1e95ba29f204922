
use std::sync::Arc;

use indexmap::IndexMap;
use query_session::access::AllowAllAccessControl;
use query_session::config::SqlEnvironmentConfig;
use query_session::context::RequestContext;
use query_session::identity::Identity;
use query_session::ids::TransactionId;
use query_session::properties::WARNING_HANDLING;
use query_session::transaction::TransactionError;
use query_session::warnings::{NoopWarningCollector, WarningCollector, WarningHandlingLevel};
use query_session::{Session, SessionError, SessionErrorKind};
use setup::*;

fn noop_collectors(_level: WarningHandlingLevel) -> Arc<dyn WarningCollector> {
    Arc::new(NoopWarningCollector)
}

fn unbound_session(env: &TestEnv, context: &RequestContext) -> Session {
    env.factory
        .create_session(query_id(), context, &noop_collectors, None)
        .unwrap()
}

fn hive_context(props: &[(&str, &str)]) -> RequestContext {
    let mut context = RequestContext::new(Identity::new("alice"));
    context.catalog_properties.insert(
        "hive".to_string(),
        props
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<IndexMap<_, _>>(),
    );
    context
}

#[test]
fn bind_keeps_everything_else() {
    let env = test_env(&SqlEnvironmentConfig::default());
    let session = unbound_session(&env, &hive_context(&[("compression_codec", "SNAPPY")]));
    let transaction_id = env.transactions.begin(&["hive"]);

    let bound = session
        .begin_transaction_id(transaction_id, env.transactions.as_ref(), &AllowAllAccessControl)
        .unwrap();

    assert_eq!(Some(transaction_id), bound.transaction_id());
    assert_eq!(None, session.transaction_id());
    assert_eq!(session.user(), bound.user());
    assert_eq!(session.all_catalog_properties(), bound.all_catalog_properties());
    assert_eq!(session.start_time(), bound.start_time());
}

#[test]
fn bind_twice() {
    let env = test_env(&SqlEnvironmentConfig::default());
    let session = unbound_session(&env, &RequestContext::new(Identity::new("alice")));
    let first = env.transactions.begin(&[]);
    let second = env.transactions.begin(&[]);

    let bound = session
        .begin_transaction_id(first, env.transactions.as_ref(), &AllowAllAccessControl)
        .unwrap();
    let err = bound
        .begin_transaction_id(second, env.transactions.as_ref(), &AllowAllAccessControl)
        .unwrap_err();

    assert_eq!(SessionErrorKind::Transaction, err.kind());
    assert!(matches!(err, SessionError::TransactionAlreadyBound(id) if id == first));
}

#[test]
fn unknown_transaction() {
    let env = test_env(&SqlEnvironmentConfig::default());
    let session = unbound_session(&env, &RequestContext::new(Identity::new("alice")));
    let missing = TransactionId::new();

    let err = session
        .begin_transaction_id(missing, env.transactions.as_ref(), &AllowAllAccessControl)
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Transaction(TransactionError::UnknownTransaction(id)) if id == missing
    ));
}

#[test]
fn catalog_missing_from_transaction() {
    let env = test_env(&SqlEnvironmentConfig::default());
    let session = unbound_session(&env, &hive_context(&[("compression_codec", "GZIP")]));
    let transaction_id = env.transactions.begin(&["tpch"]);

    let err = session
        .begin_transaction_id(transaction_id, env.transactions.as_ref(), &AllowAllAccessControl)
        .unwrap_err();
    assert_eq!(SessionErrorKind::NotFound, err.kind());
    assert!(matches!(err, SessionError::UnknownCatalog(catalog) if catalog == "hive"));
}

#[test]
fn invalid_values_rejected_at_bind() {
    let env = test_env(&SqlEnvironmentConfig::default());

    let mut context = RequestContext::new(Identity::new("alice"));
    context
        .system_properties
        .insert("x".to_string(), "one".to_string());
    // Names are checked up front, values are not.
    let session = unbound_session(&env, &context);
    let transaction_id = env.transactions.begin(&[]);

    let err = session
        .begin_transaction_id(transaction_id, env.transactions.as_ref(), &AllowAllAccessControl)
        .unwrap_err();
    assert_eq!(SessionErrorKind::InvalidArgument, err.kind());
    assert!(matches!(
        err,
        SessionError::InvalidPropertyValue { name, value } if name == "x" && value == "one"
    ));

    let session = unbound_session(&env, &hive_context(&[("compression_codec", "BROTLI")]));
    let transaction_id = env.transactions.begin(&["hive"]);
    let err = session
        .begin_transaction_id(transaction_id, env.transactions.as_ref(), &AllowAllAccessControl)
        .unwrap_err();
    assert_eq!(SessionErrorKind::InvalidArgument, err.kind());
}

#[test]
fn catalog_property_access_denied() {
    let env = test_env(&SqlEnvironmentConfig::default());
    let session = unbound_session(&env, &hive_context(&[("bucket_execution_enabled", "false")]));
    let transaction_id = env.transactions.begin(&["hive"]);

    let err = session
        .begin_transaction_id(
            transaction_id,
            env.transactions.as_ref(),
            &DenyProperty("bucket_execution_enabled"),
        )
        .unwrap_err();
    assert_eq!(SessionErrorKind::AccessDenied, err.kind());
    assert_eq!(
        "Access Denied: User alice cannot set catalog session property hive.bucket_execution_enabled",
        err.to_string()
    );
}

#[test]
fn catalog_unregistered_after_session_created() {
    let env = test_env(&SqlEnvironmentConfig::default());
    let session = unbound_session(&env, &hive_context(&[("compression_codec", "GZIP")]));
    let transaction_id = env.transactions.begin(&["hive"]);

    assert!(env.registry.remove_catalog_properties("hive"));

    let err = session
        .begin_transaction_id(transaction_id, env.transactions.as_ref(), &AllowAllAccessControl)
        .unwrap_err();
    assert_eq!(SessionErrorKind::UnknownProperty, err.kind());
}

#[test]
fn padded_warning_handling_binds() {
    let env = test_env(&SqlEnvironmentConfig::default());
    let transaction_id = env.transactions.begin(&[]);
    let mut context = RequestContext::new(Identity::new("alice"));
    context
        .system_properties
        .insert(WARNING_HANDLING.to_string(), " AS_ERROR".to_string());
    context.transaction_id = Some(transaction_id);
    let collectors = RecordingWarningFactory::default();

    let session = env
        .factory
        .create_session(query_id(), &context, &collectors, None)
        .unwrap();

    assert_eq!(Some(transaction_id), session.transaction_id());
    assert_eq!(vec![WarningHandlingLevel::AsError], collectors.levels());
    assert_eq!(
        WarningHandlingLevel::AsError,
        session
            .system_property::<WarningHandlingLevel>(WARNING_HANDLING)
            .unwrap()
    );
}
