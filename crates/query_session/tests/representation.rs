
use std::sync::Arc;

use indexmap::IndexMap;
use query_session::config::SqlEnvironmentConfig;
use query_session::context::RequestContext;
use query_session::functions::{QualifiedFunctionName, SqlInvokedFunction};
use query_session::identity::{AuthenticatorToken, AuthorizationOutcome, Identity, SelectedRole};
use query_session::representation::SessionRepresentation;
use query_session::warnings::{NoopWarningCollector, WarningCollector, WarningHandlingLevel};
use setup::*;

fn noop_collectors(_level: WarningHandlingLevel) -> Arc<dyn WarningCollector> {
    Arc::new(NoopWarningCollector)
}

fn full_context() -> RequestContext {
    let identity = Identity::new("alice")
        .with_role("hive", SelectedRole::All)
        .with_extra_credential("region", "us-east-1")
        .with_extra_authenticator("hive", AuthenticatorToken::new("s3cr3t"));

    let function = SqlInvokedFunction {
        name: QualifiedFunctionName::session_scoped("one"),
        parameters: Vec::new(),
        return_type: "integer".to_string(),
        description: String::new(),
        characteristics: Default::default(),
        body: "RETURN 1".to_string(),
    };

    let mut context = RequestContext::new(identity);
    context.source = Some("cli".to_string());
    context.time_zone_id = Some("-08:00".to_string());
    context.language = Some("fr-CA".to_string());
    context
        .system_properties
        .insert("x".to_string(), "7".to_string());
    context.catalog_properties.insert(
        "hive".to_string(),
        IndexMap::from([("compression_codec".to_string(), "NONE".to_string())]),
    );
    context
        .prepared_statements
        .insert("q".to_string(), "SELECT 1".to_string());
    context
        .session_functions
        .insert(function.function_id(), function);
    context
}

#[test]
fn json_round_trip() {
    let env = test_env(&SqlEnvironmentConfig::default());
    let transaction_id = env.transactions.begin(&["hive"]);
    let mut context = full_context();
    context.transaction_id = Some(transaction_id);

    let session = env
        .factory
        .create_session(
            query_id(),
            &context,
            &noop_collectors,
            Some(&AuthorizationOutcome::new("bob", None)),
        )
        .unwrap();

    let repr = session.to_representation();
    let json = serde_json::to_string(&repr).unwrap();
    assert!(!json.contains("s3cr3t"));

    let decoded: SessionRepresentation = serde_json::from_str(&json).unwrap();
    assert_eq!(repr, decoded);

    let restored = decoded
        .into_session(env.registry.clone(), Arc::new(NoopWarningCollector))
        .unwrap();
    assert_eq!(Some(transaction_id), restored.transaction_id());
    assert_eq!(Some("bob"), restored.identity().authorized_user());
    assert_eq!(session.time_zone_key(), restored.time_zone_key());
    assert_eq!(session.locale(), restored.locale());
    assert_eq!(session.start_time(), restored.start_time());
    assert_eq!(session.system_properties(), restored.system_properties());
    assert_eq!(session.all_catalog_properties(), restored.all_catalog_properties());
    assert!(
        session
            .system_properties()
            .keys()
            .eq(restored.system_properties().keys())
    );
    assert!(
        session
            .all_catalog_properties()
            .keys()
            .eq(restored.all_catalog_properties().keys())
    );
    assert_eq!(session.prepared_statements(), restored.prepared_statements());
    assert_eq!(session.session_functions(), restored.session_functions());
    assert!(restored.identity().extra_authenticators().is_empty());
}

#[test]
fn unknown_property_on_receiving_side() {
    let env = test_env(&SqlEnvironmentConfig::default());
    let session = env
        .factory
        .create_session(query_id(), &full_context(), &noop_collectors, None)
        .unwrap();

    // Receiver doesn't know the test only "x" property.
    let receiver = Arc::new(query_session::properties::SessionPropertyRegistry::new());
    let err = session
        .to_representation()
        .into_session(receiver, Arc::new(NoopWarningCollector))
        .unwrap_err();
    assert_eq!(query_session::SessionErrorKind::UnknownProperty, err.kind());
}
