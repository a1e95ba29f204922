use clap::Parser;
use query_session::config::SqlEnvironmentConfig;

#[derive(Debug, Parser)]
struct Cli {
    #[command(flatten)]
    sql: SqlEnvironmentConfig,
}

#[test]
fn parse_forced_zone_flag() {
    let cli = Cli::try_parse_from(["server", "--forced-session-time-zone", "Asia/Kolkata"]).unwrap();
    assert_eq!(
        Some("Asia/Kolkata"),
        cli.sql.forced_session_time_zone.as_deref()
    );
    assert_eq!(
        "Asia/Kolkata",
        cli.sql.forced_time_zone_key().unwrap().unwrap().id()
    );
}

#[test]
fn forced_zone_from_file_config() {
    let config: SqlEnvironmentConfig =
        serde_json::from_str(r#"{"forced-session-time-zone": "+02:00"}"#).unwrap();
    assert_eq!(Some("+02:00"), config.forced_session_time_zone.as_deref());

    let config: SqlEnvironmentConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(SqlEnvironmentConfig::default(), config);
}
