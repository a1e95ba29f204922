use clap::Args;
use serde::Deserialize;

use crate::errors::Result;
use crate::timezone::TimeZoneKey;

/// Server wide SQL environment settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SqlEnvironmentConfig {
    /// Time zone used for every session regardless of what clients request.
    ///
    /// Accepts zone names like `America/New_York` or offsets like `+05:30`.
    #[arg(long, env = "FORCED_SESSION_TIME_ZONE", value_parser)]
    pub forced_session_time_zone: Option<String>,
}

impl SqlEnvironmentConfig {
    /// Resolve the forced time zone, if configured.
    pub fn forced_time_zone_key(&self) -> Result<Option<TimeZoneKey>> {
        self.forced_session_time_zone
            .as_deref()
            .map(TimeZoneKey::parse)
            .transpose()
    }
}
