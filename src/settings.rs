use config::ConfigError;
use std::time::Duration;

use crate::debounce::DEFAULT_QUIET_PERIOD;
use crate::ArtistlyError;

pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Runtime settings, read from an optional `Artistly` config file and
/// `ARTISTLY_*` environment variables
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Base URL of the artists backend
    pub api_url: String,

    /// Quiet period before search input is committed
    pub debounce: Duration,

    /// Let the backend filter by category, location and price
    pub server_filtering: bool,
}

impl Settings {
    pub fn load() -> Result<Self, ArtistlyError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("Artistly").required(false))
            .add_source(config::Environment::with_prefix("ARTISTLY"))
            .build()?;
        Self::from_config(&settings)
    }

    /// Missing keys take their defaults; keys of the wrong type are errors
    pub fn from_config(settings: &config::Config) -> Result<Self, ArtistlyError> {
        let api_url = or_default(settings.get_string("api_url"), DEFAULT_API_URL.into())?;
        let debounce_ms = or_default(
            settings.get_int("debounce_ms"),
            DEFAULT_QUIET_PERIOD.as_millis() as i64,
        )?;
        if debounce_ms < 0 {
            return Err(format!("debounce_ms must not be negative, got {}", debounce_ms).into());
        }
        let server_filtering = or_default(settings.get_bool("server_filtering"), false)?;

        Ok(Self {
            api_url,
            debounce: Duration::from_millis(debounce_ms as u64),
            server_filtering,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            debounce: DEFAULT_QUIET_PERIOD,
            server_filtering: false,
        }
    }
}

fn or_default<T>(value: Result<T, ConfigError>, default: T) -> Result<T, ConfigError> {
    match value {
        Err(ConfigError::NotFound(_)) => Ok(default),
        other => other,
    }
}
