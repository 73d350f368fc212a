//! Process configuration, loaded once at startup.
//!
//! Sources, lowest priority first:
//! 1. built-in defaults
//! 2. `$CALSYNC_CONFIG`, or `~/.config/calsync/config.toml` (optional)
//! 3. environment variables (a `.env` file in the working directory is read first)

use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat};
use serde::Deserialize;

use crate::destination::{DestinationConfig, DestinationRegistry};
use crate::error::{CalSyncError, CalSyncResult};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Google's alias for the user's main calendar
const DEFAULT_WATCH_CALENDAR_ID: &str = "primary";

/// Environment variable -> settings key.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("GOOGLE_CLIENT_ID", "google.client_id"),
    ("GOOGLE_CLIENT_SECRET", "google.client_secret"),
    ("GOOGLE_REDIRECT_URI", "google.redirect_uri"),
    ("GOOGLE_ACCESS_TOKEN", "google.access_token"),
    ("GOOGLE_REFRESH_TOKEN", "google.refresh_token"),
    ("GOOGLE_WATCH_CALENDAR_ID", "google.watch_calendar_id"),
    ("MS_ACCESS_TOKEN", "outlook.access_token"),
];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub google: GoogleSettings,

    #[serde(default)]
    pub outlook: OutlookSettings,

    /// Falls back to [`DestinationRegistry::default_destinations`] when empty.
    #[serde(default)]
    pub destinations: Vec<DestinationConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// OAuth credentials for Google Calendar.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Calendar whose notifications arrive on `/webhook/google`
    #[serde(default = "default_watch_calendar_id")]
    pub watch_calendar_id: String,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            redirect_uri: None,
            access_token: None,
            refresh_token: None,
            watch_calendar_id: default_watch_calendar_id(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutlookSettings {
    pub access_token: Option<String>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_watch_calendar_id() -> String {
    DEFAULT_WATCH_CALENDAR_ID.to_string()
}

impl Settings {
    pub fn config_path() -> CalSyncResult<PathBuf> {
        if let Ok(path) = std::env::var("CALSYNC_CONFIG") {
            return Ok(PathBuf::from(path));
        }

        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalSyncError::Config("Could not determine config directory".into()))?
            .join("calsync");

        Ok(config_dir.join("config.toml"))
    }

    /// Load settings from the config file and the process environment.
    pub fn load() -> CalSyncResult<Self> {
        load_dotenv(dotenvy::dotenv())?;

        let config_path = Self::config_path()?;
        tracing::debug!(path = %config_path.display(), "loading settings");

        let builder = Config::builder().add_source(
            File::new(&config_path.to_string_lossy(), FileFormat::Toml).required(false),
        );

        Self::build(builder, |name| std::env::var(name).ok())
    }

    /// Parse settings from TOML text, ignoring the environment.
    pub fn from_toml_str(contents: &str) -> CalSyncResult<Self> {
        let builder = Config::builder().add_source(File::from_str(contents, FileFormat::Toml));
        Self::build(builder, |_| None)
    }

    fn build(
        builder: ConfigBuilder<DefaultState>,
        env: impl Fn(&str) -> Option<String>,
    ) -> CalSyncResult<Self> {
        let mut builder = builder;
        for (var, key) in ENV_OVERRIDES {
            builder = builder
                .set_override_option(*key, env(var))
                .map_err(|e| CalSyncError::Config(e.to_string()))?;
        }

        let mut settings: Settings = builder
            .build()
            .map_err(|e| CalSyncError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalSyncError::Config(e.to_string()))?;

        if settings.destinations.is_empty() {
            settings.destinations = DestinationRegistry::default_destinations();
        }

        Ok(settings)
    }

    pub fn registry(&self) -> DestinationRegistry {
        DestinationRegistry::new(self.destinations.clone())
    }
}

/// A missing `.env` is fine; one that can't be parsed is a configuration error.
fn load_dotenv(result: Result<PathBuf, dotenvy::Error>) -> CalSyncResult<()> {
    match result {
        Ok(path) => {
            tracing::info!(path = %path.display(), "loaded .env");
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(CalSyncError::Config(format!("Failed to load .env: {}", e))),
    }
}
