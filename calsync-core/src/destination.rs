//! The static list of calendars that new events are copied to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CalSyncError, CalSyncResult};

/// Calendar providers calsync can read from and write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Google,
    Outlook,
}

impl ProviderKind {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Google => "google",
            ProviderKind::Outlook => "outlook",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(ProviderKind::Google),
            "outlook" => Ok(ProviderKind::Outlook),
            other => Err(other.to_string()),
        }
    }
}

/// One sync target.
///
/// `provider` is kept exactly as configured so that a typo in one entry
/// only disables that entry instead of failing startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationConfig {
    pub name: String,
    pub provider: String,
    /// Google calendar id, or Outlook user id (`me` for the signed-in user)
    pub calendar_id: String,
}

impl DestinationConfig {
    pub fn new(
        name: impl Into<String>,
        provider: impl Into<String>,
        calendar_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            provider: provider.into(),
            calendar_id: calendar_id.into(),
        }
    }

    pub fn provider_kind(&self) -> CalSyncResult<ProviderKind> {
        self.provider
            .parse()
            .map_err(|_| CalSyncError::UnknownProvider {
                destination: self.name.clone(),
                provider: self.provider.clone(),
            })
    }
}

/// Ordered, read-only list of destinations.
///
/// Order only decides dispatch order. Changing the list means restarting
/// the process with new settings.
#[derive(Debug, Clone, Default)]
pub struct DestinationRegistry {
    destinations: Vec<DestinationConfig>,
}

impl DestinationRegistry {
    pub fn new(destinations: Vec<DestinationConfig>) -> Self {
        Self { destinations }
    }

    /// Built-in destinations, used when settings name none.
    pub fn default_destinations() -> Vec<DestinationConfig> {
        vec![
            DestinationConfig::new("Work Google", "google", "work@example.com"),
            DestinationConfig::new("Personal Google", "google", "primary"),
            DestinationConfig::new("Personal Outlook", "outlook", "me"),
        ]
    }

    pub fn iter(&self) -> impl Iterator<Item = &DestinationConfig> {
        self.destinations.iter()
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Entries whose provider doesn't resolve to a known [`ProviderKind`].
    pub fn invalid_entries(&self) -> Vec<&DestinationConfig> {
        self.destinations
            .iter()
            .filter(|d| d.provider_kind().is_err())
            .collect()
    }
}
