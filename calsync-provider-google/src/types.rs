//! Google Calendar v3 wire types.
//!
//! Only the fields calsync reads or writes are modelled. Absent fields are
//! skipped on output so inserted events don't carry empty values.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An event resource as returned by `events.list` / accepted by `events.insert`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEvent {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default)]
    pub summary: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<GoogleEventDateTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<GoogleEventDateTime>,

    /// Last modification time (read-only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,

    /// "confirmed", "tentative" or "cancelled" (read-only here)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
}

/// Start or end of an event: `date` for all-day events, `dateTime` otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEventDateTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<FixedOffset>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// One page of `events.list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEventList {
    #[serde(default)]
    pub items: Vec<GoogleEvent>,
    pub next_page_token: Option<String>,
}

/// Page size used when listing for a push notification.
const NOTIFICATION_PAGE_SIZE: u32 = 250;

/// Query options for `events.list`.
///
/// `max_results` is the page size. The client follows `nextPageToken`, so a
/// listing always covers every matching event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListEventsOptions {
    pub time_min: Option<DateTime<Utc>>,
    pub max_results: Option<u32>,
    /// Expand recurring events into single instances
    pub single_events: bool,
    /// Sort by last modification time, oldest first
    pub order_by_updated: bool,
}

impl ListEventsOptions {
    /// The query a push notification triggers: every upcoming single
    /// instance, ordered by last update.
    ///
    /// Google sorts `updated` ascending and the event that triggered the
    /// notification is the newest one, so it is on the last page.
    pub fn most_recently_updated() -> Self {
        Self {
            time_min: Some(Utc::now()),
            max_results: Some(NOTIFICATION_PAGE_SIZE),
            single_events: true,
            order_by_updated: true,
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(time_min) = self.time_min {
            pairs.push(("timeMin", time_min.to_rfc3339()));
        }
        if let Some(max_results) = self.max_results {
            pairs.push(("maxResults", max_results.to_string()));
        }
        if self.single_events {
            pairs.push(("singleEvents", "true".to_string()));
        }
        if self.order_by_updated {
            pairs.push(("orderBy", "updated".to_string()));
        }
        pairs
    }
}
