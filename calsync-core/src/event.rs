//! Provider-neutral event types.
//!
//! Providers convert their API payloads into a [`CalendarEvent`] when an
//! event has to cross from one provider to the other. Same-provider copies
//! skip this type and keep the native shape.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::destination::ProviderKind;
use crate::sync_tag;

/// A calendar event read from a source provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Provider the event was read from
    pub source: ProviderKind,
    /// The provider's own event id
    pub source_id: String,
    pub title: String,
    pub start: EventTime,
    pub end: EventTime,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventTime {
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
}

impl EventTime {
    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }
}

impl CalendarEvent {
    /// Whether this event is itself a synced copy.
    pub fn is_synced(&self) -> bool {
        sync_tag::is_synced_opt(self.description.as_deref())
    }

    /// A copy of this event with the sync tag appended to its description.
    pub fn tagged(&self) -> CalendarEvent {
        CalendarEvent {
            description: Some(sync_tag::tag_text(self.description.as_deref())),
            ..self.clone()
        }
    }
}
