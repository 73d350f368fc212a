use anyhow::{Result, bail};
use calsync_core::{CalendarEvent, EventTime, ProviderKind};

use crate::types::{GoogleEvent, GoogleEventDateTime};

pub trait FromGoogle {
    fn from_google(event: &GoogleEvent) -> Result<Self>
    where
        Self: Sized;
}

impl FromGoogle for CalendarEvent {
    fn from_google(event: &GoogleEvent) -> Result<Self> {
        let Some(start) = event.start.as_ref().and_then(event_time_from_google) else {
            bail!("Event has no start time");
        };

        let Some(end) = event.end.as_ref().and_then(event_time_from_google) else {
            bail!("Event has no end time");
        };

        Ok(CalendarEvent {
            source: ProviderKind::Google,
            source_id: event.id.clone(),
            title: event.summary.clone(),
            start,
            end,
            description: event.description.clone().filter(|d| !d.is_empty()),
        })
    }
}

/// A precise timestamp wins over an all-day date when both are present.
fn event_time_from_google(time: &GoogleEventDateTime) -> Option<EventTime> {
    if let Some(dt) = time.date_time {
        Some(EventTime::DateTime(dt.to_utc()))
    } else {
        time.date.map(EventTime::Date)
    }
}
