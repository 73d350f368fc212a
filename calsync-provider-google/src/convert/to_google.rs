use calsync_core::sync_tag;
use calsync_core::{CalendarEvent, EventTime};

use crate::types::{GoogleEvent, GoogleEventDateTime};

pub trait ToGoogle {
    fn to_google(&self) -> GoogleEvent;
}

impl ToGoogle for CalendarEvent {
    fn to_google(&self) -> GoogleEvent {
        GoogleEvent {
            summary: self.title.clone(),
            description: self.description.clone(),
            start: Some(event_time_to_google(&self.start)),
            end: Some(event_time_to_google(&self.end)),
            ..Default::default()
        }
    }
}

fn event_time_to_google(time: &EventTime) -> GoogleEventDateTime {
    match time {
        EventTime::Date(d) => GoogleEventDateTime {
            date: Some(*d),
            ..Default::default()
        },
        EventTime::DateTime(dt) => GoogleEventDateTime {
            date_time: Some(dt.fixed_offset()),
            ..Default::default()
        },
    }
}

/// Copy a Google event to another Google calendar.
///
/// Start and end are kept exactly as the source has them (including any
/// time zone), and the description gets the sync tag. Server-assigned
/// fields are cleared so Google assigns fresh ones.
pub fn copy_google_event(source: &GoogleEvent) -> GoogleEvent {
    GoogleEvent {
        id: String::new(),
        summary: source.summary.clone(),
        description: Some(sync_tag::tag_text(source.description.as_deref())),
        start: source.start.clone(),
        end: source.end.clone(),
        updated: None,
        status: String::new(),
    }
}
