use calsync_core::sync_tag;
use calsync_core::{CalendarEvent, EventTime};

use crate::types::{BodyType, DateTimeTimeZone, ItemBody, OutlookEvent};

/// Cross-provider copies are always written in UTC, whatever zone the source used.
const OUTLOOK_TIME_ZONE: &str = "UTC";

pub trait ToOutlook {
    fn to_outlook(&self) -> OutlookEvent;
}

impl ToOutlook for CalendarEvent {
    fn to_outlook(&self) -> OutlookEvent {
        OutlookEvent {
            subject: Some(self.title.clone()),
            body: Some(ItemBody::text(self.description.clone().unwrap_or_default())),
            start: Some(event_time_to_outlook(&self.start)),
            end: Some(event_time_to_outlook(&self.end)),
            is_all_day: self.start.is_all_day() && self.end.is_all_day(),
            ..Default::default()
        }
    }
}

fn event_time_to_outlook(time: &EventTime) -> DateTimeTimeZone {
    let date_time = match time {
        EventTime::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        // Graph wants all-day events as midnight-to-midnight
        EventTime::Date(d) => format!("{}T00:00:00", d.format("%Y-%m-%d")),
    };

    DateTimeTimeZone {
        date_time,
        time_zone: OUTLOOK_TIME_ZONE.to_string(),
    }
}

/// Copy an Outlook event to another Outlook calendar.
///
/// Start, end and the all-day flag are kept as-is; the body keeps its
/// content type and gets the sync tag.
pub fn copy_outlook_event(source: &OutlookEvent) -> OutlookEvent {
    let content_type = source
        .body
        .as_ref()
        .map(|b| b.content_type)
        .unwrap_or(BodyType::Text);

    OutlookEvent {
        id: String::new(),
        subject: source.subject.clone(),
        body: Some(ItemBody {
            content_type,
            content: sync_tag::tag_text(Some(source.body_content())),
        }),
        start: source.start.clone(),
        end: source.end.clone(),
        is_all_day: source.is_all_day,
        last_modified_date_time: None,
    }
}
