use anyhow::{Context, Result, bail};
use calsync_core::{CalendarEvent, EventTime, ProviderKind};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::types::{DateTimeTimeZone, OutlookEvent};

/// Graph's local date-time format, with up to seven fractional digits.
const GRAPH_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub trait FromOutlook {
    fn from_outlook(event: &OutlookEvent) -> Result<Self>
    where
        Self: Sized;
}

impl FromOutlook for CalendarEvent {
    fn from_outlook(event: &OutlookEvent) -> Result<Self> {
        let Some(start) = &event.start else {
            bail!("Event has no start time");
        };
        let Some(end) = &event.end else {
            bail!("Event has no end time");
        };

        let content = event.body_content();

        Ok(CalendarEvent {
            source: ProviderKind::Outlook,
            source_id: event.id.clone(),
            title: event.subject.clone().unwrap_or_default(),
            start: event_time_from_outlook(start, event.is_all_day)?,
            end: event_time_from_outlook(end, event.is_all_day)?,
            description: (!content.is_empty()).then(|| content.to_string()),
        })
    }
}

fn event_time_from_outlook(time: &DateTimeTimeZone, is_all_day: bool) -> Result<EventTime> {
    let local = NaiveDateTime::parse_from_str(&time.date_time, GRAPH_DATE_TIME_FORMAT)
        .with_context(|| format!("Invalid Outlook dateTime: {}", time.date_time))?;

    if is_all_day {
        return Ok(EventTime::Date(local.date()));
    }

    Ok(EventTime::DateTime(resolve_zone(local, &time.time_zone)))
}

/// Turn a Graph local time into a UTC instant.
///
/// Graph is asked for UTC, but events written by other clients can still
/// come back in a named zone. IANA names are resolved; Windows zone names
/// ("Pacific Standard Time") are not, and are read as UTC.
fn resolve_zone(local: NaiveDateTime, time_zone: &str) -> DateTime<Utc> {
    if time_zone.is_empty() || time_zone.eq_ignore_ascii_case("UTC") {
        return local.and_utc();
    }

    match time_zone.parse::<Tz>() {
        Ok(tz) => match tz.from_local_datetime(&local).earliest() {
            Some(dt) => dt.to_utc(),
            // Local time skipped by a DST transition
            None => local.and_utc(),
        },
        Err(_) => {
            tracing::warn!(time_zone, "unrecognized Outlook time zone, treating as UTC");
            local.and_utc()
        }
    }
}
