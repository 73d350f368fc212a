//! In-memory provider clients for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, bail};
use async_trait::async_trait;
use calsync_provider_google::{
    GoogleCalendarApi, GoogleEvent, GoogleEventDateTime, ListEventsOptions,
};
use calsync_provider_outlook::{DateTimeTimeZone, ItemBody, OutlookCalendarApi, OutlookEvent};
use chrono::DateTime;

pub fn google_event(summary: &str, description: Option<&str>) -> GoogleEvent {
    let at = |s| GoogleEventDateTime {
        date_time: Some(DateTime::parse_from_rfc3339(s).unwrap()),
        ..Default::default()
    };
    GoogleEvent {
        id: format!("google-{}", summary.to_lowercase()),
        summary: summary.to_string(),
        description: description.map(str::to_string),
        start: Some(at("2024-01-01T09:00:00Z")),
        end: Some(at("2024-01-01T09:30:00Z")),
        ..Default::default()
    }
}

pub fn outlook_event(id: &str, subject: &str, content: Option<&str>) -> OutlookEvent {
    let at = |s: &str| DateTimeTimeZone {
        date_time: s.to_string(),
        time_zone: "UTC".to_string(),
    };
    OutlookEvent {
        id: id.to_string(),
        subject: Some(subject.to_string()),
        body: content.map(ItemBody::text),
        start: Some(at("2024-01-02T14:00:00.0000000")),
        end: Some(at("2024-01-02T15:00:00.0000000")),
        ..Default::default()
    }
}

#[derive(Default)]
pub struct FakeGoogle {
    /// Listed by every list call, subject to the query options
    pub events: Vec<GoogleEvent>,
    pub fail_list: bool,
    pub fail_calendars: Vec<String>,
    pub list_calls: AtomicUsize,
    inserted: Mutex<Vec<(String, GoogleEvent)>>,
}

impl FakeGoogle {
    pub fn with_events(events: Vec<GoogleEvent>) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }

    pub fn failing_list() -> Self {
        Self {
            fail_list: true,
            ..Default::default()
        }
    }

    pub fn failing_on(calendars: &[&str]) -> Self {
        Self {
            fail_calendars: calendars.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn inserted(&self) -> Vec<(String, GoogleEvent)> {
        self.inserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl GoogleCalendarApi for FakeGoogle {
    async fn list_recent_events(
        &self,
        _calendar_id: &str,
        options: &ListEventsOptions,
    ) -> Result<Vec<GoogleEvent>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list {
            bail!("Failed to fetch events (503): backendError");
        }

        // Google orders by `updated` oldest first and caps the listing at `maxResults`
        let mut events = self.events.clone();
        if options.order_by_updated {
            events.sort_by_key(|e| e.updated);
        }
        if let Some(max) = options.max_results {
            events.truncate(max as usize);
        }
        Ok(events)
    }

    async fn insert_event(&self, calendar_id: &str, event: &GoogleEvent) -> Result<GoogleEvent> {
        if self.fail_calendars.iter().any(|c| c == calendar_id) {
            bail!("Failed to create event: {} (404): notFound", event.summary);
        }

        let mut inserted = self.inserted.lock().unwrap();
        inserted.push((calendar_id.to_string(), event.clone()));

        Ok(GoogleEvent {
            id: format!("inserted-{}", inserted.len()),
            ..event.clone()
        })
    }
}

#[derive(Default)]
pub struct FakeOutlook {
    pub events: Vec<OutlookEvent>,
    pub fail_create: bool,
    pub get_calls: AtomicUsize,
    created: Mutex<Vec<(String, OutlookEvent)>>,
}

impl FakeOutlook {
    pub fn with_events(events: Vec<OutlookEvent>) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }

    pub fn failing_create() -> Self {
        Self {
            fail_create: true,
            ..Default::default()
        }
    }

    pub fn created(&self) -> Vec<(String, OutlookEvent)> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl OutlookCalendarApi for FakeOutlook {
    async fn get_event(&self, id: &str) -> Result<OutlookEvent> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        match self.events.iter().find(|e| e.id == id) {
            Some(event) => Ok(event.clone()),
            None => bail!("Failed to fetch Outlook event {} (404): ErrorItemNotFound", id),
        }
    }

    async fn create_event(&self, user_id: &str, event: &OutlookEvent) -> Result<OutlookEvent> {
        if self.fail_create {
            bail!("Failed to create event (401): InvalidAuthenticationToken");
        }

        let mut created = self.created.lock().unwrap();
        created.push((user_id.to_string(), event.clone()));

        Ok(OutlookEvent {
            id: format!("created-{}", created.len()),
            ..event.clone()
        })
    }
}
