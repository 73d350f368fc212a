//! Handles Google Calendar push notifications.
//!
//! Google's notification doesn't say which event changed, so the handler
//! asks for the most recently updated event on the watched calendar and
//! treats that as the trigger.

use std::sync::Arc;

use anyhow::{Context, Result};
use calsync_provider_google::{GoogleCalendarApi, GoogleEvent, ListEventsOptions};

use crate::sync::SyncOutcome;
use crate::sync::dispatcher::Dispatcher;
use crate::sync::translate::ProviderEvent;

pub struct GoogleNotificationHandler {
    client: Arc<dyn GoogleCalendarApi>,
    calendar_id: String,
    dispatcher: Arc<Dispatcher>,
}

impl GoogleNotificationHandler {
    pub fn new(
        client: Arc<dyn GoogleCalendarApi>,
        calendar_id: impl Into<String>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            client,
            calendar_id: calendar_id.into(),
            dispatcher,
        }
    }

    pub async fn handle(&self) -> Result<SyncOutcome> {
        let events = self
            .client
            .list_recent_events(&self.calendar_id, &ListEventsOptions::most_recently_updated())
            .await
            .with_context(|| format!("Failed to fetch latest event from {}", self.calendar_id))?;

        let Some(event) = latest(events) else {
            tracing::debug!(calendar_id = %self.calendar_id, "no Google event to sync");
            return Ok(SyncOutcome::NoEvent);
        };

        let source = ProviderEvent::Google(event);

        if source.is_synced() {
            tracing::debug!(event_id = %source.id(), "skipping Google event created by a previous sync");
            return Ok(SyncOutcome::AlreadySynced);
        }

        tracing::info!(event_id = %source.id(), title = %source.title(), "syncing Google event");
        let report = self.dispatcher.dispatch(&source).await;

        Ok(SyncOutcome::Dispatched(report))
    }
}

/// Newest by `updated`; events without a timestamp sort first.
fn latest(events: Vec<GoogleEvent>) -> Option<GoogleEvent> {
    events.into_iter().max_by_key(|e| e.updated)
}
