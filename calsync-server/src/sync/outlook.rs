//! Handles Microsoft Graph change notifications.

use std::sync::Arc;

use anyhow::Context;
use calsync_provider_outlook::{ChangeNotificationCollection, OutlookCalendarApi};
use thiserror::Error;

use crate::sync::SyncOutcome;
use crate::sync::dispatcher::Dispatcher;
use crate::sync::translate::ProviderEvent;

#[derive(Error, Debug)]
pub enum OutlookHandlerError {
    /// The notification had no entry (or no event id) to act on
    #[error("No event data")]
    MissingEventData,

    #[error(transparent)]
    Fetch(#[from] anyhow::Error),
}

pub struct OutlookNotificationHandler {
    client: Arc<dyn OutlookCalendarApi>,
    dispatcher: Arc<Dispatcher>,
}

impl OutlookNotificationHandler {
    pub fn new(client: Arc<dyn OutlookCalendarApi>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { client, dispatcher }
    }

    pub async fn handle(
        &self,
        notifications: &ChangeNotificationCollection,
    ) -> Result<SyncOutcome, OutlookHandlerError> {
        let event_id = notifications
            .first()
            .and_then(|n| n.event_id())
            .ok_or(OutlookHandlerError::MissingEventData)?;

        let event = self
            .client
            .get_event(event_id)
            .await
            .with_context(|| format!("Failed to fetch Outlook event {}", event_id))?;

        let source = ProviderEvent::Outlook(event);

        if source.is_synced() {
            tracing::debug!(event_id, "skipping Outlook event created by a previous sync");
            return Ok(SyncOutcome::AlreadySynced);
        }

        tracing::info!(event_id, title = %source.title(), "syncing Outlook event");
        let report = self.dispatcher.dispatch(&source).await;

        Ok(SyncOutcome::Dispatched(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::testing::{FakeGoogle, FakeOutlook, outlook_event};
    use calsync_core::{DestinationConfig, DestinationRegistry};
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn handler(google: Arc<FakeGoogle>, outlook: Arc<FakeOutlook>) -> OutlookNotificationHandler {
        let registry = DestinationRegistry::new(vec![
            DestinationConfig::new("Personal Google", "google", "primary"),
            DestinationConfig::new("Shared Outlook", "outlook", "team@contoso.com"),
        ]);
        let dispatcher = Arc::new(Dispatcher::new(Arc::new(registry), google, outlook.clone()));
        OutlookNotificationHandler::new(outlook, dispatcher)
    }

    fn notification(body: serde_json::Value) -> ChangeNotificationCollection {
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn new_event_fans_out_to_both_providers() {
        let google = Arc::new(FakeGoogle::default());
        let outlook = Arc::new(FakeOutlook::with_events(vec![outlook_event(
            "AAMk-1",
            "Review",
            Some("agenda"),
        )]));

        let outcome = handler(google.clone(), outlook.clone())
            .handle(&notification(json!({ "value": [{ "id": "AAMk-1" }] })))
            .await
            .unwrap();

        assert!(matches!(outcome, SyncOutcome::Dispatched(ref r) if r.success_count() == 2));

        let inserted = google.inserted();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].1.summary, "Review");
        assert_eq!(
            inserted[0].1.description.as_deref(),
            Some("agenda\n\n[SyncedByMyApp]")
        );

        let created = outlook.created();
        assert_eq!(created[0].0, "team@contoso.com");
        assert_eq!(created[0].1.start, outlook_event("", "", None).start);
    }

    #[tokio::test]
    async fn empty_notification_is_rejected_without_fetching() {
        let outlook = Arc::new(FakeOutlook::default());

        let err = handler(Arc::new(FakeGoogle::default()), outlook.clone())
            .handle(&notification(json!({ "value": [] })))
            .await
            .unwrap_err();

        assert!(matches!(err, OutlookHandlerError::MissingEventData));
        assert_eq!(outlook.get_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn synced_event_is_not_dispatched() {
        let google = Arc::new(FakeGoogle::default());
        let outlook = Arc::new(FakeOutlook::with_events(vec![outlook_event(
            "AAMk-2",
            "Review",
            Some("agenda\n\n[SyncedByMyApp]"),
        )]));

        let outcome = handler(google.clone(), outlook.clone())
            .handle(&notification(json!({ "value": [{ "id": "AAMk-2" }] })))
            .await
            .unwrap();

        assert!(matches!(outcome, SyncOutcome::AlreadySynced));
        assert!(google.inserted().is_empty());
        assert!(outlook.created().is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_is_reported() {
        let outlook = Arc::new(FakeOutlook::default());

        let err = handler(Arc::new(FakeGoogle::default()), outlook.clone())
            .handle(&notification(json!({ "value": [{ "id": "gone" }] })))
            .await
            .unwrap_err();

        assert!(matches!(err, OutlookHandlerError::Fetch(_)));
        assert_eq!(outlook.get_calls.load(Ordering::SeqCst), 1);
    }
}
