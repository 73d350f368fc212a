//! Fan-out of one source event to every configured destination.

use std::sync::Arc;

use calsync_core::{
    CalSyncError, CalSyncResult, DestinationConfig, DestinationRegistry, ProviderKind,
};
use calsync_provider_google::GoogleCalendarApi;
use calsync_provider_outlook::OutlookCalendarApi;

use crate::sync::translate::{ProviderEvent, translate};

/// Result of delivering to one destination.
#[derive(Debug)]
pub struct DestinationOutcome {
    pub destination: String,
    pub calendar_id: String,
    pub status: DeliveryStatus,
}

#[derive(Debug)]
pub enum DeliveryStatus {
    Delivered { event_id: String },
    Failed(CalSyncError),
}

impl DestinationOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self.status, DeliveryStatus::Delivered { .. })
    }
}

/// Per-destination results, in registry order.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub outcomes: Vec<DestinationOutcome>,
}

impl DispatchReport {
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_delivered()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }
}

/// Copies events to every destination in the registry.
///
/// Destinations are independent: a failure is logged and recorded, and the
/// remaining destinations are still attempted. Nothing is retried.
pub struct Dispatcher {
    registry: Arc<DestinationRegistry>,
    google: Arc<dyn GoogleCalendarApi>,
    outlook: Arc<dyn OutlookCalendarApi>,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<DestinationRegistry>,
        google: Arc<dyn GoogleCalendarApi>,
        outlook: Arc<dyn OutlookCalendarApi>,
    ) -> Self {
        Self {
            registry,
            google,
            outlook,
        }
    }

    pub async fn dispatch(&self, source: &ProviderEvent) -> DispatchReport {
        let mut outcomes = Vec::with_capacity(self.registry.len());

        for destination in self.registry.iter() {
            let status = match self.deliver(source, destination).await {
                Ok(event_id) => {
                    tracing::info!(
                        destination = %destination.name,
                        calendar_id = %destination.calendar_id,
                        source_id = %source.id(),
                        event_id = %event_id,
                        "synced event"
                    );
                    DeliveryStatus::Delivered { event_id }
                }
                Err(error) => {
                    tracing::error!(
                        destination = %destination.name,
                        provider = %destination.provider,
                        calendar_id = %destination.calendar_id,
                        source_id = %source.id(),
                        %error,
                        "failed to sync event"
                    );
                    DeliveryStatus::Failed(error)
                }
            };

            outcomes.push(DestinationOutcome {
                destination: destination.name.clone(),
                calendar_id: destination.calendar_id.clone(),
                status,
            });
        }

        DispatchReport { outcomes }
    }

    async fn deliver(
        &self,
        source: &ProviderEvent,
        destination: &DestinationConfig,
    ) -> CalSyncResult<String> {
        let kind = destination.provider_kind()?;

        // Rebuilt for every destination rather than shared between them
        let payload = translate(source, kind)?;

        let created_id = match payload {
            ProviderEvent::Google(event) => self
                .google
                .insert_event(&destination.calendar_id, &event)
                .await
                .map(|created| created.id),
            ProviderEvent::Outlook(event) => self
                .outlook
                .create_event(&destination.calendar_id, &event)
                .await
                .map(|created| created.id),
        };

        created_id.map_err(|e| provider_error(kind, e))
    }
}

fn provider_error(kind: ProviderKind, error: anyhow::Error) -> CalSyncError {
    CalSyncError::Provider {
        provider: kind.to_string(),
        message: format!("{:#}", error),
    }
}
