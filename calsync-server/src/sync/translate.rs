//! Builds destination payloads from a source event.
//!
//! Cross-provider copies go through the canonical `CalendarEvent`;
//! same-provider copies keep the native shape so start/end stay exactly as
//! the source had them. Every payload built here carries the sync tag.

use calsync_core::sync_tag;
use calsync_core::{CalSyncError, CalSyncResult, CalendarEvent, ProviderKind};
use calsync_provider_google::{FromGoogle, GoogleEvent, ToGoogle, copy_google_event};
use calsync_provider_outlook::{FromOutlook, OutlookEvent, ToOutlook, copy_outlook_event};

/// An event in its provider's native shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderEvent {
    Google(GoogleEvent),
    Outlook(OutlookEvent),
}

impl ProviderEvent {
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderEvent::Google(_) => ProviderKind::Google,
            ProviderEvent::Outlook(_) => ProviderKind::Outlook,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ProviderEvent::Google(event) => &event.id,
            ProviderEvent::Outlook(event) => &event.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ProviderEvent::Google(event) => &event.summary,
            ProviderEvent::Outlook(event) => event.subject.as_deref().unwrap_or_default(),
        }
    }

    /// Description (Google) or body content (Outlook), empty when absent.
    pub fn description_text(&self) -> &str {
        match self {
            ProviderEvent::Google(event) => event.description.as_deref().unwrap_or_default(),
            ProviderEvent::Outlook(event) => event.body_content(),
        }
    }

    /// Whether this event is a copy made by an earlier sync.
    pub fn is_synced(&self) -> bool {
        sync_tag::is_synced(self.description_text())
    }

    pub fn to_canonical(&self) -> CalSyncResult<CalendarEvent> {
        let converted = match self {
            ProviderEvent::Google(event) => CalendarEvent::from_google(event),
            ProviderEvent::Outlook(event) => CalendarEvent::from_outlook(event),
        };

        converted.map_err(|e| CalSyncError::Translation(format!("{:#}", e)))
    }
}

/// Google event -> tagged Outlook payload, written in UTC.
pub fn to_outlook_shape(event: &GoogleEvent) -> CalSyncResult<OutlookEvent> {
    let canonical = ProviderEvent::Google(event.clone()).to_canonical()?;
    Ok(canonical.tagged().to_outlook())
}

/// Outlook event -> tagged Google payload.
pub fn to_google_shape(event: &OutlookEvent) -> CalSyncResult<GoogleEvent> {
    let canonical = ProviderEvent::Outlook(event.clone()).to_canonical()?;
    Ok(canonical.tagged().to_google())
}

/// Tagged copy for a destination on the source's own provider.
pub fn to_same_provider_shape(event: &ProviderEvent) -> ProviderEvent {
    match event {
        ProviderEvent::Google(event) => ProviderEvent::Google(copy_google_event(event)),
        ProviderEvent::Outlook(event) => ProviderEvent::Outlook(copy_outlook_event(event)),
    }
}

/// Build the payload for one destination.
pub fn translate(source: &ProviderEvent, destination: ProviderKind) -> CalSyncResult<ProviderEvent> {
    match (source, destination) {
        (ProviderEvent::Google(_), ProviderKind::Google)
        | (ProviderEvent::Outlook(_), ProviderKind::Outlook) => Ok(to_same_provider_shape(source)),
        (ProviderEvent::Google(event), ProviderKind::Outlook) => {
            to_outlook_shape(event).map(ProviderEvent::Outlook)
        }
        (ProviderEvent::Outlook(event), ProviderKind::Google) => {
            to_google_shape(event).map(ProviderEvent::Google)
        }
    }
}
