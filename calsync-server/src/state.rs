use std::sync::Arc;

use anyhow::{Context, Result};
use calsync_core::DestinationRegistry;
use calsync_core::settings::Settings;
use calsync_provider_google::{GoogleCalendarApi, GoogleClient, Session};
use calsync_provider_outlook::{GraphClient, OutlookCalendarApi};

use crate::sync::dispatcher::Dispatcher;
use crate::sync::google::GoogleNotificationHandler;
use crate::sync::outlook::OutlookNotificationHandler;

/// Shared application state.
///
/// Provider clients and the destination list are built once at startup and
/// only read afterwards, so concurrent notifications share them freely.
#[derive(Clone)]
pub struct AppState {
    pub google: Arc<GoogleNotificationHandler>,
    pub outlook: Arc<OutlookNotificationHandler>,
}

impl AppState {
    pub fn new(
        google: Arc<dyn GoogleCalendarApi>,
        outlook: Arc<dyn OutlookCalendarApi>,
        registry: DestinationRegistry,
        watch_calendar_id: impl Into<String>,
    ) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::new(registry),
            google.clone(),
            outlook.clone(),
        ));

        AppState {
            google: Arc::new(GoogleNotificationHandler::new(
                google,
                watch_calendar_id,
                dispatcher.clone(),
            )),
            outlook: Arc::new(OutlookNotificationHandler::new(outlook, dispatcher)),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let session = Session::from_settings(&settings.google)?;
        let google = GoogleClient::new(session);

        let ms_token = settings
            .outlook
            .access_token
            .clone()
            .context("No Outlook credentials configured. Set MS_ACCESS_TOKEN.")?;
        let outlook = GraphClient::new(ms_token);

        let registry = settings.registry();
        for destination in registry.invalid_entries() {
            tracing::warn!(
                destination = %destination.name,
                provider = %destination.provider,
                "destination has an unrecognized provider and will be reported as failed on every sync"
            );
        }
        tracing::info!(destinations = registry.len(), "loaded sync destinations");

        Ok(Self::new(
            Arc::new(google),
            Arc::new(outlook),
            registry,
            settings.google.watch_calendar_id.clone(),
        ))
    }
}
