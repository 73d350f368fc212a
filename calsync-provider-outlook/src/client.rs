//! Microsoft Graph calendar client.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Response;
use url::Url;

use crate::types::OutlookEvent;

const MICROSOFT_GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Ask Graph to express start/end in UTC instead of the event's own zone.
const OUTLOOK_TIMEZONE_HEADER: &str = r#"outlook.timezone="UTC""#;

/// Graph's alias for the signed-in user.
const SIGNED_IN_USER: &str = "me";

/// The calls calsync makes against Outlook calendars.
#[async_trait]
pub trait OutlookCalendarApi: Send + Sync {
    /// Fetch one of the signed-in user's events.
    async fn get_event(&self, id: &str) -> Result<OutlookEvent>;

    /// Create an event in the default calendar of `user_id` (`me` for the signed-in user).
    async fn create_event(&self, user_id: &str, event: &OutlookEvent) -> Result<OutlookEvent>;
}

pub struct GraphClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl GraphClient {
    /// Token acquisition happens outside calsync; the token is used as given.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: MICROSOFT_GRAPH_API_BASE.to_string(),
            access_token: access_token.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid Graph base URL: {}", self.base_url))?;

        url.path_segments_mut()
            .map_err(|_| anyhow!("Graph base URL cannot have a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn events_url(&self, user_id: &str) -> Result<Url> {
        if user_id == SIGNED_IN_USER {
            self.url(&["me", "events"])
        } else {
            self.url(&["users", user_id, "events"])
        }
    }
}

async fn error_for_status(response: Response, action: &str) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();
    anyhow::bail!("{} ({}): {}", action, status, error_text)
}

#[async_trait]
impl OutlookCalendarApi for GraphClient {
    async fn get_event(&self, id: &str) -> Result<OutlookEvent> {
        let url = self.url(&["me", "events", id])?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .header("Prefer", OUTLOOK_TIMEZONE_HEADER)
            .send()
            .await
            .with_context(|| format!("Failed to fetch Outlook event {}", id))?;

        let event = error_for_status(response, &format!("Failed to fetch Outlook event {}", id))
            .await?
            .json()
            .await
            .context("Failed to parse Outlook event")?;

        Ok(event)
    }

    async fn create_event(&self, user_id: &str, event: &OutlookEvent) -> Result<OutlookEvent> {
        let url = self.events_url(user_id)?;
        let subject = event.subject.as_deref().unwrap_or_default();

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(event)
            .send()
            .await
            .with_context(|| format!("Failed to create event: {}", subject))?;

        let created = error_for_status(response, &format!("Failed to create event: {}", subject))
            .await?
            .json()
            .await
            .context("Failed to parse created Outlook event")?;

        Ok(created)
    }
}
