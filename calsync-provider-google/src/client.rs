//! Google Calendar API client.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use url::Url;

use crate::session::Session;
use crate::types::{GoogleEvent, GoogleEventList, ListEventsOptions};

const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// The calls calsync makes against a Google calendar.
#[async_trait]
pub trait GoogleCalendarApi: Send + Sync {
    /// `events.list` on one calendar, following every page.
    async fn list_recent_events(
        &self,
        calendar_id: &str,
        options: &ListEventsOptions,
    ) -> Result<Vec<GoogleEvent>>;

    /// `events.insert`, returning the created event.
    async fn insert_event(&self, calendar_id: &str, event: &GoogleEvent) -> Result<GoogleEvent>;
}

pub struct GoogleClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl GoogleClient {
    pub fn new(session: Session) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: GOOGLE_CALENDAR_API_BASE.to_string(),
            session,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn events_url(&self, calendar_id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid Google API base URL: {}", self.base_url))?;

        url.path_segments_mut()
            .map_err(|_| anyhow!("Google API base URL cannot have a path: {}", self.base_url))?
            .pop_if_empty()
            .push("calendars")
            .push(calendar_id)
            .push("events");

        Ok(url)
    }

    /// Send a request with the session's bearer token.
    ///
    /// A 401 means the token went stale before its known expiry (or the
    /// expiry was never known), so the token is refreshed and the request
    /// sent once more.
    async fn send_authorized<F>(&self, build: F) -> Result<Response>
    where
        F: Fn(&reqwest::Client) -> RequestBuilder,
    {
        let token = self.session.access_token().await?;
        let response = build(&self.http).bearer_auth(&token).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED && self.session.can_refresh() {
            tracing::debug!("Google API rejected access token, refreshing");
            let token = self.session.refresh(&token).await?;
            return Ok(build(&self.http).bearer_auth(&token).send().await?);
        }

        Ok(response)
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
impl GoogleCalendarApi for GoogleClient {
    async fn list_recent_events(
        &self,
        calendar_id: &str,
        options: &ListEventsOptions,
    ) -> Result<Vec<GoogleEvent>> {
        let url = self.events_url(calendar_id)?;
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = options.query_pairs();
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let response = self
                .send_authorized(|http| http.get(url.clone()).query(&query))
                .await
                .context("Failed to fetch events")?;

            let page: GoogleEventList = error_for_status(response, "Failed to fetch events")
                .await?
                .json()
                .await
                .context("Failed to parse Google events response")?;

            events.extend(page.items);

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        Ok(events)
    }

    async fn insert_event(&self, calendar_id: &str, event: &GoogleEvent) -> Result<GoogleEvent> {
        let url = self.events_url(calendar_id)?;

        let response = self
            .send_authorized(|http| http.post(url.clone()).json(event))
            .await
            .with_context(|| format!("Failed to create event: {}", event.summary))?;

        let created = error_for_status(
            response,
            &format!("Failed to create event: {}", event.summary),
        )
        .await?
        .json()
        .await
        .context("Failed to parse created Google event")?;

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::GoogleCredentials;
    use crate::types::GoogleEventDateTime;
    use serde_json::json;
    use wiremock::matchers::{
        body_json, header, method, path, query_param, query_param_is_missing,
    };
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, session: Session) -> GoogleClient {
        GoogleClient::new(session).with_base_url(server.uri())
    }

    #[tokio::test]
    async fn lists_events_with_query_options() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .and(header("authorization", "Bearer token-1"))
            .and(query_param("maxResults", "250"))
            .and(query_param("singleEvents", "true"))
            .and(query_param("orderBy", "updated"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "calendar#events",
                "items": [{
                    "id": "evt1",
                    "summary": "Standup",
                    "description": "daily",
                    "start": { "dateTime": "2024-01-01T09:00:00Z" },
                    "end": { "dateTime": "2024-01-01T09:30:00Z" }
                }]
            })))
            .mount(&server)
            .await;

        let client = client(&server, Session::new(None, "token-1", None));
        let events = client
            .list_recent_events("primary", &ListEventsOptions::most_recently_updated())
            .await
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "evt1");
        assert_eq!(events[0].description.as_deref(), Some("daily"));
    }

    #[tokio::test]
    async fn follows_next_page_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .and(query_param("orderBy", "updated"))
            .and(query_param_is_missing("pageToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{ "id": "oldest", "updated": "2023-05-01T00:00:00Z" }],
                "nextPageToken": "page-2"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .and(query_param("orderBy", "updated"))
            .and(query_param("pageToken", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{ "id": "newest", "updated": "2024-05-01T00:00:00Z" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, Session::new(None, "token-1", None));
        let events = client
            .list_recent_events("primary", &ListEventsOptions::most_recently_updated())
            .await
            .unwrap();

        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["oldest", "newest"]);
    }

    #[tokio::test]
    async fn empty_calendar_lists_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
            .mount(&server)
            .await;

        let client = client(&server, Session::new(None, "token-1", None));
        let events = client
            .list_recent_events("primary", &ListEventsOptions::default())
            .await
            .unwrap();

        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn inserts_event_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calendars/family@example.com/events"))
            .and(body_json(json!({
                "summary": "Dentist",
                "description": "\n\n[SyncedByMyApp]",
                "start": { "date": "2024-03-01" },
                "end": { "date": "2024-03-02" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "new-id",
                "summary": "Dentist",
                "status": "confirmed"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let event = GoogleEvent {
            summary: "Dentist".to_string(),
            description: Some("\n\n[SyncedByMyApp]".to_string()),
            start: Some(GoogleEventDateTime {
                date: chrono::NaiveDate::from_ymd_opt(2024, 3, 1),
                ..Default::default()
            }),
            end: Some(GoogleEventDateTime {
                date: chrono::NaiveDate::from_ymd_opt(2024, 3, 2),
                ..Default::default()
            }),
            ..Default::default()
        };

        let client = client(&server, Session::new(None, "token-1", None));
        let created = client
            .insert_event("family@example.com", &event)
            .await
            .unwrap();

        assert_eq!(created.id, "new-id");
    }

    #[tokio::test]
    async fn api_errors_carry_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(403).set_body_string("rateLimitExceeded"))
            .mount(&server)
            .await;

        let client = client(&server, Session::new(None, "token-1", None));
        let err = client
            .insert_event("primary", &GoogleEvent::default())
            .await
            .unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("403"));
        assert!(message.contains("rateLimitExceeded"));
    }

    #[tokio::test]
    async fn stale_token_is_refreshed_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .and(header("authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "fresh",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .and(header("authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let credentials = GoogleCredentials {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
        };
        let session = Session::new(Some(credentials), "stale", Some("refresh".to_string()))
            .with_token_url(format!("{}/token", server.uri()));

        let events = client(&server, session)
            .list_recent_events("primary", &ListEventsOptions::default())
            .await
            .unwrap();

        assert!(events.is_empty());
    }
}
