//! Holds the Google OAuth access token and refreshes it when it expires.
//!
//! A session is created once at startup and shared by every request.
//! Refreshing swaps the token in place.

use anyhow::{Context, Result};
use calsync_core::settings::GoogleSettings;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::RwLock;

const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Refresh slightly before Google's deadline so in-flight requests don't race it.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// OAuth client credentials, required to refresh tokens.
#[derive(Debug, Clone)]
pub struct GoogleCredentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Clone)]
struct SessionData {
    access_token: String,
    refresh_token: Option<String>,
    /// Unknown for tokens handed in through the environment
    expires_at: Option<DateTime<Utc>>,
}

pub struct Session {
    credentials: Option<GoogleCredentials>,
    data: RwLock<SessionData>,
    token_url: String,
    http: reqwest::Client,
}

impl Session {
    pub fn new(
        credentials: Option<GoogleCredentials>,
        access_token: impl Into<String>,
        refresh_token: Option<String>,
    ) -> Self {
        Session {
            credentials,
            data: RwLock::new(SessionData {
                access_token: access_token.into(),
                refresh_token,
                expires_at: None,
            }),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_settings(settings: &GoogleSettings) -> Result<Self> {
        let credentials = match (&settings.client_id, &settings.client_secret) {
            (Some(client_id), Some(client_secret)) => Some(GoogleCredentials {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
            }),
            _ => None,
        };

        let access_token = settings.access_token.clone().unwrap_or_default();

        // Without an access token the first call has to refresh.
        if access_token.is_empty() && (settings.refresh_token.is_none() || credentials.is_none()) {
            anyhow::bail!(
                "No Google credentials configured.\n\
                Set GOOGLE_ACCESS_TOKEN, or GOOGLE_REFRESH_TOKEN together with \
                GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET."
            );
        }

        Ok(Self::new(
            credentials,
            access_token,
            settings.refresh_token.clone(),
        ))
    }

    /// Point token refresh at a different endpoint.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    pub fn can_refresh(&self) -> bool {
        self.credentials.is_some()
    }

    /// Current access token, refreshed first if it is known to be expired or missing.
    pub async fn access_token(&self) -> Result<String> {
        let stale = {
            let data = self.data.read().await;
            if !is_expired(&data) {
                return Ok(data.access_token.clone());
            }
            data.access_token.clone()
        };

        self.refresh(&stale).await
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// `stale` is the token the caller found unusable. If another task has
    /// already replaced it with a live token, that token is returned and no
    /// request is made.
    pub async fn refresh(&self, stale: &str) -> Result<String> {
        let credentials = self
            .credentials
            .as_ref()
            .context("Google access token expired and no client credentials are configured")?;

        let mut data = self.data.write().await;

        if data.access_token != stale && !is_expired(&data) {
            return Ok(data.access_token.clone());
        }

        let refresh_token = data
            .refresh_token
            .clone()
            .context("Google access token expired and no refresh token is configured")?;

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .context("Failed to send Google token refresh request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to refresh Google token ({}): {}", status, error_text);
        }

        #[derive(Deserialize)]
        struct RefreshResponse {
            access_token: String,
            expires_in: i64,
            refresh_token: Option<String>,
        }

        let refreshed: RefreshResponse = response
            .json()
            .await
            .context("Failed to parse Google token refresh response")?;

        data.access_token = refreshed.access_token;
        data.expires_at =
            Some(Utc::now() + Duration::seconds(refreshed.expires_in - EXPIRY_MARGIN_SECS));

        // Google typically doesn't return a new refresh_token on refresh
        if let Some(refresh_token) = refreshed.refresh_token {
            data.refresh_token = Some(refresh_token);
        }

        tracing::info!(expires_at = ?data.expires_at, "refreshed Google access token");

        Ok(data.access_token.clone())
    }
}

fn is_expired(data: &SessionData) -> bool {
    if data.access_token.is_empty() {
        return true;
    }
    data.expires_at.is_some_and(|at| Utc::now() >= at)
}
