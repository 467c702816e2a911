//! Google Calendar REST implementation of `CalendarStore`.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use slotsync_core::calendar::{CalendarEvent, CalendarId, EventDraft};
use slotsync_core::storage::{CalendarStore, Result, StoreError, TimeWindow};

use crate::config::Config;

use super::auth::{ServiceAccountKey, ServiceAccountTokens, TokenSource};
use super::conversions::{to_calendar_event, to_event_body, EventList, GoogleEvent};
use super::error::{status_to_store_error, transport_error, GoogleAuthError};

/// Upper bound on `events.list` pages fetched for one query.
const MAX_PAGES: usize = 50;

/// Calendar store backed by the Google Calendar v3 API.
#[derive(Debug)]
pub struct GoogleCalendarStore {
    http: reqwest::Client,
    base_url: Url,
    tokens: TokenSource,
}

impl GoogleCalendarStore {
    pub fn new(http: reqwest::Client, base_url: Url, tokens: TokenSource) -> Self {
        Self {
            http,
            base_url,
            tokens,
        }
    }

    /// Builds a store from `GOOGLE_*` settings.
    ///
    /// A static access token wins over a service account key file.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let tokens = match (
            &config.google_access_token,
            &config.google_service_account_file,
        ) {
            (Some(token), _) => TokenSource::Static(token.clone()),
            (None, Some(path)) => {
                let key = ServiceAccountKey::from_file(path)?;
                tracing::info!(client_email = %key.client_email, "Loaded Google service account");
                TokenSource::ServiceAccount(ServiceAccountTokens::new(key))
            }
            (None, None) => return Err(GoogleAuthError::MissingCredentials.into()),
        };

        let base_url = Url::parse(&config.google_calendar_api_base).with_context(|| {
            format!(
                "Invalid GOOGLE_CALENDAR_API_BASE: {}",
                config.google_calendar_api_base
            )
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::new(http, base_url, tokens))
    }

    /// `{base}/calendars/{calendar_id}/events[/{event_id}]` with encoded segments.
    fn events_url(&self, calendar_id: &CalendarId, event_id: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                StoreError::InvalidData(format!("base URL cannot have a path: {}", self.base_url))
            })?;
            segments
                .pop_if_empty()
                .extend(["calendars", calendar_id.as_str(), "events"]);
            if let Some(id) = event_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn token(&self) -> Result<String> {
        self.tokens.access_token(&self.http).await
    }
}

/// Handle a response carrying a JSON body.
async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
    resource: &str,
) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(status_to_store_error(status.as_u16(), resource, &body))
    }
}

/// Handle delete responses (no body expected).
async fn handle_delete_response(response: reqwest::Response, resource: &str) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(status_to_store_error(status.as_u16(), resource, &body))
    }
}

fn written_event(item: GoogleEvent, draft: &EventDraft) -> Result<CalendarEvent> {
    to_calendar_event(item, Some(&draft.time_zone))?
        .ok_or_else(|| StoreError::InvalidData("store returned a cancelled event".to_string()))
}

#[async_trait]
impl CalendarStore for GoogleCalendarStore {
    async fn list_events(
        &self,
        calendar_id: &CalendarId,
        window: TimeWindow,
        text_filter: Option<&str>,
    ) -> Result<Vec<CalendarEvent>> {
        let url = self.events_url(calendar_id, None)?;
        let token = self.token().await?;

        let mut events = Vec::new();
        let mut page_token: Option<String> = None;
        for page_number in 1.. {
            if page_number > MAX_PAGES {
                return Err(StoreError::QueryFailed(format!(
                    "listing {calendar_id} exceeded {MAX_PAGES} pages"
                )));
            }

            let mut query = vec![
                ("timeMin", window.from.to_rfc3339()),
                ("timeMax", window.to.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ];
            if let Some(text) = text_filter {
                query.push(("q", text.to_string()));
            }
            if let Some(page) = &page_token {
                query.push(("pageToken", page.clone()));
            }

            let response = self
                .http
                .get(url.clone())
                .bearer_auth(&token)
                .query(&query)
                .send()
                .await
                .map_err(transport_error)?;
            let page: EventList = handle_response(response, calendar_id.as_str()).await?;

            for item in page.items {
                if let Some(event) = to_calendar_event(item, page.time_zone.as_deref())? {
                    events.push(event);
                }
            }

            match page.next_page_token {
                Some(next) if page_token.as_deref() == Some(next.as_str()) => {
                    return Err(StoreError::QueryFailed(format!(
                        "listing {calendar_id} repeated page token {next}"
                    )));
                }
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        tracing::debug!(%calendar_id, count = events.len(), text_filter, "Listed events");
        Ok(events)
    }

    async fn insert_event(
        &self,
        calendar_id: &CalendarId,
        draft: &EventDraft,
    ) -> Result<CalendarEvent> {
        let url = self.events_url(calendar_id, None)?;
        let token = self.token().await?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&token)
            .json(&to_event_body(draft))
            .send()
            .await
            .map_err(transport_error)?;
        let item: GoogleEvent = handle_response(response, calendar_id.as_str()).await?;

        let event = written_event(item, draft)?;
        tracing::info!(%calendar_id, event_id = %event.id, summary = %event.summary, "Inserted event");
        Ok(event)
    }

    async fn update_event(
        &self,
        calendar_id: &CalendarId,
        event_id: &str,
        draft: &EventDraft,
    ) -> Result<CalendarEvent> {
        let url = self.events_url(calendar_id, Some(event_id))?;
        let token = self.token().await?;

        let response = self
            .http
            .put(url)
            .bearer_auth(&token)
            .json(&to_event_body(draft))
            .send()
            .await
            .map_err(transport_error)?;
        let item: GoogleEvent = handle_response(response, event_id).await?;

        let event = written_event(item, draft)?;
        tracing::info!(%calendar_id, event_id, summary = %event.summary, "Updated event");
        Ok(event)
    }

    async fn delete_event(&self, calendar_id: &CalendarId, event_id: &str) -> Result<()> {
        let url = self.events_url(calendar_id, Some(event_id))?;
        let token = self.token().await?;

        let response = self
            .http
            .delete(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(transport_error)?;
        handle_delete_response(response, event_id).await?;

        tracing::info!(%calendar_id, event_id, "Deleted event");
        Ok(())
    }
}
