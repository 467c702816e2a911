//! Test doubles for the reconcile loops.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use slotsync_core::calendar::{CalendarEvent, CalendarId, EventDraft};
use slotsync_core::storage::{CalendarStore, Result, StoreError, TimeWindow};

use crate::storage::inmemory::InMemoryStore;

pub fn ts(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

pub fn window(from: &str, to: &str) -> TimeWindow {
    TimeWindow::new(ts(from), ts(to)).unwrap()
}

pub fn calendar() -> CalendarId {
    CalendarId::new("ada@example.com")
}

pub fn event(summary: &str, from: &str, to: &str) -> CalendarEvent {
    CalendarEvent {
        id: format!("seed-{summary}-{from}"),
        summary: summary.to_string(),
        description: String::new(),
        start: ts(from),
        end: ts(to),
        time_zone: "America/Toronto".to_string(),
    }
}

/// In-memory store that counts calls and can be told to fail.
#[derive(Default)]
pub struct RecordingStore {
    inner: InMemoryStore,
    list_calls: AtomicUsize,
    write_calls: AtomicUsize,
    list_error: Option<StoreError>,
    /// Inserts succeed this many times, then fail with the error.
    insert_error: Option<(usize, StoreError)>,
    inserts: AtomicUsize,
    last_text_filter: Mutex<Option<String>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_list(mut self, error: StoreError) -> Self {
        self.list_error = Some(error);
        self
    }

    pub fn failing_insert_after(mut self, successes: usize, error: StoreError) -> Self {
        self.insert_error = Some((successes, error));
        self
    }

    pub async fn seed(&self, event: CalendarEvent) {
        self.inner.seed(&calendar(), event).await;
    }

    pub async fn events(&self) -> Vec<CalendarEvent> {
        self.inner.events(&calendar()).await
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.list_calls() + self.write_calls()
    }

    pub fn last_text_filter(&self) -> Option<String> {
        self.last_text_filter.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarStore for RecordingStore {
    async fn list_events(
        &self,
        calendar_id: &CalendarId,
        window: TimeWindow,
        text_filter: Option<&str>,
    ) -> Result<Vec<CalendarEvent>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_text_filter.lock().unwrap() = text_filter.map(str::to_string);
        if let Some(error) = &self.list_error {
            return Err(error.clone());
        }
        self.inner.list_events(calendar_id, window, text_filter).await
    }

    async fn insert_event(
        &self,
        calendar_id: &CalendarId,
        draft: &EventDraft,
    ) -> Result<CalendarEvent> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        let done = self.inserts.fetch_add(1, Ordering::SeqCst);
        if let Some((successes, error)) = &self.insert_error {
            if done >= *successes {
                return Err(error.clone());
            }
        }
        self.inner.insert_event(calendar_id, draft).await
    }

    async fn update_event(
        &self,
        calendar_id: &CalendarId,
        event_id: &str,
        draft: &EventDraft,
    ) -> Result<CalendarEvent> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.update_event(calendar_id, event_id, draft).await
    }

    async fn delete_event(&self, calendar_id: &CalendarId, event_id: &str) -> Result<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_event(calendar_id, event_id).await
    }
}
