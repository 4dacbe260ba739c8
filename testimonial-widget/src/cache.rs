//! TTL-bounded cache of fetched testimonials, keyed by campaign
//!
//! Caching is an optimization only: every storage failure degrades to a miss.
//!
//! The storage key holds the campaign alone, so widgets for one campaign with
//! different `data-sort`/`data-limit` share a slot. Each entry records the
//! query it answered and is only served to queries it can satisfy.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use testimonial_feed::{SortOrder, Testimonial, TestimonialQuery};

use crate::traits::KeyValueStorage;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Persisted cache record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub payload: Vec<Testimonial>,
    /// Unix milliseconds.
    pub written_at: i64,
    /// Ordering the payload was fetched with.
    #[serde(default)]
    pub sort: Option<SortOrder>,
    /// Limit the payload was fetched with.
    #[serde(default)]
    pub limit: Option<u32>,
}

impl CacheEntry {
    /// The payload cut to `query`, if this entry can answer it.
    ///
    /// A smaller limit is served by truncation. A larger one only when the
    /// earlier fetch came back short, meaning the campaign has nothing more.
    fn answer(self, query: &TestimonialQuery) -> Option<Vec<Testimonial>> {
        if self.sort != Some(query.sort) {
            return None;
        }
        let stored_limit = self.limit?;
        let mut payload = self.payload;
        let exhausted = payload.len() < stored_limit as usize;
        if stored_limit < query.limit && !exhausted {
            return None;
        }
        payload.truncate(query.limit as usize);
        Some(payload)
    }
}

pub struct CacheStore {
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    key_prefix: String,
}

impl CacheStore {
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            clock,
            ttl,
            key_prefix: key_prefix.into(),
        }
    }

    pub fn key_for(&self, campaign_id: &str) -> String {
        format!("{}{campaign_id}", self.key_prefix)
    }

    /// Cached testimonials for `query`, if present, younger than the TTL and
    /// fetched with a compatible sort and limit.
    ///
    /// Malformed, expired and future-dated entries are removed.
    pub fn read(&self, query: &TestimonialQuery) -> Option<Vec<Testimonial>> {
        let key = self.key_for(&query.campaign);
        let raw = match self.storage.get_item(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("[cache] Read of '{key}' failed, treating as miss: {e}");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("[cache] Discarding malformed entry '{key}': {e}");
                self.storage.remove_item(&key);
                return None;
            }
        };

        let now_ms = self.clock.now().timestamp_millis();
        let Some(age_ms) = now_ms.checked_sub(entry.written_at).filter(|age| *age >= 0) else {
            log::warn!(
                "[cache] Discarding entry '{key}' with unusable timestamp {}",
                entry.written_at
            );
            self.storage.remove_item(&key);
            return None;
        };
        let ttl_ms = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        if age_ms > ttl_ms {
            log::debug!("[cache] Entry '{key}' expired ({age_ms}ms old)");
            self.storage.remove_item(&key);
            return None;
        }

        let Some(payload) = entry.answer(query) else {
            log::debug!(
                "[cache] Entry '{key}' was fetched for another sort or a smaller limit"
            );
            return None;
        };
        log::debug!("[cache] Hit '{key}' ({} items)", payload.len());
        Some(payload)
    }

    /// Store `data` as the answer to `query`. Failures are logged and swallowed.
    pub fn write(&self, query: &TestimonialQuery, data: &[Testimonial]) {
        let key = self.key_for(&query.campaign);
        let entry = CacheEntry {
            payload: data.to_vec(),
            written_at: self.clock.now().timestamp_millis(),
            sort: Some(query.sort),
            limit: Some(query.limit),
        };

        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("[cache] Cannot serialize entry '{key}': {e}");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(&key, &json) {
            log::warn!("[cache] Write of '{key}' failed, continuing uncached: {e}");
            // A stale entry must not outlive a failed refresh.
            self.storage.remove_item(&key);
        }
    }
}
