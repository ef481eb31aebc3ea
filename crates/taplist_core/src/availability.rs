use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::record::BeerKey;

/// Crowd-sourced "is this on right now" state for one beer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityRecord {
    pub is_available: bool,
    pub updated_by: String,
    pub updated_at: DateTime<Utc>,
}

/// Read-through cache of the availability store, keyed by `(brewery, name)`.
///
/// Replaced wholesale on every reload; never merged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AvailabilityMap {
    entries: HashMap<BeerKey, AvailabilityRecord>,
}

impl AvailabilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &BeerKey) -> Option<&AvailabilityRecord> {
        self.entries.get(key)
    }

    /// Absent keys count as unavailable.
    pub fn is_available(&self, key: &BeerKey) -> bool {
        self.entries.get(key).is_some_and(|r| r.is_available)
    }

    /// Timestamp of the last confirmation, only while the beer is marked available.
    pub fn last_seen(&self, key: &BeerKey) -> Option<DateTime<Utc>> {
        self.entries
            .get(key)
            .filter(|r| r.is_available)
            .map(|r| r.updated_at)
    }

    pub fn insert(&mut self, key: BeerKey, record: AvailabilityRecord) {
        self.entries.insert(key, record);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(BeerKey, AvailabilityRecord)> for AvailabilityMap {
    fn from_iter<T: IntoIterator<Item = (BeerKey, AvailabilityRecord)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Computes the record a toggle writes back: the flag flipped from the
/// store's current truth (absent flips to available), stamped with the
/// actor and a timestamp strictly after the previous one.
pub fn next_availability(
    current: Option<&AvailabilityRecord>,
    actor: &str,
    now: DateTime<Utc>,
) -> AvailabilityRecord {
    let was_available = current.is_some_and(|r| r.is_available);
    let updated_at = match current {
        Some(prev) if prev.updated_at >= now => prev.updated_at + TimeDelta::milliseconds(1),
        _ => now,
    };
    AvailabilityRecord {
        is_available: !was_available,
        updated_by: actor.to_string(),
        updated_at,
    }
}

/// Short human-readable age such as `"5 min ago"`.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    if secs < 60 {
        return "just now".to_string();
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{mins} min ago");
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{hours} h ago");
    }
    format!("{} d ago", hours / 24)
}
