use chrono::{DateTime, Utc};
use taplist_core::{next_availability, AvailabilityMap, AvailabilityRecord, BeerKey};
use taplist_logging::{tap_debug, tap_info};

use crate::store::{AvailabilityStore, StoreError};

/// Bulk read of the whole store into a fresh cache.
pub async fn load_availability(
    store: Option<&dyn AvailabilityStore>,
) -> Result<AvailabilityMap, StoreError> {
    let store = store.ok_or(StoreError::NotConfigured)?;
    let entries = store.load_all().await?;
    tap_debug!("Availability cache holds {} entries", entries.len());
    Ok(entries.into_iter().collect())
}

/// Flips the stored flag for `key` from the store's current truth, not
/// from any local cache. Updates an existing row, inserts a missing one.
/// Returns the record that was written.
pub async fn toggle_availability(
    store: Option<&dyn AvailabilityStore>,
    key: &BeerKey,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<AvailabilityRecord, StoreError> {
    let store = store.ok_or(StoreError::NotConfigured)?;
    let current = store.get(key).await?;
    let next = next_availability(current.as_ref(), actor, now);
    match current {
        Some(_) => store.update(key, &next).await?,
        None => store.insert(key, &next).await?,
    }
    tap_info!(
        "{} marked {} by {}",
        key,
        if next.is_available { "available" } else { "unavailable" },
        actor
    );
    Ok(next)
}
