use crate::BeerKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the beer-list page and hand back its table rows.
    FetchDocument,
    /// Bulk-read the availability store.
    LoadAvailability,
    /// Re-read the key from the store, flip it, write it back.
    ToggleAvailability { key: BeerKey },
}
