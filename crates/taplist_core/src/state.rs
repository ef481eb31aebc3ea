use std::collections::BTreeSet;

use crate::{
    AbvBounds, AvailabilityMap, BeerKey, BeerRecord, ExtractionError, FilterCriteria, SortState,
};

/// Why the beer list could not be loaded. Both variants mean "no usable
/// data" and share the retry path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("could not fetch the beer list: {0}")]
    Fetch(String),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AvailabilityError {
    /// Store missing or unreachable; availability features go inert.
    #[error("availability tracking is unavailable: {0}")]
    Unavailable(String),
    /// Store reachable but the write did not go through.
    #[error("availability update failed: {0}")]
    WriteFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(LoadError),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoreStatus {
    /// Not heard back from the store yet.
    #[default]
    Unknown,
    Ready,
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) status: LoadStatus,
    pub(crate) records: Vec<BeerRecord>,
    pub(crate) bounds: Option<AbvBounds>,
    pub(crate) criteria: FilterCriteria,
    pub(crate) sort: SortState,
    pub(crate) availability: AvailabilityMap,
    pub(crate) store: StoreStatus,
    pub(crate) pending_toggles: BTreeSet<BeerKey>,
    pub(crate) notices: Vec<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn store_status(&self) -> &StoreStatus {
        &self.store
    }

    pub fn records(&self) -> &[BeerRecord] {
        &self.records
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn availability(&self) -> &AvailabilityMap {
        &self.availability
    }

    pub fn has_pending_toggles(&self) -> bool {
        !self.pending_toggles.is_empty()
    }

    pub fn knows_record(&self, key: &BeerKey) -> bool {
        self.records
            .iter()
            .any(|r| r.brewery == key.brewery && r.name == key.name)
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn push_notice(&mut self, notice: impl Into<String>) {
        self.notices.push(notice.into());
        self.dirty = true;
    }

    pub(crate) fn set_records(&mut self, records: Vec<BeerRecord>) {
        self.bounds = AbvBounds::from_records(&records);
        if let Some(bounds) = self.bounds {
            self.criteria.abv_min = bounds.min;
            self.criteria.abv_max = bounds.max;
        }
        self.records = records;
        self.status = LoadStatus::Ready;
        self.dirty = true;
    }

    pub(crate) fn reset_criteria(&mut self) {
        self.criteria = match self.bounds {
            Some(bounds) => FilterCriteria::with_bounds(bounds),
            None => FilterCriteria::default(),
        };
        self.dirty = true;
    }
}
