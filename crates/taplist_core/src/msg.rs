use crate::{
    AvailabilityError, AvailabilityFilter, AvailabilityMap, AvailabilityRecord, BeerKey,
    LoadError, SortColumn, TabularDocument,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Application start: kick off the document fetch and availability load.
    Started,
    /// Engine fetched and tabulated the beer-list page.
    DocumentFetched(TabularDocument),
    /// Engine could not fetch or decode the beer-list page.
    LoadFailed(LoadError),
    /// User asked to try the failed load again.
    RetryClicked,
    /// Fresh bulk read of the availability store; replaces the cache.
    AvailabilityLoaded(AvailabilityMap),
    /// No store configured, or the store could not be reached.
    StoreUnavailable(String),
    /// User edited the free-text search box.
    SearchChanged(String),
    /// User picked a bar, or cleared the choice.
    BarSelected(Option<String>),
    /// User picked a style category or typed style text, or cleared it.
    StyleSelected(Option<String>),
    AvailabilityFilterChanged(AvailabilityFilter),
    /// User moved either ABV slider.
    AbvRangeChanged { min: f64, max: f64 },
    /// User cleared every filter back to the data-derived defaults.
    FiltersReset,
    /// User clicked a column header.
    SortClicked(SortColumn),
    /// User flipped the availability tag on one beer.
    ToggleAvailabilityClicked(BeerKey),
    /// Store confirmed (or rejected) a toggle write.
    ToggleCompleted {
        key: BeerKey,
        result: Result<AvailabilityRecord, AvailabilityError>,
    },
    /// User dismissed the visible notices.
    NoticesDismissed,
    NoOp,
}
