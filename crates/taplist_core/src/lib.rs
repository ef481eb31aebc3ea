//! Taplist core: beer records, classification, filter/sort engines and the
//! pure application state machine.
mod availability;
mod effect;
mod extract;
mod filter;
mod msg;
mod record;
mod sort;
mod state;
pub mod style;
mod update;
mod view_model;

pub use availability::{next_availability, relative_time, AvailabilityMap, AvailabilityRecord};
pub use effect::Effect;
pub use extract::{
    extract_records, parse_abv, ExtractionError, TabularDocument, HEADER_BREWERY_LABEL,
    MIN_CELLS,
};
pub use filter::{filter_records, AbvBounds, AvailabilityFilter, FilterCriteria};
pub use msg::Msg;
pub use record::{BeerKey, BeerRecord, KEY_SEPARATOR};
pub use sort::{apply_sort, compare, sort_records, SortColumn, SortDirection, SortState};
pub use state::{AppState, AvailabilityError, LoadError, LoadStatus, StoreStatus};
pub use style::{classify, StyleCategory, UNCLASSIFIED};
pub use update::update;
pub use view_model::{format_abv, AppViewModel, BeerRowView, Counts, StatusView};
