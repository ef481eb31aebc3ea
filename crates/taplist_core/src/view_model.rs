use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::style::{category_label, classify, STYLE_RULES};
use crate::{
    apply_sort, filter_records, relative_time, AbvBounds, AppState, BeerKey, BeerRecord,
    FilterCriteria, LoadStatus, SortState, StoreStatus,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StatusView {
    Idle,
    Loading,
    Ready,
    /// Load failed; the front end offers a retry.
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Counts {
    pub total: usize,
    pub filtered: usize,
    /// Marked available, among the filtered rows.
    pub available: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeerRowView {
    pub key: BeerKey,
    pub brewery: String,
    pub name: String,
    pub style: String,
    pub category: &'static str,
    pub abv: f64,
    /// `"n/a"` when the page stated no ABV.
    pub abv_text: String,
    pub location: String,
    pub bar: String,
    pub is_available: bool,
    pub last_seen: Option<String>,
    pub toggle_pending: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppViewModel {
    pub status: StatusView,
    pub rows: Vec<BeerRowView>,
    pub counts: Counts,
    pub bar_options: Vec<String>,
    pub style_options: Vec<&'static str>,
    pub abv_bounds: Option<AbvBounds>,
    pub criteria: FilterCriteria,
    pub sort: SortState,
    pub availability_enabled: bool,
    pub notices: Vec<String>,
}

impl AppState {
    /// Runs filter then sort over the current records and shapes the result
    /// for display. `now` anchors the relative "last seen" strings.
    pub fn view(&self, now: DateTime<Utc>) -> AppViewModel {
        let filtered = filter_records(&self.records, &self.criteria, &self.availability);
        let sorted = apply_sort(&filtered, self.sort, &self.availability);

        let rows: Vec<BeerRowView> = sorted.iter().map(|r| self.row_view(r, now)).collect();
        let counts = Counts {
            total: self.records.len(),
            filtered: rows.len(),
            available: rows.iter().filter(|r| r.is_available).count(),
        };

        AppViewModel {
            status: status_view(&self.status),
            rows,
            counts,
            bar_options: bar_options(&self.records),
            style_options: style_options(&self.records),
            abv_bounds: self.bounds,
            criteria: self.criteria.clone(),
            sort: self.sort,
            availability_enabled: !matches!(self.store, StoreStatus::Unavailable(_)),
            notices: self.notices.clone(),
        }
    }

    fn row_view(&self, record: &BeerRecord, now: DateTime<Utc>) -> BeerRowView {
        let key = record.key();
        let last_seen = self.availability.last_seen(&key);
        BeerRowView {
            brewery: record.brewery.clone(),
            name: record.name.clone(),
            style: record.raw_style.clone(),
            category: category_label(&record.raw_style),
            abv: record.abv,
            abv_text: format_abv(record.abv),
            location: record.location.clone(),
            bar: record.bar.clone(),
            is_available: last_seen.is_some(),
            last_seen: last_seen.map(|at| relative_time(at, now)),
            toggle_pending: self.pending_toggles.contains(&key),
            key,
        }
    }
}

fn status_view(status: &LoadStatus) -> StatusView {
    match status {
        LoadStatus::Idle => StatusView::Idle,
        LoadStatus::Loading => StatusView::Loading,
        LoadStatus::Ready => StatusView::Ready,
        LoadStatus::Failed(err) => StatusView::Failed {
            message: err.to_string(),
        },
    }
}

pub fn format_abv(abv: f64) -> String {
    if abv > 0.0 {
        format!("{abv:.1}%")
    } else {
        "n/a".to_string()
    }
}

fn bar_options(records: &[BeerRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.bar.as_str())
        .filter(|bar| !bar.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(ToOwned::to_owned)
        .collect()
}

// Categories present in the data, in rule-table order. Unclassified is never offered.
fn style_options(records: &[BeerRecord]) -> Vec<&'static str> {
    let present: BTreeSet<&'static str> = records
        .iter()
        .filter_map(|r| classify(&r.raw_style))
        .map(|c| c.label())
        .collect();
    STYLE_RULES
        .iter()
        .map(|rule| rule.category.label())
        .filter(|label| present.contains(label))
        .collect()
}
