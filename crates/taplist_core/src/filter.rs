use serde::Serialize;

use crate::availability::AvailabilityMap;
use crate::record::BeerRecord;
use crate::style::category_label;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AvailabilityFilter {
    #[default]
    Any,
    Available,
    Unavailable,
}

impl AvailabilityFilter {
    fn accepts(self, is_available: bool) -> bool {
        match self {
            AvailabilityFilter::Any => true,
            AvailabilityFilter::Available => is_available,
            AvailabilityFilter::Unavailable => !is_available,
        }
    }
}

/// Current filter inputs. Rebuilt from UI state before every pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterCriteria {
    pub search_text: String,
    pub bar: Option<String>,
    pub style: Option<String>,
    pub availability: AvailabilityFilter,
    pub abv_min: f64,
    pub abv_max: f64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            bar: None,
            style: None,
            availability: AvailabilityFilter::Any,
            abv_min: 0.0,
            abv_max: f64::MAX,
        }
    }
}

impl FilterCriteria {
    pub fn with_bounds(bounds: AbvBounds) -> Self {
        Self {
            abv_min: bounds.min,
            abv_max: bounds.max,
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &BeerRecord, availability: &AvailabilityMap) -> bool {
        self.matches_search(record)
            && self.matches_bar(record)
            && self.matches_style(record)
            && self.availability.accepts(availability.is_available(&record.key()))
            && self.abv_min <= record.abv
            && record.abv <= self.abv_max
    }

    fn matches_search(&self, record: &BeerRecord) -> bool {
        if self.search_text.is_empty() {
            return true;
        }
        let needle = self.search_text.to_lowercase();
        [&record.brewery, &record.name, &record.raw_style, &record.location]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_bar(&self, record: &BeerRecord) -> bool {
        match non_empty(&self.bar) {
            Some(bar) => record.bar == bar,
            None => true,
        }
    }

    // Category label or raw text: accepts both a picked category and typed text.
    fn matches_style(&self, record: &BeerRecord) -> bool {
        let Some(style) = non_empty(&self.style) else {
            return true;
        };
        let needle = style.to_lowercase();
        category_label(&record.raw_style).to_lowercase().contains(&needle)
            || record.raw_style.to_lowercase().contains(&needle)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Keeps the records passing `criteria`, in input order.
pub fn filter_records<'a>(
    records: &'a [BeerRecord],
    criteria: &FilterCriteria,
    availability: &AvailabilityMap,
) -> Vec<&'a BeerRecord> {
    records
        .iter()
        .filter(|record| criteria.matches(record, availability))
        .collect()
}

/// Whole-number ABV range covering every loaded record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AbvBounds {
    pub min: f64,
    pub max: f64,
}

impl AbvBounds {
    pub fn from_records(records: &[BeerRecord]) -> Option<Self> {
        let mut abvs = records.iter().map(|r| r.abv);
        let first = abvs.next()?;
        let (min, max) = abvs.fold((first, first), |(lo, hi), abv| (lo.min(abv), hi.max(abv)));
        Some(Self {
            min: min.floor(),
            max: max.ceil(),
        })
    }
}
