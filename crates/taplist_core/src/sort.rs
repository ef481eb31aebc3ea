use std::cmp::Ordering;

use serde::Serialize;

use crate::availability::AvailabilityMap;
use crate::record::BeerRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SortColumn {
    Brewery,
    Name,
    Style,
    Abv,
    Location,
    Bar,
    /// Time the beer was last confirmed available.
    LastSeen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SortState {
    pub column: Option<SortColumn>,
    pub direction: SortDirection,
}

impl SortState {
    /// Same column flips direction; a new column starts ascending.
    pub fn toggle(&mut self, column: SortColumn) {
        if self.column == Some(column) {
            self.direction = self.direction.flipped();
        } else {
            self.column = Some(column);
            self.direction = SortDirection::Ascending;
        }
    }
}

pub fn compare(
    a: &BeerRecord,
    b: &BeerRecord,
    column: SortColumn,
    availability: &AvailabilityMap,
) -> Ordering {
    match column {
        SortColumn::Abv => a.abv.total_cmp(&b.abv),
        SortColumn::LastSeen => recency(a, availability).cmp(&recency(b, availability)),
        SortColumn::Brewery => cmp_text(&a.brewery, &b.brewery),
        SortColumn::Name => cmp_text(&a.name, &b.name),
        SortColumn::Style => cmp_text(&a.raw_style, &b.raw_style),
        SortColumn::Location => cmp_text(&a.location, &b.location),
        SortColumn::Bar => cmp_text(&a.bar, &b.bar),
    }
}

// Never-seen and currently unavailable beers count as oldest.
fn recency(record: &BeerRecord, availability: &AvailabilityMap) -> i64 {
    availability
        .last_seen(&record.key())
        .map_or(0, |at| at.timestamp_millis())
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Returns a new ordering of `records`. Ties keep their input order.
pub fn sort_records<'a>(
    records: &[&'a BeerRecord],
    column: SortColumn,
    direction: SortDirection,
    availability: &AvailabilityMap,
) -> Vec<&'a BeerRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ord = compare(a, b, column, availability);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    sorted
}

/// Applies the sort state; an unset column leaves the order untouched.
pub fn apply_sort<'a>(
    records: &[&'a BeerRecord],
    state: SortState,
    availability: &AvailabilityMap,
) -> Vec<&'a BeerRecord> {
    match state.column {
        Some(column) => sort_records(records, column, state.direction, availability),
        None => records.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_same_column_flips_and_new_column_resets() {
        let mut state = SortState::default();
        state.toggle(SortColumn::Abv);
        assert_eq!(state.column, Some(SortColumn::Abv));
        assert_eq!(state.direction, SortDirection::Ascending);

        state.toggle(SortColumn::Abv);
        assert_eq!(state.direction, SortDirection::Descending);

        state.toggle(SortColumn::Name);
        assert_eq!(state.column, Some(SortColumn::Name));
        assert_eq!(state.direction, SortDirection::Ascending);
    }

    #[test]
    fn text_compare_ignores_case() {
        assert_eq!(cmp_text("alpha", "Beta"), Ordering::Less);
        assert_eq!(cmp_text("ALPHA", "alpha"), Ordering::Equal);
    }
}
