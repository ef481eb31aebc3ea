use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use taplist_core::{
    filter_records, parse_abv, sort_records, AvailabilityFilter, AvailabilityMap,
    AvailabilityRecord, BeerKey, BeerRecord, FilterCriteria, SortColumn, SortDirection,
    SortState,
};

fn beer(brewery: &str, name: &str, style: &str, abv: f64, bar: &str) -> BeerRecord {
    BeerRecord {
        brewery: brewery.into(),
        name: name.into(),
        raw_style: style.into(),
        abv,
        location: "Main Hall".into(),
        bar: bar.into(),
    }
}

fn sample() -> Vec<BeerRecord> {
    vec![
        beer("Oakham", "Citra", "Golden Ale", 4.2, "Bar A"),
        beer("Thornbridge", "Jaipur", "India Pale Ale", 5.9, "Bar B"),
        beer("Harvey's", "Sussex Best", "Best Bitter", 4.0, "Bar A"),
        beer("Westons", "Old Rosie", "Cloudy Cider", 7.3, "Cider Bar"),
        beer("Mystery", "Thing", "Unknown Fruit Thing", 0.0, "Bar B"),
    ]
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn seen(available: bool, secs: i64) -> AvailabilityRecord {
    AvailabilityRecord {
        is_available: available,
        updated_by: "user_test".into(),
        updated_at: at(secs),
    }
}

fn names(records: &[&BeerRecord]) -> Vec<String> {
    records.iter().map(|r| r.name.clone()).collect()
}

#[test]
fn search_matches_any_text_field_case_insensitively() {
    let records = sample();
    let criteria = FilterCriteria {
        search_text: "PALE".into(),
        ..FilterCriteria::default()
    };
    let hits = filter_records(&records, &criteria, &AvailabilityMap::new());
    assert_eq!(names(&hits), vec!["Jaipur"]);

    let by_location = FilterCriteria {
        search_text: "main hall".into(),
        ..FilterCriteria::default()
    };
    assert_eq!(
        filter_records(&records, &by_location, &AvailabilityMap::new()).len(),
        records.len()
    );
}

#[test]
fn search_text_is_matched_verbatim_including_spaces() {
    let records = sample();
    let criteria = FilterCriteria {
        search_text: "ale ".into(),
        ..FilterCriteria::default()
    };
    // "Golden Ale" ends at "Ale"; only "India Pale Ale" has "ale " inside.
    let hits = filter_records(&records, &criteria, &AvailabilityMap::new());
    assert_eq!(names(&hits), vec!["Jaipur"]);
}

#[test]
fn bar_filter_is_exact() {
    let records = sample();
    let criteria = FilterCriteria {
        bar: Some("Bar A".into()),
        ..FilterCriteria::default()
    };
    let hits = filter_records(&records, &criteria, &AvailabilityMap::new());
    assert_eq!(names(&hits), vec!["Citra", "Sussex Best"]);

    let partial = FilterCriteria {
        bar: Some("Bar".into()),
        ..FilterCriteria::default()
    };
    assert!(filter_records(&records, &partial, &AvailabilityMap::new()).is_empty());
}

#[test]
fn style_filter_accepts_category_or_raw_text() {
    let records = sample();
    let by_category = FilterCriteria {
        style: Some("ipa".into()),
        ..FilterCriteria::default()
    };
    assert_eq!(
        names(&filter_records(&records, &by_category, &AvailabilityMap::new())),
        vec!["Jaipur"]
    );

    let by_raw = FilterCriteria {
        style: Some("cloudy".into()),
        ..FilterCriteria::default()
    };
    assert_eq!(
        names(&filter_records(&records, &by_raw, &AvailabilityMap::new())),
        vec!["Old Rosie"]
    );

    // Unclassified records still match on their raw text.
    let fruit = FilterCriteria {
        style: Some("fruit".into()),
        ..FilterCriteria::default()
    };
    assert_eq!(
        names(&filter_records(&records, &fruit, &AvailabilityMap::new())),
        vec!["Thing"]
    );
}

#[test]
fn availability_filter_treats_absent_as_unavailable() {
    let records = sample();
    let map: AvailabilityMap = [
        (BeerKey::new("Oakham", "Citra"), seen(true, 0)),
        (BeerKey::new("Westons", "Old Rosie"), seen(false, 10)),
    ]
    .into_iter()
    .collect();

    let available = FilterCriteria {
        availability: AvailabilityFilter::Available,
        ..FilterCriteria::default()
    };
    assert_eq!(names(&filter_records(&records, &available, &map)), vec!["Citra"]);

    let unavailable = FilterCriteria {
        availability: AvailabilityFilter::Unavailable,
        ..FilterCriteria::default()
    };
    assert_eq!(filter_records(&records, &unavailable, &map).len(), 4);
}

#[test]
fn abv_range_is_inclusive() {
    let records: Vec<BeerRecord> = [3.0, 4.0, 5.0, 6.0, 7.0]
        .into_iter()
        .enumerate()
        .map(|(i, abv)| beer("B", &format!("beer{i}"), "Bitter", abv, "Bar"))
        .collect();
    let criteria = FilterCriteria {
        abv_min: 4.0,
        abv_max: 6.0,
        ..FilterCriteria::default()
    };
    let abvs: Vec<f64> = filter_records(&records, &criteria, &AvailabilityMap::new())
        .iter()
        .map(|r| r.abv)
        .collect();
    assert_eq!(abvs, vec![4.0, 5.0, 6.0]);
}

#[test]
fn unparsed_abv_is_excluded_once_minimum_is_raised() {
    let records = sample();
    let criteria = FilterCriteria {
        abv_min: 1.0,
        abv_max: 10.0,
        ..FilterCriteria::default()
    };
    let hits = filter_records(&records, &criteria, &AvailabilityMap::new());
    assert!(hits.iter().all(|r| r.name != "Thing"));
    assert_eq!(hits.len(), 4);
}

#[test]
fn filtering_is_idempotent() {
    let records = sample();
    let criteria = FilterCriteria {
        search_text: "a".into(),
        abv_min: 4.0,
        abv_max: 8.0,
        ..FilterCriteria::default()
    };
    let map = AvailabilityMap::new();
    let once: Vec<BeerRecord> = filter_records(&records, &criteria, &map)
        .into_iter()
        .cloned()
        .collect();
    let twice: Vec<BeerRecord> = filter_records(&once, &criteria, &map)
        .into_iter()
        .cloned()
        .collect();
    assert_eq!(once, twice);
}

#[test]
fn double_toggle_reverses_order_exactly() {
    let records = sample();
    let refs: Vec<&BeerRecord> = records.iter().collect();
    let map = AvailabilityMap::new();

    let mut state = SortState::default();
    state.toggle(SortColumn::Brewery);
    let ascending = sort_records(&refs, SortColumn::Brewery, state.direction, &map);
    state.toggle(SortColumn::Brewery);
    let descending = sort_records(&refs, SortColumn::Brewery, state.direction, &map);

    assert_eq!(
        names(&ascending),
        vec!["Sussex Best", "Thing", "Citra", "Jaipur", "Old Rosie"]
    );
    let mut reversed = names(&descending);
    reversed.reverse();
    assert_eq!(names(&ascending), reversed);
}

#[test]
fn unparsed_abv_sorts_first_ascending() {
    let records = vec![
        beer("A", "Stated", "Bitter", parse_abv("4.2"), "Bar"),
        beer("B", "Missing", "Bitter", parse_abv("N/A"), "Bar"),
    ];
    let refs: Vec<&BeerRecord> = records.iter().collect();
    let sorted = sort_records(&refs, SortColumn::Abv, SortDirection::Ascending, &AvailabilityMap::new());
    assert_eq!(names(&sorted), vec!["Missing", "Stated"]);
}

#[test]
fn last_seen_sorts_unavailable_as_oldest() {
    let records = sample();
    let refs: Vec<&BeerRecord> = records.iter().collect();
    let map: AvailabilityMap = [
        (BeerKey::new("Oakham", "Citra"), seen(true, 100)),
        (BeerKey::new("Thornbridge", "Jaipur"), seen(true, 500)),
        (BeerKey::new("Westons", "Old Rosie"), seen(false, 900)),
    ]
    .into_iter()
    .collect();

    let sorted = sort_records(&refs, SortColumn::LastSeen, SortDirection::Descending, &map);
    assert_eq!(names(&sorted)[..2], ["Jaipur".to_string(), "Citra".to_string()]);
}
