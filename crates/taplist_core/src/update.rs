use crate::{
    extract_records, AppState, AvailabilityError, AvailabilityMap, Effect, LoadError, LoadStatus,
    Msg, StoreStatus,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            if state.status != LoadStatus::Idle {
                return (state, Vec::new());
            }
            state.status = LoadStatus::Loading;
            state.mark_dirty();
            vec![Effect::FetchDocument, Effect::LoadAvailability]
        }
        Msg::DocumentFetched(doc) => {
            match extract_records(&doc) {
                Ok(records) => state.set_records(records),
                Err(err) => {
                    state.status = LoadStatus::Failed(LoadError::from(err));
                    state.mark_dirty();
                }
            }
            Vec::new()
        }
        Msg::LoadFailed(err) => {
            state.status = LoadStatus::Failed(err);
            state.mark_dirty();
            Vec::new()
        }
        Msg::RetryClicked => {
            if !matches!(state.status, LoadStatus::Failed(_)) {
                return (state, Vec::new());
            }
            state.status = LoadStatus::Loading;
            state.mark_dirty();
            vec![Effect::FetchDocument]
        }
        Msg::AvailabilityLoaded(map) => {
            state.availability = map;
            state.store = StoreStatus::Ready;
            state.mark_dirty();
            Vec::new()
        }
        Msg::StoreUnavailable(reason) => {
            mark_store_unavailable(&mut state, reason);
            Vec::new()
        }
        Msg::SearchChanged(text) => {
            state.criteria.search_text = text;
            state.mark_dirty();
            Vec::new()
        }
        Msg::BarSelected(bar) => {
            state.criteria.bar = bar;
            state.mark_dirty();
            Vec::new()
        }
        Msg::StyleSelected(style) => {
            state.criteria.style = style;
            state.mark_dirty();
            Vec::new()
        }
        Msg::AvailabilityFilterChanged(filter) => {
            state.criteria.availability = filter;
            state.mark_dirty();
            Vec::new()
        }
        Msg::AbvRangeChanged { min, max } => {
            let (min, max) = if min <= max { (min, max) } else { (max, min) };
            state.criteria.abv_min = min;
            state.criteria.abv_max = max;
            state.mark_dirty();
            Vec::new()
        }
        Msg::FiltersReset => {
            state.reset_criteria();
            Vec::new()
        }
        Msg::SortClicked(column) => {
            state.sort.toggle(column);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ToggleAvailabilityClicked(key) => {
            if let StoreStatus::Unavailable(reason) = &state.store {
                let notice = AvailabilityError::Unavailable(reason.clone()).to_string();
                state.push_notice(notice);
                return (state, Vec::new());
            }
            if !state.knows_record(&key) {
                state.push_notice(format!("No beer named {key} in the list"));
                return (state, Vec::new());
            }
            // One read-flip-write per key at a time.
            if !state.pending_toggles.insert(key.clone()) {
                return (state, Vec::new());
            }
            state.mark_dirty();
            vec![Effect::ToggleAvailability { key }]
        }
        Msg::ToggleCompleted { key, result } => {
            state.pending_toggles.remove(&key);
            state.mark_dirty();
            match result {
                // The cache only changes through the reload that follows.
                Ok(_) => vec![Effect::LoadAvailability],
                // A failed write leaves the cache and store status alone;
                // only a failed bulk load makes availability inert.
                Err(err) => {
                    state.push_notice(format!("{key}: {err}"));
                    Vec::new()
                }
            }
        }
        Msg::NoticesDismissed => {
            if !state.notices.is_empty() {
                state.notices.clear();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

// Inert availability: every record reads as unavailable.
fn mark_store_unavailable(state: &mut AppState, reason: String) {
    state.store = StoreStatus::Unavailable(reason);
    state.availability = AvailabilityMap::new();
    state.mark_dirty();
}
