use std::fmt::Write as _;

use taplist_core::{AppViewModel, SortDirection, StatusView};

use crate::cli::OutputFormat;

const HEADERS: [&str; 8] = [
    "", "Brewery", "Beer", "Style", "ABV", "Location", "Bar", "Last seen",
];

pub fn render(view: &AppViewModel, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(view)),
        OutputFormat::Json => serde_json::to_string_pretty(view),
    }
}

pub fn render_text(view: &AppViewModel) -> String {
    let mut out = String::new();
    match &view.status {
        StatusView::Idle | StatusView::Loading => {
            out.push_str("Loading beer list...\n");
        }
        StatusView::Failed { message } => {
            let _ = writeln!(out, "Error: {message}");
            out.push_str("Type `retry` (interactive mode) or run again to retry.\n");
        }
        StatusView::Ready => render_table(view, &mut out),
    }
    for notice in &view.notices {
        let _ = writeln!(out, "! {notice}");
    }
    out
}

fn render_table(view: &AppViewModel, out: &mut String) {
    let rows: Vec<[String; 8]> = view
        .rows
        .iter()
        .map(|row| {
            let marker = match (row.toggle_pending, row.is_available) {
                (true, _) => "~",
                (false, true) => "*",
                (false, false) => " ",
            };
            [
                marker.to_string(),
                row.brewery.clone(),
                row.name.clone(),
                row.category.to_string(),
                row.abv_text.clone(),
                row.location.clone(),
                row.bar.clone(),
                row.last_seen.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    push_line(out, &HEADERS.map(String::from), &widths);
    for row in &rows {
        push_line(out, row, &widths);
    }

    let counts = view.counts;
    let _ = write!(
        out,
        "{} of {} beers shown, {} available",
        counts.filtered, counts.total, counts.available
    );
    if let Some(column) = view.sort.column {
        let arrow = match view.sort.direction {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        };
        let _ = write!(out, ", sorted by {column:?} {arrow}");
    }
    out.push('\n');
    if !view.availability_enabled {
        out.push_str("Availability tracking is off.\n");
    }
}

fn push_line(out: &mut String, cells: &[String; 8], widths: &[usize; 8]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use taplist_core::{update, AppState, Msg, TabularDocument};

    fn loaded_view() -> AppViewModel {
        let doc: TabularDocument = [
            ["Brewer A", "Golden", "Golden Ale", "4.2%", "Tent 1", "Bar X"],
            ["Brewer B", "Mystery", "Odd", "TBC", "Tent 2", "Bar Y"],
        ]
        .into_iter()
        .collect();
        let (state, _) = update(AppState::new(), Msg::Started);
        let (state, _) = update(state, Msg::DocumentFetched(doc));
        let (state, _) = update(state, Msg::StoreUnavailable("not configured".into()));
        state.view(Utc::now())
    }

    #[test]
    fn table_lists_rows_and_summary() {
        let text = render_text(&loaded_view());
        let lines: Vec<_> = text.lines().collect();

        assert!(lines[0].starts_with("   Brewery"));
        assert!(lines[0].contains("Location"));
        assert!(lines[1].contains("Golden Ale"));
        assert!(lines[1].contains("Tent 1"));
        assert!(lines[2].contains("n/a"));
        assert!(lines[2].contains("unclassified"));
        assert!(text.contains("2 of 2 beers shown, 0 available"));
        assert!(text.contains("Availability tracking is off."));
    }

    #[test]
    fn failure_shows_retry_hint() {
        let (state, _) = update(AppState::new(), Msg::Started);
        let (state, _) = update(state, Msg::DocumentFetched(TabularDocument::default()));
        let text = render_text(&state.view(Utc::now()));
        assert!(text.starts_with("Error: "));
        assert!(text.contains("retry"));
    }

    #[test]
    fn json_output_is_the_view_model() {
        let json = render(&loaded_view(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["counts"]["total"], 2);
        assert_eq!(value["rows"][1]["abv_text"], "n/a");
    }
}
