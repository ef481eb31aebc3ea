use scraper::{ElementRef, Html, Node, Selector};
use taplist_core::TabularDocument;

/// Flattens every `<tr>` of the page, in document order, into a row of
/// cell texts. Cells are the row's own `<td>`/`<th>` children, so a table
/// nested inside a cell contributes its own rows rather than extra cells.
pub fn parse_table_document(html: &str) -> TabularDocument {
    let doc = Html::parse_document(html);
    let Ok(row_sel) = Selector::parse("tr") else {
        return TabularDocument::default();
    };

    let rows = doc
        .select(&row_sel)
        .map(|row| row_cells(row).map(cell_text).collect())
        .collect();
    TabularDocument::new(rows)
}

fn row_cells(row: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
}

// Text nodes concatenated as-is, with `<br>` as the only separator, then
// whitespace collapsed.
fn cell_text(cell: ElementRef<'_>) -> String {
    let mut raw = String::new();
    for node in cell.descendants() {
        match node.value() {
            Node::Text(text) => raw.push_str(text),
            Node::Element(el) if el.name() == "br" => raw.push(' '),
            _ => {}
        }
    }
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
