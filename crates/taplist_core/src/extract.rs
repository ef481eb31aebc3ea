use std::sync::OnceLock;

use regex::Regex;

use crate::record::BeerRecord;

/// Label the festival page uses in its header row's first cell.
pub const HEADER_BREWERY_LABEL: &str = "Brewery";

/// Minimum number of cells a row needs to be read as a beer.
pub const MIN_CELLS: usize = 6;

/// A parsed table: rows of already text-only cells, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TabularDocument {
    pub rows: Vec<Vec<String>>,
}

impl TabularDocument {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<R, C> FromIterator<R> for TabularDocument
where
    R: IntoIterator<Item = C>,
    C: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = R>>(iter: T) -> Self {
        Self {
            rows: iter
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    /// The whole document was scanned and no row qualified. Usually means
    /// the source page changed shape.
    #[error("no beer rows found in {rows_scanned} table rows")]
    NoRecords { rows_scanned: usize },
}

/// Reads beer records out of a tabular document, skipping short rows,
/// rows without brewery or name, and header rows.
pub fn extract_records(doc: &TabularDocument) -> Result<Vec<BeerRecord>, ExtractionError> {
    let records: Vec<BeerRecord> = doc.rows.iter().filter_map(|row| record_from_row(row)).collect();
    if records.is_empty() {
        return Err(ExtractionError::NoRecords {
            rows_scanned: doc.rows.len(),
        });
    }
    Ok(records)
}

fn record_from_row(cells: &[String]) -> Option<BeerRecord> {
    if cells.len() < MIN_CELLS {
        return None;
    }
    let cell = |i: usize| cells[i].trim().to_string();
    let brewery = cell(0);
    let name = cell(1);
    if brewery.is_empty() || name.is_empty() || brewery == HEADER_BREWERY_LABEL {
        return None;
    }
    Some(BeerRecord {
        brewery,
        name,
        raw_style: cell(2),
        abv: parse_abv(&cells[3]),
        location: cell(4),
        bar: cell(5),
    })
}

/// First integer or decimal number in the text; 0.0 when there is none.
pub fn parse_abv(text: &str) -> f64 {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("static abv pattern"));

    re.find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}
