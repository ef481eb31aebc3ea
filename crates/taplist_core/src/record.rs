use std::fmt;

use serde::Serialize;

/// Joins the two halves of a [`BeerKey`] when a flat string key is needed.
/// The unit separator never appears in scraped festival data.
pub const KEY_SEPARATOR: char = '\u{1F}';

/// One row of the festival beer list. Never mutated after extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeerRecord {
    pub brewery: String,
    pub name: String,
    pub raw_style: String,
    /// 0.0 when the source cell carried no number.
    pub abv: f64,
    pub location: String,
    pub bar: String,
}

impl BeerRecord {
    pub fn key(&self) -> BeerKey {
        BeerKey::new(self.brewery.clone(), self.name.clone())
    }

    pub fn has_stated_abv(&self) -> bool {
        self.abv > 0.0
    }
}

/// Composite identity used to correlate a record with its availability.
/// Case-sensitive on both parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BeerKey {
    pub brewery: String,
    pub name: String,
}

impl BeerKey {
    pub fn new(brewery: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            brewery: brewery.into(),
            name: name.into(),
        }
    }

    pub fn joined(&self) -> String {
        format!("{}{}{}", self.brewery, KEY_SEPARATOR, self.name)
    }

    /// Parses the `Brewery/Name` form typed by users on the command line.
    /// Splits on the first `/`; both halves are trimmed and must be non-empty.
    pub fn parse_user_form(input: &str) -> Option<Self> {
        let (brewery, name) = input.split_once('/')?;
        let (brewery, name) = (brewery.trim(), name.trim());
        if brewery.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(brewery, name))
    }
}

impl fmt::Display for BeerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.brewery, self.name)
    }
}
