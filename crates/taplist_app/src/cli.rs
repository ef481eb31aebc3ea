use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use taplist_core::{AvailabilityFilter, BeerKey, Msg, SortColumn};

use crate::config::DEFAULT_CONFIG_FILE;
use crate::logging::DEFAULT_LOG_FILE;

/// Festival beer list: fetch, filter, sort and tag what is still pouring.
#[derive(Debug, Parser)]
#[command(name = "taplist", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (RON).
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Override the festival page URL from the config file.
    #[arg(long)]
    pub source_url: Option<String>,

    /// Free-text search over brewery, name, style and location.
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Only beers served at this bar.
    #[arg(long, short = 'b')]
    pub bar: Option<String>,

    /// Style category label or raw style text.
    #[arg(long)]
    pub style: Option<String>,

    #[arg(long, value_enum, default_value = "any")]
    pub availability: AvailabilityArg,

    #[arg(long)]
    pub abv_min: Option<f64>,

    #[arg(long)]
    pub abv_max: Option<f64>,

    /// Sort column; repeat the same column to sort descending.
    #[arg(long, value_enum)]
    pub sort: Vec<SortArg>,

    /// Flip the availability tag of a beer, given as "Brewery/Beer name".
    #[arg(long, value_parser = parse_beer_key)]
    pub toggle: Vec<BeerKey>,

    /// Use an in-process availability store instead of the configured one.
    #[arg(long)]
    pub offline_store: bool,

    /// Keep a prompt open for further commands after the first listing.
    #[arg(long, short = 'i')]
    pub interactive: bool,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write logs to this file (bare flag: ./taplist.log); the terminal then
    /// only gets them with --verbose.
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_LOG_FILE)]
    pub log_file: Option<PathBuf>,

    /// Log debug detail to the terminal.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AvailabilityArg {
    Any,
    Available,
    Unavailable,
}

impl From<AvailabilityArg> for AvailabilityFilter {
    fn from(arg: AvailabilityArg) -> Self {
        match arg {
            AvailabilityArg::Any => AvailabilityFilter::Any,
            AvailabilityArg::Available => AvailabilityFilter::Available,
            AvailabilityArg::Unavailable => AvailabilityFilter::Unavailable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Brewery,
    Name,
    Style,
    Abv,
    Location,
    Bar,
    LastSeen,
}

impl From<SortArg> for SortColumn {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Brewery => SortColumn::Brewery,
            SortArg::Name => SortColumn::Name,
            SortArg::Style => SortColumn::Style,
            SortArg::Abv => SortColumn::Abv,
            SortArg::Location => SortColumn::Location,
            SortArg::Bar => SortColumn::Bar,
            SortArg::LastSeen => SortColumn::LastSeen,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn parse_beer_key(input: &str) -> Result<BeerKey, String> {
    BeerKey::parse_user_form(input)
        .ok_or_else(|| format!("expected \"Brewery/Beer name\", got {input:?}"))
}

impl Cli {
    /// Filter and sort messages to apply once the list has loaded. ABV
    /// bounds left unset keep the data-derived defaults.
    pub fn view_messages(&self, data_bounds: Option<(f64, f64)>) -> Vec<Msg> {
        let mut msgs = Vec::new();
        if let Some(text) = &self.search {
            msgs.push(Msg::SearchChanged(text.clone()));
        }
        if let Some(bar) = &self.bar {
            msgs.push(Msg::BarSelected(Some(bar.clone())));
        }
        if let Some(style) = &self.style {
            msgs.push(Msg::StyleSelected(Some(style.clone())));
        }
        if self.availability != AvailabilityArg::Any {
            msgs.push(Msg::AvailabilityFilterChanged(self.availability.into()));
        }
        if self.abv_min.is_some() || self.abv_max.is_some() {
            let (lo, hi) = data_bounds.unwrap_or((0.0, f64::MAX));
            msgs.push(Msg::AbvRangeChanged {
                min: self.abv_min.unwrap_or(lo),
                max: self.abv_max.unwrap_or(hi),
            });
        }
        msgs.extend(self.sort.iter().map(|&col| Msg::SortClicked(col.into())));
        msgs
    }
}
