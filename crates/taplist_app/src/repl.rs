use std::io::{self, BufRead, Write};
use std::time::Duration;

use taplist_core::{AvailabilityFilter, Msg, SortColumn};

use crate::cli::{parse_beer_key, OutputFormat};
use crate::render::render;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Apply(Msg),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  search <text>          free-text search (empty clears)
  bar <name>|-           filter by bar
  style <text>|-         filter by style category or raw style
  avail any|yes|no       availability filter
  abv <min> <max>        ABV range, inclusive
  sort <column>          brewery|name|style|abv|location|bar|seen; repeat to reverse
  toggle Brewery/Beer    flip a beer's availability tag
  reset                  clear all filters
  retry                  retry a failed load
  dismiss                clear notices
  show | help | quit";

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    let msg = match word {
        "" | "show" | "ls" => return Ok(Command::Show),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        "search" => Msg::SearchChanged(rest.to_string()),
        "bar" => Msg::BarSelected(optional(rest)),
        "style" => Msg::StyleSelected(optional(rest)),
        "avail" => Msg::AvailabilityFilterChanged(parse_filter(rest)?),
        "abv" => {
            let (min, max) = parse_range(rest)?;
            Msg::AbvRangeChanged { min, max }
        }
        "sort" => Msg::SortClicked(parse_column(rest)?),
        "toggle" => Msg::ToggleAvailabilityClicked(parse_beer_key(rest)?),
        "reset" => Msg::FiltersReset,
        "retry" => Msg::RetryClicked,
        "dismiss" => Msg::NoticesDismissed,
        other => return Err(format!("unknown command `{other}`; try `help`")),
    };
    Ok(Command::Apply(msg))
}

fn optional(text: &str) -> Option<String> {
    (!text.is_empty() && text != "-").then(|| text.to_string())
}

fn parse_filter(text: &str) -> Result<AvailabilityFilter, String> {
    match text {
        "any" | "" => Ok(AvailabilityFilter::Any),
        "yes" | "available" => Ok(AvailabilityFilter::Available),
        "no" | "unavailable" => Ok(AvailabilityFilter::Unavailable),
        other => Err(format!("expected any, yes or no; got `{other}`")),
    }
}

fn parse_range(text: &str) -> Result<(f64, f64), String> {
    let mut parts = text.split_whitespace().map(str::parse::<f64>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(min)), Some(Ok(max)), None) => Ok((min, max)),
        _ => Err("expected two numbers, e.g. `abv 4 6.5`".to_string()),
    }
}

fn parse_column(text: &str) -> Result<SortColumn, String> {
    Ok(match text.to_ascii_lowercase().as_str() {
        "brewery" => SortColumn::Brewery,
        "name" | "beer" => SortColumn::Name,
        "style" => SortColumn::Style,
        "abv" => SortColumn::Abv,
        "location" => SortColumn::Location,
        "bar" => SortColumn::Bar,
        "seen" | "last-seen" | "lastseen" => SortColumn::LastSeen,
        other => return Err(format!("unknown column `{other}`")),
    })
}

/// Reads commands from stdin until `quit` or end of input.
pub fn run(session: &mut Session, format: OutputFormat, settle_timeout: Duration) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        match parse_command(&line?) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => writeln!(stdout, "{HELP}")?,
            Ok(Command::Show) => print_view(session, format, &mut stdout)?,
            Ok(Command::Apply(msg)) => {
                session.dispatch(msg);
                session.settle(settle_timeout);
                print_view(session, format, &mut stdout)?;
            }
            Err(message) => writeln!(stdout, "{message}")?,
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }
    Ok(())
}

fn print_view(session: &Session, format: OutputFormat, out: &mut impl Write) -> io::Result<()> {
    let text = render(&session.view(), format).map_err(io::Error::other)?;
    writeln!(out, "{text}")
}
