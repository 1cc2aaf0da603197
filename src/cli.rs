//! Command-line argument parsing and report rendering for opennow

use anyhow::{bail, Context, Result};
use chrono::{NaiveTime, Timelike};

use crate::query::Query;
use crate::schedule::{self, DAY_NAMES, DAY_NAMES_LONG};

/// Parse command line arguments
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Args {
    pub catalog: Option<String>,
    pub day: Option<String>,
    pub time: Option<String>,
    pub at: Option<String>,
    pub validate: bool,
    pub watch: bool,
    pub help: bool,
}

pub fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    parse_args_from(&args)
}

/// Parse an argv-style slice; `args[0]` is the program name.
pub fn parse_args_from(args: &[String]) -> Args {
    let mut result = Args::default();

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match args[i].as_str() {
            "--catalog" if value.is_some() => {
                result.catalog = value;
                i += 1;
            }
            "--day" if value.is_some() => {
                result.day = value;
                i += 1;
            }
            "--time" if value.is_some() => {
                result.time = value;
                i += 1;
            }
            "--at" if value.is_some() => {
                result.at = value;
                i += 1;
            }
            "--validate" => result.validate = true,
            "--watch" => result.watch = true,
            "--help" | "-h" => result.help = true,
            _ => {}
        }
        i += 1;
    }

    result
}

pub fn print_help() {
    println!("opennow - Which restaurants are open?\n");
    println!("USAGE:");
    println!("    opennow [OPTIONS]\n");
    println!("OPTIONS:");
    println!("    --catalog PATH      Catalog JSON file (overrides CATALOG_PATH)");
    println!("    --day DAY           Weekday: 0-6 (Monday = 0) or Mon..Sun (default: today)");
    println!("    --time TIME         Time of day: \"11:30 pm\" or \"23:30\" (default: now)");
    println!("    --at TIMESTAMP      Full timestamp: \"2021-05-12 00:15\"");
    println!("    --watch             Keep running and report whenever the open set changes");
    println!("    --validate          Validate configuration and catalog, then exit");
    println!("    --help, -h          Show this help message\n");
    println!("ENVIRONMENT:");
    println!("    CATALOG_PATH          Catalog JSON file (default: ./restaurant_data.json)");
    println!("    WATCH_INTERVAL_SECS   Seconds between --watch checks (default: 60)");
    println!("    RUST_LOG              Log filter (default: opennow=info)");
}

/// Weekday index from `0`-`6`, `Mon`..`Sun`, or `Monday`..`Sunday`.
/// Out-of-range numbers pass through so the query reports them.
pub fn parse_day(input: &str) -> Result<u32> {
    let text = input.trim();
    if let Ok(index) = text.parse::<u32>() {
        return Ok(index);
    }
    if let Some(index) = schedule::day_index(text) {
        return Ok(index as u32);
    }
    if let Some(index) = DAY_NAMES_LONG.iter().position(|d| *d == text) {
        return Ok(index as u32);
    }
    bail!(
        "Unknown day '{}'. Use 0-6 or one of {}",
        text,
        DAY_NAMES.join(", ")
    )
}

/// Hour and minute from a 12-hour (`11:30 pm`) or 24-hour (`23:30`) time
pub fn parse_clock_time(input: &str) -> Result<(u32, u32)> {
    if let Ok(minute_of_day) = schedule::parse_time(input) {
        return Ok((minute_of_day as u32 / 60, minute_of_day as u32 % 60));
    }
    let time = NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .with_context(|| format!("Unknown time '{}'. Use \"11:30 pm\" or \"23:30\"", input.trim()))?;
    Ok((time.hour(), time.minute()))
}

/// Build the query from `--at`, or from `--day`/`--time` with any missing
/// part taken from `now`.
pub fn build_query(args: &Args, now: Query) -> Result<Query> {
    if let Some(at) = &args.at {
        if args.day.is_some() || args.time.is_some() {
            bail!("--at cannot be combined with --day or --time");
        }
        return Ok(Query::parse(at)?);
    }

    let weekday = match &args.day {
        Some(day) => parse_day(day)?,
        None => now.weekday() as u32,
    };
    let (hour, minute) = match &args.time {
        Some(time) => parse_clock_time(time)?,
        None => (now.hour() as u32, now.minute() as u32),
    };

    Ok(Query::at(weekday, hour, minute)?)
}

/// Human-readable answer for one query
pub fn render_report(query: &Query, open: &[String]) -> String {
    if open.is_empty() {
        return format!("There are no restaurants open at {}", query);
    }
    let mut report = format!("The restaurants open at {} are:", query);
    for name in open {
        report.push_str("\n  - ");
        report.push_str(name);
    }
    report
}
