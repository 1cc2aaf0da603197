/// Opening-hours segment parsing
///
/// A segment looks like `Sat-Tue 11:30 am - 12:30 am`: a single day or a
/// day range, a space, then an opening and closing time on the 12-hour clock.
/// Parsing produces an [`Interval`] of weekday indices (Monday = 0) and
/// minutes since midnight.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of days in the week; also the offset applied to an end day that
/// falls past Sunday.
pub const DAYS_PER_WEEK: u8 = 7;

/// Minutes in a day; one past the largest minute-of-day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Day abbreviations as they appear in catalog data, Monday first.
pub const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Full day names, Monday first. Display only.
pub const DAY_NAMES_LONG: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// A schedule segment that does not follow `<Day>[-<Day>] <time> - <time>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid schedule segment '{segment}': {reason}")]
pub struct ParseError {
    pub segment: String,
    pub reason: String,
}

impl ParseError {
    pub fn new(segment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            reason: reason.into(),
        }
    }
}

/// Look up the weekday index of a three-letter day name.
/// Case-sensitive: only the catalog's `Mon`..`Sun` spelling is accepted.
pub fn day_index(name: &str) -> Option<u8> {
    DAY_NAMES
        .iter()
        .position(|day| *day == name)
        .map(|i| i as u8)
}

/// Parse a 12-hour clock time (`9:30 pm`, `12 am`, `7:05PM`) into minutes
/// since midnight. Surrounding whitespace is ignored.
pub fn parse_time(input: &str) -> Result<u16, ParseError> {
    let text = input.trim();
    parse_clock(text).map_err(|reason| ParseError::new(text, reason))
}

fn parse_clock(text: &str) -> Result<u16, String> {
    let lower = text.to_ascii_lowercase();
    let (clock, pm) = if let Some(rest) = lower.strip_suffix("am") {
        (rest, false)
    } else if let Some(rest) = lower.strip_suffix("pm") {
        (rest, true)
    } else {
        return Err(format!("time '{}' is missing am/pm", text));
    };

    let clock = clock.trim_end();
    let (hour, minute) = match clock.split_once(':') {
        Some((hour, minute)) => (hour, minute),
        None => (clock, "0"),
    };

    let hour = small_number(hour).ok_or_else(|| format!("bad hour in '{}'", text))?;
    let minute = small_number(minute).ok_or_else(|| format!("bad minute in '{}'", text))?;

    if !(1..=12).contains(&hour) {
        return Err(format!("hour {} out of range 1-12 in '{}'", hour, text));
    }
    if minute > 59 {
        return Err(format!("minute {} out of range 0-59 in '{}'", minute, text));
    }

    // 12 am is hour 0, 12 pm is hour 12
    let hour24 = hour % 12 + if pm { 12 } else { 0 };
    Ok(hour24 * 60 + minute)
}

/// One or two ASCII digits.
fn small_number(s: &str) -> Option<u16> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Format minutes since midnight back into the catalog's 12-hour style.
pub fn format_time(minute_of_day: u16) -> String {
    let hour = (minute_of_day / 60) % 24;
    let minute = minute_of_day % 60;
    let meridiem = if hour < 12 { "am" } else { "pm" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", hour12, minute, meridiem)
}

/// Normalized day/time interval for one schedule segment.
///
/// `end_day` is `start_day + 7`-adjusted when a day range runs past Sunday,
/// so `end_day >= start_day` always holds. When `start_minute > end_minute`
/// the interval closes after midnight; the times are left as parsed and the
/// matcher splits the interval in two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start_day: u8,
    pub end_day: u8,
    pub start_minute: u16,
    pub end_minute: u16,
}

impl Interval {
    pub fn parse(segment: &str) -> Result<Self, ParseError> {
        let trimmed = segment.trim();
        let fail = |reason: String| ParseError::new(trimmed, reason);

        let (day_spec, time_spec) = trimmed
            .split_once(' ')
            .ok_or_else(|| fail("expected '<days> <open> - <close>'".to_string()))?;

        let lookup = |name: &str| {
            day_index(name).ok_or_else(|| fail(format!("unknown day '{}'", name)))
        };

        let days: Vec<&str> = day_spec.split('-').collect();
        let (start_day, end_day) = match days.as_slice() {
            [day] => {
                let day = lookup(*day)?;
                (day, day)
            }
            [start, end] => {
                let start = lookup(*start)?;
                let mut end = lookup(*end)?;
                if start > end {
                    // Range runs past Sunday, e.g. Sat-Tue
                    end += DAYS_PER_WEEK;
                }
                (start, end)
            }
            _ => return Err(fail(format!("bad day range '{}'", day_spec))),
        };

        let times: Vec<&str> = time_spec.split('-').collect();
        let (open, close) = match times.as_slice() {
            [open, close] => (*open, *close),
            _ => return Err(fail(format!("bad time range '{}'", time_spec.trim()))),
        };

        let start_minute = parse_clock(open.trim()).map_err(&fail)?;
        let end_minute = parse_clock(close.trim()).map_err(&fail)?;

        Ok(Self {
            start_day,
            end_day,
            start_minute,
            end_minute,
        })
    }

    /// True when the closing time is earlier in the day than the opening time.
    pub fn wraps_midnight(&self) -> bool {
        self.start_minute > self.end_minute
    }
}

impl FromStr for Interval {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = DAY_NAMES[(self.start_day % DAYS_PER_WEEK) as usize];
        let end = DAY_NAMES[(self.end_day % DAYS_PER_WEEK) as usize];
        if self.start_day == self.end_day {
            write!(f, "{}", start)?;
        } else {
            write!(f, "{}-{}", start, end)?;
        }
        write!(
            f,
            " {} - {}",
            format_time(self.start_minute),
            format_time(self.end_minute)
        )
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every valid 12-hour time lands inside the day
        #[test]
        fn parsed_time_in_range(hour in 1u16..=12, minute in 0u16..60, pm in any::<bool>()) {
            let text = format!("{}:{:02} {}", hour, minute, if pm { "pm" } else { "am" });
            let parsed = parse_time(&text).unwrap();
            prop_assert!(parsed < MINUTES_PER_DAY);
            prop_assert_eq!(parsed % 60, minute);
            prop_assert_eq!(parsed >= 720, pm);
        }

        /// format_time output parses back to the same minute
        #[test]
        fn format_time_parses_back(minute in 0u16..MINUTES_PER_DAY) {
            prop_assert_eq!(parse_time(&format_time(minute)).unwrap(), minute);
        }

        /// The week-wrap adjustment keeps end_day >= start_day
        #[test]
        fn end_day_never_before_start(start in 0usize..7, end in 0usize..7) {
            let segment = format!("{}-{} 9:00 am - 5:00 pm", DAY_NAMES[start], DAY_NAMES[end]);
            let interval = Interval::parse(&segment).unwrap();
            prop_assert!(interval.end_day >= interval.start_day);
            prop_assert!(interval.end_day < 2 * DAYS_PER_WEEK);
            prop_assert_eq!((interval.end_day % DAYS_PER_WEEK) as usize, end);
        }

        /// Parsing arbitrary text returns Ok or Err, never panics
        #[test]
        fn parse_never_panics(segment in ".*") {
            let _ = Interval::parse(&segment);
        }
    }
}
