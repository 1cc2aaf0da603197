/// Points in the week to check the catalog against
///
/// A query is a weekday index (Monday = 0) and a minute of the day. It can
/// be built from raw numbers, from any chrono date-time, or from a
/// timestamp string. All times are taken to be in the catalog's zone.

use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use std::fmt;
use thiserror::Error;

use crate::schedule::{DAYS_PER_WEEK, DAY_NAMES_LONG, MINUTES_PER_DAY};

/// Timestamp layouts accepted by [`Query::parse`]
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// A query time the engine cannot evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidQueryError {
    #[error("Day input needs to be between 0 - 6, you've entered: {0}")]
    Weekday(u32),
    #[error("Hour input needs to be between 0 - 23, you've entered: {0}")]
    Hour(u32),
    #[error("Minute input needs to be between 0 - 59, you've entered: {0}")]
    Minute(u32),
    #[error("Minute of day needs to be below 1440, you've entered: {0}")]
    MinuteOfDay(u32),
    #[error("invalid timestamp '{input}': {explanation}")]
    Timestamp { input: String, explanation: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Query {
    weekday: u8,
    minute_of_day: u16,
}

impl Query {
    pub fn new(weekday: u32, minute_of_day: u32) -> Result<Self, InvalidQueryError> {
        if weekday >= DAYS_PER_WEEK as u32 {
            return Err(InvalidQueryError::Weekday(weekday));
        }
        if minute_of_day >= MINUTES_PER_DAY as u32 {
            return Err(InvalidQueryError::MinuteOfDay(minute_of_day));
        }
        Ok(Self {
            weekday: weekday as u8,
            minute_of_day: minute_of_day as u16,
        })
    }

    /// Weekday index plus a 24-hour clock time
    pub fn at(weekday: u32, hour: u32, minute: u32) -> Result<Self, InvalidQueryError> {
        if hour > 23 {
            return Err(InvalidQueryError::Hour(hour));
        }
        if minute > 59 {
            return Err(InvalidQueryError::Minute(minute));
        }
        Self::new(weekday, hour * 60 + minute)
    }

    pub fn from_datetime<T: Datelike + Timelike>(time: &T) -> Self {
        Self {
            weekday: time.weekday().num_days_from_monday() as u8,
            minute_of_day: (time.hour() * 60 + time.minute()) as u16,
        }
    }

    /// Parse a `YYYY-MM-DD HH:MM` timestamp (`T` separator and seconds allowed).
    pub fn parse(input: &str) -> Result<Self, InvalidQueryError> {
        let text = input.trim();
        let mut explanation = String::new();
        for format in TIMESTAMP_FORMATS {
            match NaiveDateTime::parse_from_str(text, format) {
                Ok(time) => return Ok(Self::from_datetime(&time)),
                Err(e) => explanation = e.to_string(),
            }
        }
        Err(InvalidQueryError::Timestamp {
            input: text.to_string(),
            explanation,
        })
    }

    /// Current local time
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn weekday(&self) -> u8 {
        self.weekday
    }

    pub fn minute_of_day(&self) -> u16 {
        self.minute_of_day
    }

    pub fn hour(&self) -> u16 {
        self.minute_of_day / 60
    }

    pub fn minute(&self) -> u16 {
        self.minute_of_day % 60
    }
}

impl fmt::Display for Query {
    /// `0:15 on Wednesdays`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{:02} on {}s",
            self.hour(),
            self.minute(),
            DAY_NAMES_LONG[self.weekday as usize]
        )
    }
}
