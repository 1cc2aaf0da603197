/// Restaurant catalog and open-at queries
///
/// The catalog is loaded once and never mutated. Queries either parse every
/// schedule segment on the fly ([`Catalog::open_at`]) or run against a
/// [`CompiledCatalog`] whose intervals were parsed up front.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::query::{InvalidQueryError, Query};
use crate::schedule::{Interval, ParseError};

/// Why an open-at query failed. No partial result is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Catalog data is broken; fix the data
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The caller asked about a time that does not exist
    #[error(transparent)]
    InvalidQuery(#[from] InvalidQueryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Restaurant {
    pub name: String,
    /// `;`-separated clauses of `opening_hours`, in catalog order
    #[serde(rename = "opening_hours", deserialize_with = "deserialize_segments")]
    pub segments: Vec<String>,
}

impl Restaurant {
    pub fn new(name: impl Into<String>, opening_hours: &str) -> Self {
        Self {
            name: name.into(),
            segments: split_opening_hours(opening_hours),
        }
    }

    /// Open if any segment contains the query. Every segment is parsed, so a
    /// malformed one fails the check even when an earlier one matched.
    pub fn is_open_at(&self, query: &Query) -> Result<bool, ParseError> {
        let mut open = false;
        for segment in &self.segments {
            open |= Interval::parse(segment)?.contains(query);
        }
        Ok(open)
    }

    pub fn intervals(&self) -> Result<Vec<Interval>, ParseError> {
        self.segments.iter().map(|s| Interval::parse(s)).collect()
    }
}

/// Split an `opening_hours` string on `;`, dropping blank clauses.
pub fn split_opening_hours(opening_hours: &str) -> Vec<String> {
    opening_hours
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn deserialize_segments<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(split_opening_hours(&raw))
}

/// On-disk layout: `{ "restaurants": [ { "name", "opening_hours" }, ... ] }`
#[derive(Deserialize)]
struct CatalogFile {
    restaurants: Vec<Restaurant>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    restaurants: Vec<Restaurant>,
}

impl Catalog {
    pub fn new(restaurants: Vec<Restaurant>) -> Self {
        Self { restaurants }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {:?}", path))?;
        let catalog = Self::from_json_str(&json)
            .with_context(|| format!("Failed to load catalog from {:?}", path))?;
        info!("Loaded {} restaurants from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json).context("Catalog JSON is malformed")?;
        Ok(Self::new(file.restaurants))
    }

    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }

    /// Names of the restaurants open at `query`, sorted by byte order.
    ///
    /// Fails on the first malformed segment; the error is logged before it is
    /// returned.
    pub fn open_at(&self, query: &Query) -> Result<Vec<String>, QueryError> {
        let result = self.collect_open(query);
        if let Err(e) = &result {
            error!("{}", e);
        }
        result
    }

    /// Validate a raw weekday index (Monday = 0) and 24-hour time, then query.
    pub fn open_at_parts(&self, weekday: u32, hour: u32, minute: u32) -> Result<Vec<String>, QueryError> {
        let query = Query::at(weekday, hour, minute).map_err(|e| {
            error!("{}", e);
            QueryError::from(e)
        })?;
        self.open_at(&query)
    }

    fn collect_open(&self, query: &Query) -> Result<Vec<String>, QueryError> {
        let mut open = Vec::new();
        for restaurant in &self.restaurants {
            if restaurant.is_open_at(query)? {
                open.push(restaurant.name.clone());
            }
        }
        debug!("{} of {} restaurants open at {}", open.len(), self.len(), query);
        Ok(sorted_unique(open))
    }

    /// Parse every segment once so later queries cannot fail.
    pub fn compile(&self) -> Result<CompiledCatalog, ParseError> {
        let entries = self
            .restaurants
            .iter()
            .map(|r| r.intervals().map(|intervals| (r.name.clone(), intervals)))
            .collect::<Result<Vec<_>, ParseError>>()
            .inspect_err(|e| error!("{}", e))?;

        let segment_count: usize = entries.iter().map(|(_, intervals)| intervals.len()).sum();
        debug!("Compiled {} segments for {} restaurants", segment_count, entries.len());
        Ok(CompiledCatalog { entries })
    }
}

/// A catalog with every schedule segment already parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledCatalog {
    entries: Vec<(String, Vec<Interval>)>,
}

impl CompiledCatalog {
    pub fn open_at(&self, query: &Query) -> Vec<String> {
        let open = self
            .entries
            .iter()
            .filter(|(_, intervals)| intervals.iter().any(|i| i.contains(query)))
            .map(|(name, _)| name.clone())
            .collect();
        sorted_unique(open)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.entries.iter().map(|(_, intervals)| intervals.len()).sum()
    }
}

/// Ordinal (byte-wise) sort, duplicates removed
fn sorted_unique(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names.dedup();
    names
}
