//! opennow library - which restaurants are open at a given time
//!
//! Schedule segments like `Sat-Tue 11:30 am - 12:30 am` are parsed into
//! weekday/minute intervals and matched against a query time, including
//! ranges that run past Sunday or close after midnight.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod matcher;
pub mod query;
pub mod schedule;
pub mod scheduler;

pub use catalog::{Catalog, CompiledCatalog, QueryError, Restaurant};
pub use query::{InvalidQueryError, Query};
pub use schedule::{Interval, ParseError};
