//! Data ingestion layer for the Geotheater dashboard.
//!
//! Fetches the raw visitor log, parses it into records, folds records into
//! summary statistics and supplies the built-in sample used when the real
//! log is unavailable.

pub mod aggregator;
pub mod parser;
pub mod sample;
pub mod source;

pub use geotheater_core as core;
