//! Runtime orchestration layer for the Geotheater dashboard.
//!
//! Holds the dashboard session state, the insight service and the background
//! task that ties them to the presentation layer.

pub mod insights;
pub mod orchestrator;
pub mod session;

pub use geotheater_core as core;
pub use geotheater_data as data;
