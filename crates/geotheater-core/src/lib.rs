//! Domain types, errors, configuration and formatting shared by the
//! Geotheater dashboard crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{DashboardError, Result};
