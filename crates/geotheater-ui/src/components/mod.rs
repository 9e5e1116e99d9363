//! Reusable line-level widgets for the dashboard views.

pub mod header;
pub mod indicators;
pub mod progress_bar;
