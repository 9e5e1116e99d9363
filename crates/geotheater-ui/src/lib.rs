//! Terminal UI layer for the Geotheater visitor dashboard.
//!
//! Provides themes, header, bar and indicator components, the dashboard and
//! recent-visits views, and the application event loop built on top of
//! [`ratatui`].

pub mod app;
pub mod components;
pub mod dashboard_view;
pub mod table_view;
pub mod themes;

pub use geotheater_core as core;
