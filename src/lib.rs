//! Terminal place detail viewer.
//!
//! Resolves the viewer's coordinate through a tiered fallback chain, fetches
//! one place's details from a remote service with a fallback to a bundled
//! dataset, normalizes the place's reviews into a uniform display shape, and
//! renders the result as a TUI detail screen.

pub mod api;
pub mod app;
pub mod config;
pub mod distance;
pub mod events;
pub mod fallback;
pub mod fetcher;
pub mod location;
pub mod logging;
pub mod models;
pub mod ui;
