//! weatherdash - terminal weather dashboard
//!
//! This library exposes the application's modules for testing.

pub mod action;
pub mod api;
pub mod components;
pub mod effect;
pub mod geo;
pub mod prefs;
pub mod reducer;
pub mod state;
pub mod tasks;
pub mod wmo;
