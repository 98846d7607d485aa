//! Configuration module for FinTrack
//!
//! This module provides configuration management including:
//! - Platform path resolution with an environment override
//! - User settings persistence (acting user, currency, date format)

pub mod paths;
pub mod settings;

pub use paths::FinTrackPaths;
pub use settings::Settings;
