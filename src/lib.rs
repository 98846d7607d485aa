//! FinTrack - personal and shared finance tracking
//!
//! This library provides the core of the FinTrack finance tracker: accounts
//! whose balances are kept consistent with their transactions, budgets
//! evaluated against spending, and dashboard summaries.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (accounts, transactions, budgets, categories)
//! - `ledger`: Balance effects of transactions and the consistency check
//! - `storage`: JSON file storage layer and the `RecordStore` trait
//! - `services`: Business logic layer
//! - `reports`: Summary and budget overview projections
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `fintrack` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use fintrack::config::{FinTrackPaths, Settings};
//! use fintrack::storage::Storage;
//!
//! let paths = FinTrackPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{FinTrackError, FinTrackResult};
