//! bankrec-match - exact-sum matching of bank statement lines
//!
//! Given the amount of one bank statement line and a catalog of open
//! transactions, a session lets the user build a selection whose total never
//! exceeds the statement amount, and proposes an exact match automatically.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `models`: Money, identifiers and candidate items
//! - `services`: Selection engine, auto-matcher and the session façade
//! - `catalog`: Candidate sources (JSON, CSV, built-in sample)
//! - `audit`: Session event log
//! - `config`: Configuration and path management
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//! - `error`: Custom error types
//!
//! # Example
//!
//! ```rust,ignore
//! use bankrec_match::catalog::{SampleCatalog, TransactionCatalog};
//! use bankrec_match::models::Money;
//! use bankrec_match::services::{MatchConfig, Session};
//!
//! let mut session = Session::start(Money::parse("249.00")?, SampleCatalog::new().load()?, MatchConfig::default())?;
//! assert!(session.query_remaining().is_zero());
//! ```

pub mod audit;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;

pub use error::{MatchError, MatchResult};
