//! Configuration module for bankrec
//!
//! - Path resolution for the settings file and the audit log
//! - User settings persistence, including auto-match search limits

pub mod paths;
pub mod settings;

pub use paths::BankrecPaths;
pub use settings::{MatchingSettings, Settings};
