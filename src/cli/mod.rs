//! CLI command handlers
//!
//! This module bridges the clap argument parsing with the matching session.

pub mod auto;
pub mod log;
pub mod session;

pub use auto::handle_auto_command;
pub use log::handle_log_command;
pub use session::{handle_session_command, run_session, SessionCommand};

use std::path::PathBuf;

use clap::Args;

use crate::audit::AuditLogger;
use crate::catalog::{CsvCatalog, JsonCatalog, SampleCatalog, TransactionCatalog};
use crate::config::{BankrecPaths, Settings};
use crate::error::{MatchError, MatchResult};
use crate::models::{MatchItem, Money};
use crate::services::{MatchConfig, Session};

/// Arguments shared by the commands that open a matching session
#[derive(Args, Debug, Clone)]
pub struct MatchArgs {
    /// Statement line amount to match (e.g., "699.99")
    #[arg(short, long, allow_hyphen_values = true)]
    pub target: String,

    /// Catalog file of candidate transactions (JSON unless --csv is given)
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// Read the catalog as CSV
    #[arg(long)]
    pub csv: bool,

    /// Also search combinations of several items
    #[arg(short, long)]
    pub multi: bool,

    /// Largest number of items combined
    #[arg(long)]
    pub max_combo: Option<usize>,

    /// Maximum number of partial combinations explored
    #[arg(long)]
    pub budget: Option<u64>,

    /// Wall-clock limit for the search in milliseconds
    #[arg(long)]
    pub time_budget_ms: Option<u64>,
}

impl MatchArgs {
    /// Search limits from settings, overridden by flags
    pub fn match_config(&self, settings: &Settings) -> MatchResult<MatchConfig> {
        if self.max_combo == Some(0) {
            return Err(MatchError::Config("--max-combo must be at least 1".into()));
        }

        let mut config = settings.matching.to_match_config();
        if self.multi {
            config.multi_item_auto_match = true;
        }
        if let Some(max_combo) = self.max_combo {
            config.max_combo_size = max_combo;
        }
        if let Some(budget) = self.budget {
            config.search_budget = budget;
        }
        if let Some(ms) = self.time_budget_ms {
            config.time_budget = Some(std::time::Duration::from_millis(ms));
        }
        Ok(config)
    }

    pub fn target_amount(&self, settings: &Settings) -> MatchResult<Money> {
        Money::parse_with_scale(&self.target, settings.minor_unit_scale)
    }

    /// Load candidates from the given catalog, or the built-in sample list
    pub fn load_candidates(&self, settings: &Settings) -> MatchResult<Vec<MatchItem>> {
        let scale = settings.minor_unit_scale;
        match &self.catalog {
            Some(path) if self.csv => CsvCatalog::new(path).with_scale(scale).load_validated(),
            Some(path) => JsonCatalog::new(path).with_scale(scale).load_validated(),
            None => SampleCatalog::new().with_scale(scale).load_validated(),
        }
    }
}

/// Open a session for the given arguments
pub fn open_session(
    args: &MatchArgs,
    settings: &Settings,
    paths: &BankrecPaths,
    background: bool,
) -> MatchResult<Session> {
    let target = args.target_amount(settings)?;
    let candidates = args.load_candidates(settings)?;

    let mut builder = Session::builder(target, candidates)
        .config(args.match_config(settings)?)
        .background(background);

    if settings.audit_enabled {
        paths.ensure_directories()?;
        builder = builder.audit(AuditLogger::new(paths.audit_log()));
    }

    builder.start()
}
