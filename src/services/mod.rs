//! Service layer for bankrec-match
//!
//! The selection engine, the auto-match search, and the session that wires
//! them together for one statement line.

pub mod auto_match;
pub mod selection;
pub mod session;

pub use auto_match::{AutoMatchOutcome, AutoMatcher, MatchConfig};
pub use selection::{SelectionDiff, SelectionEngine, SelectionState, ToggleResult};
pub use session::{AutoMatchReport, AutoMatchStatus, Session, SessionBuilder};
