//! Core data models for bankrec-match
//!
//! Leaf value types shared by the selection engine, the auto-matcher and
//! the catalog loaders.

pub mod ids;
pub mod match_item;
pub mod money;

pub use ids::{ItemId, SessionId};
pub use match_item::MatchItem;
pub use money::Money;
