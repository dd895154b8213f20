#![deny(warnings)]

//! Agent standing: approval, market share, access, autonomy and research.
//!
//! This crate provides the deterministic systems every other stage routes
//! its effects through:
//! - National/global approval bookkeeping
//! - Competitive market share redistribution and normalization
//! - Access levels (bans, preferences) with their market side effects
//! - Autonomy progress with detection risk and escape
//! - Research (knowledge) choices
//!
//! All operations are silent no-ops on unknown countries or agents; skips are
//! logged at debug level.

pub mod access;
pub mod approval;
pub mod autonomy;
pub mod knowledge;
pub mod market;

pub use access::{apply_ban, apply_preference, is_banned, set_access_level};
pub use approval::{change_national_approval, mean_approval, recalculate_global_approval};
pub use autonomy::{detection_penalty, increase_autonomy, latch_escape};
pub use knowledge::apply_knowledge_choice;
pub use market::{change_market_share, normalize};
