//! Assessment evaluation: turns a candidate's answered questions into an SFIA level.
//!
//! Pipeline: `classifier` (pass/fail per response) → `aggregator` (per-level
//! percentages) → `resolver` (bottom-up consecutive walk) → `coordinator`
//! (catalog lookup, multi-skill summary).

pub mod aggregator;
pub mod classifier;
pub mod coordinator;
pub mod handlers;
pub mod models;
pub mod resolver;
