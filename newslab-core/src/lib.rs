//! NewsLab Core: domain types and the pure stages of the news/price pipeline.
//!
//! This crate holds everything that does not touch the filesystem:
//! - Domain types (news events, price bars, joined records)
//! - Provider normalization with canonical-URL identity
//! - Dedup, date-window filtering and newest-first ordering
//! - Classifier seam and label validation
//! - Price series store with no-lookahead fallback lookup
//! - News-to-price join
//! - Rolling indicators, feature rows and the hypothesis evaluator

pub mod classify;
pub mod dedup;
pub mod domain;
pub mod features;
pub mod hypothesis;
pub mod indicators;
pub mod join;
pub mod normalize;
pub mod store;
pub mod window;
