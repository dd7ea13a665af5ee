//! Top-level module for the bidirectional Markov model.
//!
//! This module provides:
//! - Fixed-length token windows used as keys (`Prefix`)
//! - Weighted suffix tables with sampling (`SuffixMap`)
//! - The learning and reply-generating model (`Model`)
//! - The persisted image of a model (`Snapshot`)
//! - Reply generation parameters (`ResponseSettings`)

/// Learning from lines and growing replies in both directions.
///
/// Also handles restoring from snapshots and merging models.
pub mod markov;

/// Fixed-length, ordered token window (`order` tokens).
pub mod prefix;

/// Durable model state, encodable as JSON or postcard bytes.
pub mod snapshot;

/// Length cap and placeholder used when replying.
pub mod settings;

/// Token frequency table of one side of a prefix.
///
/// Tracks occurrences and supports weighted random sampling.
pub mod suffix_map;
