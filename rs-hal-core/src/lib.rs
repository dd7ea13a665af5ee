//! Bidirectional Markov-chain text generator.
//!
//! This crate learns token transitions from lines of text and answers a new
//! line with a continuation built from previously seen fragments:
//! - Whitespace-run tokenization on top of UTF-8 safe segmentation
//! - Fixed-order token windows with left and right transition tables
//! - Replies anchored on the rarest known keyword of the input
//! - Snapshots of the learned state, as JSON or compact binary
//!
//! ```
//! use rs_hal_core::Model;
//!
//! let mut model = Model::with_seed(2, 42).unwrap();
//! assert_eq!(model.add("the cat sat"), "nothing learned yet");
//! assert_eq!(model.add("cat"), "the cat sat");
//! ```

/// Error type shared by all modules.
pub mod error;

/// Markov model, its building blocks and its snapshots.
pub mod model;

/// Code point segmentation and tokenization.
pub mod text;

pub use error::{Error, Result};
pub use model::markov::{MAX_ORDER, Model};
pub use model::prefix::Prefix;
pub use model::settings::ResponseSettings;
pub use model::snapshot::Snapshot;
pub use model::suffix_map::{BOUNDARY, SuffixMap};
pub use text::codepoints::Codepoints;
pub use text::tokenizer::{tokenize, tokenize_bytes};
