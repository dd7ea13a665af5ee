//! Error type shared by every module of the crate.

use thiserror::Error;

/// Errors raised while building, feeding, or restoring a model.
#[derive(Error, Debug)]
pub enum Error {
	/// A prefix was built from a token range whose length is not the model order.
	#[error("Invalid order: expected {expected} tokens, got {found}")]
	InvalidOrder { expected: usize, found: usize },

	/// A model order must be at least 1.
	#[error("Model order must be >= 1")]
	ZeroOrder,

	/// A model order above the supported window length.
	#[error("Model order {order} exceeds the maximum of {max}")]
	OrderTooLarge { order: usize, max: usize },

	/// A byte does not start a UTF-8 sequence, or the sequence it starts is broken.
	#[error("Invalid UTF-8 sequence starting with 0x{byte:02X} at position {position}")]
	InvalidEncoding { position: usize, byte: u8 },

	/// A snapshot was taken from a model of another order.
	#[error("Order mismatch: expected {expected}, snapshot has {found}")]
	OrderMismatch { expected: usize, found: usize },

	/// A persisted suffix map total disagrees with the sum of its counts.
	#[error("Inconsistent suffix total: recorded {recorded}, counts sum to {actual}")]
	InconsistentTotal { recorded: u64, actual: u64 },

	/// A persisted suffix map holds a zero count.
	#[error("Suffix {token:?} has a zero count")]
	ZeroCount { token: String },

	#[error("Invalid setting: {0}")]
	InvalidSetting(String),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Binary encoding error: {0}")]
	Binary(#[from] postcard::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
