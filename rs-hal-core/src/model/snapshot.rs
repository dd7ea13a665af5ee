use std::collections::BTreeMap;

use log::warn;

use serde::{Deserialize, Serialize};

use super::markov::SuffixPair;
use super::prefix::Prefix;
use super::suffix_map::SuffixMap;
use crate::error::{Error, Result};

/// Durable image of a model's learned state.
///
/// JSON shape:
/// ```text
/// {
///   "order": 2,
///   "keywords": { "a": 1, " ": 2 },
///   "prefixes": [ [ ["a", " "], [{"": 1}, 1], [{"b": 1}, 1] ], ... ]
/// }
/// ```
/// Each prefix entry is `[tokens, left suffixes, right suffixes]`, a suffix
/// map being `[{token: count}, total]`.
///
/// Decoding only checks the shape. Prefix lengths, positive counts and
/// suffix totals are checked when the snapshot is loaded into a model.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
	pub order: usize,
	pub keywords: BTreeMap<String, u64>,
	pub prefixes: Vec<(Prefix, SuffixMap, SuffixMap)>,
}

impl Snapshot {
	/// Encodes as compact JSON.
	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string(self)?)
	}

	/// Encodes as indented JSON, for a human-readable dump of a model.
	pub fn to_json_pretty(&self) -> Result<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}

	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// Encodes with `postcard`, a compact binary format.
	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		Ok(postcard::to_stdvec(self)?)
	}

	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		Ok(postcard::from_bytes(bytes)?)
	}

	/// Splits the snapshot into the keyword and prefix tables of a model.
	///
	/// If a prefix is listed twice, the last entry wins.
	///
	/// # Errors
	/// - `InvalidOrder` if a prefix does not hold `order` tokens
	/// - `ZeroCount` if a keyword or a suffix has a zero count
	/// - `InconsistentTotal` if a suffix map total is not the sum of its counts
	pub(crate) fn into_tables(self) -> Result<(BTreeMap<String, u64>, BTreeMap<Prefix, SuffixPair>)> {
		if let Some((token, _)) = self.keywords.iter().find(|(_, count)| **count == 0) {
			warn!("rejecting snapshot: keyword {token:?} has a zero count");
			return Err(Error::ZeroCount { token: token.clone() });
		}

		let mut prefixes = BTreeMap::new();
		for (prefix, left, right) in self.prefixes {
			if let Err(e) = prefix.check_order(self.order).and(left.check()).and(right.check()) {
				warn!("rejecting snapshot: prefix {prefix}: {e}");
				return Err(e);
			}
			prefixes.insert(prefix, (left, right));
		}
		Ok((self.keywords, prefixes))
	}
}
