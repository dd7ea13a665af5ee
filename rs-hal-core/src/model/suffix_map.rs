use std::collections::BTreeMap;

use rand::Rng;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Boundary marker: "start of input" in a left map, "end of input" in a right map.
pub const BOUNDARY: &str = "";

/// Persisted form of a suffix map: `[{token: count, ...}, total]`.
///
/// Decoded as is; the invariants are checked when a snapshot is loaded.
#[derive(Serialize, Deserialize, Clone, Debug)]
struct SuffixTable(BTreeMap<String, u64>, u64);

/// Frequency table of the tokens observed next to a prefix (on one side).
///
/// Conceptually, these are the weighted outgoing edges of a Markov chain node.
/// Entries are kept sorted by token, which makes sampling reproducible for a
/// seeded random source.
///
/// ## Responsibilities:
/// - Accumulate suffix occurrences during learning
/// - Sample a suffix proportionally to its occurrence count
/// - Merge with another map (ex. combining two models)
///
/// ## Invariants
/// - `total` is the sum of all counts
/// - Each count is strictly positive and never decreases
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(into = "SuffixTable", from = "SuffixTable")]
pub struct SuffixMap {
	/// Occurrences indexed by the suffix token (possibly `BOUNDARY`).
	/// Example: { "" => 2, "world" => 5 }
	suffixes: BTreeMap<String, u64>,
	/// Sum of all occurrences.
	total: u64,
}

impl SuffixMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of `suffix`.
	pub fn add(&mut self, suffix: &str) {
		*self.suffixes.entry(suffix.to_owned()).or_insert(0) += 1;
		self.total += 1;
	}

	/// Total number of recorded occurrences.
	pub fn size(&self) -> u64 {
		self.total
	}

	/// Occurrences of a single suffix (0 if never seen).
	pub fn count(&self, suffix: &str) -> u64 {
		self.suffixes.get(suffix).copied().unwrap_or(0)
	}

	/// Iterates over `(suffix, count)` in token order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
		self.suffixes.iter().map(|(suffix, count)| (suffix.as_str(), *count))
	}

	/// Samples a suffix with probability proportional to its count.
	///
	/// Draws `r` uniformly in `[1, total]` and walks the entries in token order
	/// until the cumulative count reaches `r`.
	///
	/// Returns `BOUNDARY` if nothing was recorded.
	pub fn get<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
		if self.total == 0 {
			return BOUNDARY;
		}

		let draw = rng.random_range(1..=self.total);
		let mut cumulative = 0;
		for (suffix, count) in &self.suffixes {
			cumulative += count;
			if cumulative >= draw {
				return suffix;
			}
		}

		// `total` is the sum of the counts walked above
		unreachable!("suffix total {} exceeds the sum of its counts", self.total)
	}

	/// Checks the invariants of a map decoded from a snapshot.
	///
	/// # Errors
	/// - `ZeroCount` if a suffix has a zero count
	/// - `InconsistentTotal` if `total` is not the sum of the counts
	pub(crate) fn check(&self) -> Result<()> {
		if let Some((token, _)) = self.suffixes.iter().find(|(_, count)| **count == 0) {
			return Err(Error::ZeroCount { token: token.clone() });
		}
		let actual = self.suffixes.values().fold(0u64, |sum, count| sum.saturating_add(*count));
		if actual != self.total {
			return Err(Error::InconsistentTotal { recorded: self.total, actual });
		}
		Ok(())
	}

	/// Merges another map into this one, summing the counts.
	pub fn merge(&mut self, other: &Self) {
		for (suffix, count) in &other.suffixes {
			*self.suffixes.entry(suffix.clone()).or_insert(0) += count;
		}
		self.total += other.total;
	}
}

impl From<SuffixMap> for SuffixTable {
	fn from(map: SuffixMap) -> Self {
		SuffixTable(map.suffixes, map.total)
	}
}

impl From<SuffixTable> for SuffixMap {
	fn from(SuffixTable(suffixes, total): SuffixTable) -> Self {
		Self { suffixes, total }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn empty_map_samples_boundary() {
		let map = SuffixMap::new();
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(map.size(), 0);
		assert_eq!(map.get(&mut rng), BOUNDARY);
	}

	#[test]
	fn total_follows_add_calls() {
		let mut map = SuffixMap::new();
		for token in ["a", "b", "a", "", "c", "a"] {
			map.add(token);
		}
		assert_eq!(map.size(), 6);
		assert_eq!(map.count("a"), 3);
		assert_eq!(map.count(""), 1);
		assert_eq!(map.count("z"), 0);
	}

	#[test]
	fn single_key_always_sampled() {
		let mut map = SuffixMap::new();
		map.add("only");
		map.add("only");
		let mut rng = StdRng::seed_from_u64(7);
		for _ in 0..100 {
			assert_eq!(map.get(&mut rng), "only");
		}
	}

	#[test]
	fn samples_only_recorded_keys() {
		let mut map = SuffixMap::new();
		map.add("x");
		map.add("y");
		map.add("y");
		let mut rng = StdRng::seed_from_u64(42);
		let mut seen = BTreeMap::new();
		for _ in 0..3000 {
			*seen.entry(map.get(&mut rng).to_owned()).or_insert(0u32) += 1;
		}
		assert_eq!(seen.len(), 2);
		// "y" is twice as likely as "x"
		assert!(seen["y"] > seen["x"]);
	}

	#[test]
	fn same_seed_same_samples() {
		let mut map = SuffixMap::new();
		for token in ["a", "b", "c", "d", "b"] {
			map.add(token);
		}
		let mut a = StdRng::seed_from_u64(3);
		let mut b = StdRng::seed_from_u64(3);
		let first: Vec<String> = (0..20).map(|_| map.get(&mut a).to_owned()).collect();
		let second: Vec<String> = (0..20).map(|_| map.get(&mut b).to_owned()).collect();
		assert_eq!(first, second);
	}

	#[test]
	fn merge_sums_counts() {
		let mut left = SuffixMap::new();
		left.add("a");
		left.add("b");
		let mut right = SuffixMap::new();
		right.add("b");
		right.add("");
		left.merge(&right);
		assert_eq!(left.size(), 4);
		assert_eq!(left.count("b"), 2);
		assert_eq!(left.count(""), 1);
	}

	#[test]
	fn check_rejects_inconsistent_table() {
		let map = SuffixMap::from(SuffixTable(BTreeMap::from([("a".to_owned(), 2)]), 3));
		assert!(matches!(map.check(), Err(Error::InconsistentTotal { recorded: 3, actual: 2 })));
		let map = SuffixMap::from(SuffixTable(BTreeMap::from([("a".to_owned(), 0)]), 0));
		assert!(matches!(map.check(), Err(Error::ZeroCount { .. })));
	}

	#[test]
	fn check_accepts_learnt_map() {
		let mut map = SuffixMap::new();
		map.add("a");
		map.add("");
		assert!(map.check().is_ok());
	}
}
