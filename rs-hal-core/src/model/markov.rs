use std::collections::{BTreeMap, VecDeque};

use log::{debug, trace};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::prefix::Prefix;
use super::settings::ResponseSettings;
use super::snapshot::Snapshot;
use super::suffix_map::{BOUNDARY, SuffixMap};
use crate::error::{Error, Result};
use crate::text::tokenizer::tokenize;

/// Largest supported model order (tokens per prefix window).
pub const MAX_ORDER: usize = 64;

/// Suffix maps of a prefix: what was seen before it (left) and after it (right).
pub type SuffixPair = (SuffixMap, SuffixMap);

/// Side of a prefix window.
#[derive(Clone, Copy, Debug)]
enum Side {
	Left,
	Right,
}

/// Bidirectional Markov model over whitespace-run tokens.
///
/// Every window of `order` consecutive tokens seen in the input is stored as a
/// `Prefix`, together with the tokens observed on its left and on its right.
/// A global keyword table counts how often each token was seen, so replies can
/// be anchored on the rarest known token of a new line.
///
/// # Responsibilities
/// - Learn transitions in both directions from each input line
/// - Pick an anchor prefix from the rarest keyword of a line
/// - Grow a reply from the anchor, leftwards and rightwards
/// - Export / restore / merge its state
///
/// # Invariants
/// - `order` is >= 1 and never changes
/// - Every stored prefix holds exactly `order` tokens
/// - Counts only grow
#[derive(Clone, Debug)]
pub struct Model {
	/// Number of tokens in every prefix window.
	order: usize,

	/// Prefix window → (left suffixes, right suffixes).
	prefixes: BTreeMap<Prefix, SuffixPair>,

	/// Token → number of times it was seen in any input.
	/// Example: { " " => 12, "cheese" => 1 }
	keywords: BTreeMap<String, u64>,

	settings: ResponseSettings,

	rng: StdRng,
}

impl Model {
	/// Creates an empty model of the given order, seeded from the OS.
	///
	/// # Errors
	/// Returns an error if `order` is 0 or above `MAX_ORDER`.
	pub fn new(order: usize) -> Result<Self> {
		Self::with_rng(order, StdRng::from_os_rng())
	}

	/// Creates an empty model whose replies are reproducible for a given `seed`.
	pub fn with_seed(order: usize, seed: u64) -> Result<Self> {
		Self::with_rng(order, StdRng::seed_from_u64(seed))
	}

	/// Creates an empty model drawing from the given random source.
	///
	/// # Errors
	/// Returns an error if `order` is 0 or above `MAX_ORDER`.
	pub fn with_rng(order: usize, rng: StdRng) -> Result<Self> {
		if order == 0 {
			return Err(Error::ZeroOrder);
		}
		if order > MAX_ORDER {
			return Err(Error::OrderTooLarge { order, max: MAX_ORDER });
		}
		Ok(Self {
			order,
			prefixes: BTreeMap::new(),
			keywords: BTreeMap::new(),
			settings: ResponseSettings::default(),
			rng,
		})
	}

	/// Restores a model from a snapshot taken with `expected_order`.
	///
	/// # Errors
	/// - `OrderMismatch` if the snapshot has another order
	/// - `InvalidOrder` if a stored prefix does not hold `expected_order` tokens
	pub fn from_snapshot(snapshot: Snapshot, expected_order: usize) -> Result<Self> {
		if snapshot.order != expected_order {
			return Err(Error::OrderMismatch { expected: expected_order, found: snapshot.order });
		}
		Self::try_from(snapshot)
	}

	/// Replaces the whole learned state with the snapshot content.
	///
	/// Settings and the random source are kept. On error, nothing changes.
	///
	/// # Errors
	/// - `OrderMismatch` if the snapshot has another order than this model
	/// - `InvalidOrder` if a stored prefix has the wrong length
	pub fn load(&mut self, snapshot: Snapshot) -> Result<()> {
		if snapshot.order != self.order {
			return Err(Error::OrderMismatch { expected: self.order, found: snapshot.order });
		}
		let (keywords, prefixes) = snapshot.into_tables()?;
		self.keywords = keywords;
		self.prefixes = prefixes;
		debug!("loaded {} prefixes and {} keywords", self.prefixes.len(), self.keywords.len());
		Ok(())
	}

	/// Exports the learned state (order, keywords, prefixes).
	pub fn to_snapshot(&self) -> Snapshot {
		Snapshot {
			order: self.order,
			keywords: self.keywords.clone(),
			prefixes: self
				.prefixes
				.iter()
				.map(|(prefix, (left, right))| (prefix.clone(), left.clone(), right.clone()))
				.collect(),
		}
	}

	pub fn order(&self) -> usize {
		self.order
	}

	pub fn settings(&self) -> &ResponseSettings {
		&self.settings
	}

	pub fn settings_mut(&mut self) -> &mut ResponseSettings {
		&mut self.settings
	}

	/// How many times `token` was seen (0 if never).
	pub fn keyword_count(&self, token: &str) -> u64 {
		self.keywords.get(token).copied().unwrap_or(0)
	}

	/// Number of distinct tokens seen.
	pub fn keyword_len(&self) -> usize {
		self.keywords.len()
	}

	/// Number of distinct prefix windows stored.
	pub fn prefix_count(&self) -> usize {
		self.prefixes.len()
	}

	/// Left and right suffix maps of a prefix, if it was ever seen.
	pub fn suffixes(&self, prefix: &Prefix) -> Option<&SuffixPair> {
		self.prefixes.get(prefix)
	}

	/// Replies to a line, then learns from it.
	///
	/// The reply is built from what was known *before* this line. If nothing
	/// related is known, the configured placeholder is returned.
	///
	/// Never fails.
	pub fn add(&mut self, line: &str) -> String {
		let tokens = tokenize(line);
		let anchors = self.best_prefixes(&tokens);

		let reply = if anchors.is_empty() {
			self.settings.placeholder.clone()
		} else {
			let anchor = &anchors[self.rng.random_range(0..anchors.len())];
			debug!("anchoring reply on {anchor} ({} candidates)", anchors.len());
			self.build_response(anchor)
		};

		self.learn(&tokens);
		for token in &tokens {
			self.add_keyword(token);
		}

		reply
	}

	/// Merges another model of the same order into this one.
	///
	/// Keyword counts and suffix counts are summed, unknown prefixes are cloned.
	///
	/// # Errors
	/// Returns `OrderMismatch` if the orders differ.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.order != other.order {
			return Err(Error::OrderMismatch { expected: self.order, found: other.order });
		}

		for (token, count) in &other.keywords {
			let existing = self.keywords.entry(token.clone()).or_insert(0);
			*existing = existing.saturating_add(*count);
		}

		for (prefix, (left, right)) in &other.prefixes {
			if let Some((existing_left, existing_right)) = self.prefixes.get_mut(prefix) {
				existing_left.merge(left);
				existing_right.merge(right);
			} else {
				self.prefixes.insert(prefix.clone(), (left.clone(), right.clone()));
			}
		}

		Ok(())
	}

	fn add_keyword(&mut self, token: &str) {
		let count = self.keywords.entry(token.to_owned()).or_insert(0);
		*count = count.saturating_add(1);
	}

	/// Returns every stored prefix containing the rarest known token of `tokens`.
	///
	/// Tokens are ranked by keyword count, unknown tokens first, ties broken by
	/// token order. The first token found in at least one prefix wins.
	/// Returns an empty list if no token matches.
	fn best_prefixes(&self, tokens: &[String]) -> Vec<Prefix> {
		let mut ranked: Vec<&str> = tokens.iter().map(String::as_str).collect();
		ranked.sort_by_key(|token| (self.keywords.get(*token).copied().unwrap_or(u64::MAX), *token));
		ranked.dedup();

		for keyword in ranked {
			let prefixes: Vec<Prefix> = self.prefixes.keys().filter(|p| p.contains(keyword)).cloned().collect();
			if !prefixes.is_empty() {
				debug!("rarest known keyword {keyword:?} is in {} prefixes", prefixes.len());
				return prefixes;
			}
		}
		Vec::new()
	}

	/// Records every window of `order` tokens with its left and right neighbours.
	///
	/// A line shorter than `order` is learnt as one window padded on the right
	/// with boundary markers. An empty line teaches nothing.
	fn learn(&mut self, tokens: &[String]) {
		if tokens.is_empty() {
			return;
		}

		if tokens.len() < self.order {
			let mut window: Vec<&str> = tokens.iter().map(String::as_str).collect();
			window.resize(self.order, BOUNDARY);
			self.record(&window, BOUNDARY, BOUNDARY);
			debug!("learnt 1 padded window from {} tokens", tokens.len());
			return;
		}

		let windows = tokens.len() - self.order + 1;
		for start in 0..windows {
			let stop = start + self.order;
			let left = if start > 0 { tokens[start - 1].as_str() } else { BOUNDARY };
			let right = tokens.get(stop).map_or(BOUNDARY, String::as_str);
			self.record(&tokens[start..stop], left, right);
		}
		debug!("learnt {windows} windows from {} tokens", tokens.len());
	}

	fn record<S: AsRef<str>>(&mut self, window: &[S], left: &str, right: &str) {
		let (left_map, right_map) = self.prefixes.entry(Prefix::from_window(window)).or_default();
		left_map.add(left);
		right_map.add(right);
	}

	/// Samples the suffix map of `window` on one side.
	///
	/// An unknown window samples as the boundary marker.
	fn sample(&mut self, window: &Prefix, side: Side) -> String {
		match self.prefixes.get(window) {
			Some((left, right)) => {
				let map = match side {
					Side::Left => left,
					Side::Right => right,
				};
				map.get(&mut self.rng).to_owned()
			}
			None => BOUNDARY.to_owned(),
		}
	}

	/// Grows a reply from `prefix` in both directions.
	///
	/// Each round prepends a token sampled from the left map of the first
	/// `order` tokens and appends one sampled from the right map of the last
	/// `order` tokens. A side closes when it samples the boundary marker.
	/// Stops when both sides are closed or the length cap is reached.
	///
	/// The anchor itself is never cut, so a reply holds at most
	/// `max(max_tokens, order)` tokens.
	fn build_response(&mut self, prefix: &Prefix) -> String {
		let order = self.order;
		let max_tokens = self.settings.max_tokens();

		let mut tokens: VecDeque<String> = prefix.iter().map(str::to_owned).collect();
		let mut front_open = tokens.front().is_some_and(|t| t != BOUNDARY);
		let mut back_open = tokens.back().is_some_and(|t| t != BOUNDARY);

		while tokens.len() < max_tokens && (front_open || back_open) {
			if front_open {
				let window = Prefix::from_window(&tokens.range(..order).collect::<Vec<_>>());
				let token = self.sample(&window, Side::Left);
				trace!("{window} <- {token:?}");
				if token == BOUNDARY {
					front_open = false;
				} else {
					tokens.push_front(token);
				}
			}

			if back_open && tokens.len() < max_tokens {
				let window = Prefix::from_window(&tokens.range(tokens.len() - order..).collect::<Vec<_>>());
				let token = self.sample(&window, Side::Right);
				trace!("{window} -> {token:?}");
				if token == BOUNDARY {
					back_open = false;
				} else {
					tokens.push_back(token);
				}
			}
		}

		tokens.into_iter().collect()
	}
}

impl TryFrom<Snapshot> for Model {
	type Error = Error;

	/// Restores a model, taking its order from the snapshot.
	fn try_from(snapshot: Snapshot) -> Result<Self> {
		let mut model = Self::new(snapshot.order)?;
		model.load(snapshot)?;
		Ok(model)
	}
}
