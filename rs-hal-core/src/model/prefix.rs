use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A fixed-length window of tokens, used as a key of the transition tables.
///
/// Prefixes compare token by token (lexicographically), so they can be stored
/// in ordered maps.
///
/// ## Invariants
/// - Holds exactly `order` tokens, checked at construction
/// - Never mutated after construction
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Prefix {
	tokens: Vec<String>,
}

impl Prefix {
	/// Creates a prefix from exactly `order` tokens.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `tokens.len() != order`.
	pub fn new<S: AsRef<str>>(tokens: &[S], order: usize) -> Result<Self> {
		if tokens.len() != order {
			return Err(Error::InvalidOrder { expected: order, found: tokens.len() });
		}
		Ok(Self { tokens: tokens.iter().map(|t| t.as_ref().to_owned()).collect() })
	}

	/// Builds a prefix from a window the model already sized to its order.
	pub(crate) fn from_window<S: AsRef<str>>(window: &[S]) -> Self {
		Self { tokens: window.iter().map(|t| t.as_ref().to_owned()).collect() }
	}

	/// Number of tokens, always the order it was built with.
	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	pub fn tokens(&self) -> &[String] {
		&self.tokens
	}

	/// Iterates over the tokens in order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.tokens.iter().map(String::as_str)
	}

	/// Returns `true` if `token` appears anywhere in the window.
	pub fn contains(&self, token: &str) -> bool {
		self.tokens.iter().any(|t| t == token)
	}

	/// Checks a deserialized prefix against the order of the model loading it.
	pub(crate) fn check_order(&self, order: usize) -> Result<()> {
		if self.tokens.len() != order {
			return Err(Error::InvalidOrder { expected: order, found: self.tokens.len() });
		}
		Ok(())
	}
}

impl fmt::Display for Prefix {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(&self.tokens).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keeps_token_order() {
		let p = Prefix::new(&["a", " ", "b"], 3).unwrap();
		assert_eq!(p.tokens(), &["a", " ", "b"]);
		assert_eq!(p.len(), 3);
	}

	#[test]
	fn rejects_wrong_length() {
		assert!(matches!(
			Prefix::new(&["a"], 2),
			Err(Error::InvalidOrder { expected: 2, found: 1 })
		));
		assert!(matches!(
			Prefix::new(&["a", "b", "c"], 2),
			Err(Error::InvalidOrder { expected: 2, found: 3 })
		));
	}

	#[test]
	fn ordering_is_lexicographic_over_tokens() {
		let ab = Prefix::new(&["a", "b"], 2).unwrap();
		let ac = Prefix::new(&["a", "c"], 2).unwrap();
		let b_ = Prefix::new(&["b", ""], 2).unwrap();
		assert!(ab < ac);
		assert!(ac < b_);
		assert_eq!(ab, Prefix::new(&[String::from("a"), String::from("b")], 2).unwrap());
	}

	#[test]
	fn contains_any_position() {
		let p = Prefix::new(&["x", " ", "y"], 3).unwrap();
		assert!(p.contains("y"));
		assert!(p.contains(" "));
		assert!(!p.contains("z"));
	}

	#[test]
	fn displays_as_list() {
		let p = Prefix::new(&["hi", " "], 2).unwrap();
		assert_eq!(p.to_string(), r#"["hi", " "]"#);
	}
}
