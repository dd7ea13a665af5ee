use std::fmt;

use crate::error::{Error, Result};

/// A string split into its code points, one owned fragment per character.
///
/// Slicing and reversing work on whole fragments, so a multi-byte character
/// is never cut in half.
///
/// ## Invariants
/// - Every fragment is one valid UTF-8 sequence of 1 to 4 bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Codepoints {
	fragments: Vec<String>,
}

impl Codepoints {
	/// Splits raw bytes into code point fragments.
	///
	/// The width of each fragment is read from the high bits of its leading byte:
	/// `0xxxxxxx` (1 byte), `110xxxxx` (2), `1110xxxx` (3), `11110xxx` (4).
	///
	/// # Errors
	/// Returns `InvalidEncoding` if a leading byte matches none of these patterns,
	/// or if the sequence it announces is truncated or malformed.
	pub fn parse(bytes: &[u8]) -> Result<Self> {
		let mut fragments = Vec::new();
		let mut start = 0;

		while start < bytes.len() {
			let leading = bytes[start];
			let invalid = Error::InvalidEncoding { position: start, byte: leading };

			let width = match Self::sequence_width(leading) {
				Some(width) => width,
				None => return Err(invalid),
			};
			let fragment = match bytes.get(start..start + width).map(std::str::from_utf8) {
				Some(Ok(fragment)) => fragment,
				_ => return Err(invalid),
			};

			fragments.push(fragment.to_owned());
			start += width;
		}

		Ok(Self { fragments })
	}

	/// Number of bytes announced by a UTF-8 leading byte.
	fn sequence_width(leading: u8) -> Option<usize> {
		if leading & 0x80 == 0x00 {
			Some(1)
		} else if leading & 0xE0 == 0xC0 {
			Some(2)
		} else if leading & 0xF0 == 0xE0 {
			Some(3)
		} else if leading & 0xF8 == 0xF0 {
			Some(4)
		} else {
			None
		}
	}

	/// Number of fragments (characters).
	pub fn len(&self) -> usize {
		self.fragments.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fragments.is_empty()
	}

	/// Iterates over the fragments in order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.fragments.iter().map(String::as_str)
	}

	/// Joins all fragments back into a string.
	pub fn join(&self) -> String {
		self.fragments.concat()
	}

	/// Returns the fragments in the index range `[left, right)`.
	///
	/// # Panics
	/// Panics if `left > right` or `right > len()`.
	pub fn slice(&self, left: usize, right: usize) -> Self {
		assert!(left <= right, "slice bounds reversed: {left} > {right}");
		Self { fragments: self.fragments[left..right].to_vec() }
	}

	/// Returns the last `k` fragments joined as a string.
	///
	/// If `k` is greater than the number of fragments, the whole string is returned.
	pub fn back(&self, k: usize) -> String {
		let start = self.fragments.len().saturating_sub(k);
		self.fragments[start..].concat()
	}

	/// Appends one code point.
	pub fn push(&mut self, c: char) {
		self.fragments.push(c.to_string());
	}

	/// Returns a copy with the fragments in reverse order.
	pub fn reversed(&self) -> Self {
		Self { fragments: self.fragments.iter().rev().cloned().collect() }
	}
}

impl From<&str> for Codepoints {
	/// A `&str` is already valid UTF-8, so this cannot fail.
	fn from(s: &str) -> Self {
		Self { fragments: s.chars().map(String::from).collect() }
	}
}

impl fmt::Display for Codepoints {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for fragment in &self.fragments {
			f.write_str(fragment)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn three_byte_characters_are_kept_whole() {
		let cp = Codepoints::parse("日本".as_bytes()).unwrap();
		assert_eq!(cp.len(), 2);
		assert!(cp.iter().all(|f| f.len() == 3));
		assert_eq!(cp.slice(0, 1).join(), "日");
	}

	#[test]
	fn mixed_widths() {
		let cp = Codepoints::parse("aé€😀".as_bytes()).unwrap();
		let widths: Vec<usize> = cp.iter().map(str::len).collect();
		assert_eq!(widths, vec![1, 2, 3, 4]);
		assert_eq!(cp.to_string(), "aé€😀");
	}

	#[test]
	fn parse_matches_from_str() {
		let s = "héllo wörld";
		assert_eq!(Codepoints::parse(s.as_bytes()).unwrap(), Codepoints::from(s));
	}

	#[test]
	fn invalid_leading_byte() {
		let err = Codepoints::parse(&[b'a', 0xFF, b'b']).unwrap_err();
		assert!(matches!(err, Error::InvalidEncoding { position: 1, byte: 0xFF }));
	}

	#[test]
	fn stray_continuation_byte() {
		let err = Codepoints::parse(&[0x80]).unwrap_err();
		assert!(matches!(err, Error::InvalidEncoding { position: 0, byte: 0x80 }));
	}

	#[test]
	fn truncated_sequence() {
		let err = Codepoints::parse(&[b'x', 0xE6, 0x97]).unwrap_err();
		assert!(matches!(err, Error::InvalidEncoding { position: 1, byte: 0xE6 }));
	}

	#[test]
	fn back_returns_last_fragments() {
		let cp = Codepoints::from("héllo");
		assert_eq!(cp.back(2), "lo");
		assert_eq!(cp.back(4), "éllo");
		assert_eq!(cp.back(42), "héllo");
		assert_eq!(cp.back(0), "");
	}

	#[test]
	fn push_and_reverse() {
		let mut cp = Codepoints::from("ab");
		cp.push('ç');
		assert_eq!(cp.join(), "abç");
		assert_eq!(cp.reversed().join(), "çba");
	}

	#[test]
	fn push_adds_exactly_one_code_point() {
		let mut cp = Codepoints::from("a");
		cp.push('🦀');
		assert_eq!(cp.len(), 2);
		assert_eq!(cp.back(1), "🦀");
		assert_eq!(cp.iter().map(str::len).collect::<Vec<_>>(), [1, 4]);
	}

	#[test]
	fn empty_slice() {
		let cp = Codepoints::from("abc");
		assert!(cp.slice(2, 2).is_empty());
	}

	#[test]
	#[should_panic]
	fn reversed_slice_bounds_panic() {
		Codepoints::from("abc").slice(2, 1);
	}
}
