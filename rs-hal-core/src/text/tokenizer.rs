use super::codepoints::Codepoints;
use crate::error::Result;

/// Whitespace class of a single code point, as C `isspace` sees the ASCII range.
///
/// Non-ASCII spaces (ex. U+00A0) belong to the non-whitespace class.
fn is_space(fragment: &str) -> bool {
	matches!(fragment.as_bytes(), [b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r'])
}

/// Splits a line into maximal runs of whitespace and non-whitespace.
///
/// Whitespace runs are tokens too, so concatenating the output gives back
/// the input exactly. Empty input yields no tokens.
///
/// Example: `"a  b!"` → `["a", "  ", "b!"]`
pub fn tokenize(text: &str) -> Vec<String> {
	split_runs(&Codepoints::from(text))
}

/// Same as [`tokenize`], for raw bytes that have not been checked as UTF-8 yet.
///
/// # Errors
/// Returns `InvalidEncoding` if the bytes are not valid UTF-8.
pub fn tokenize_bytes(bytes: &[u8]) -> Result<Vec<String>> {
	Ok(split_runs(&Codepoints::parse(bytes)?))
}

fn split_runs(codepoints: &Codepoints) -> Vec<String> {
	let classes: Vec<bool> = codepoints.iter().map(is_space).collect();

	let mut tokens = Vec::new();
	let mut start = 0;
	for (i, class) in classes.iter().enumerate() {
		let end = i + 1;
		// Close the run on a class change or at the end of the line
		if classes.get(end).is_none_or(|next| next != class) {
			tokens.push(codepoints.slice(start, end).join());
			start = end;
		}
	}
	tokens
}

#[cfg(test)]
mod tests {
	use super::*;

	fn is_space_token(token: &str) -> bool {
		token.chars().all(|c| c.is_ascii() && is_space(c.encode_utf8(&mut [0; 4])))
	}

	#[test]
	fn simple_line() {
		assert_eq!(tokenize("a b c"), vec!["a", " ", "b", " ", "c"]);
	}

	#[test]
	fn empty_line() {
		assert!(tokenize("").is_empty());
	}

	#[test]
	fn leading_and_trailing_whitespace() {
		assert_eq!(tokenize("  hello\tworld \n"), vec!["  ", "hello", "\t", "world", " \n"]);
	}

	#[test]
	fn punctuation_stays_with_words() {
		assert_eq!(tokenize("Hi, there!"), vec!["Hi,", " ", "there!"]);
	}

	#[test]
	fn vertical_tab_and_form_feed_are_whitespace() {
		assert_eq!(tokenize("a\x0B\x0Cb"), vec!["a", "\x0B\x0C", "b"]);
	}

	#[test]
	fn non_ascii_space_is_not_whitespace() {
		assert_eq!(tokenize("a\u{00A0}b c"), vec!["a\u{00A0}b", " ", "c"]);
	}

	#[test]
	fn multibyte_words() {
		assert_eq!(tokenize("日本 語"), vec!["日本", " ", "語"]);
	}

	#[test]
	fn concatenation_gives_back_the_input() {
		let lines = ["", " ", "x", "  a  bb ccc  ", "héllo\twörld\r\n", "one", "\n\n\n", "é é"];
		for line in lines {
			assert_eq!(tokenize(line).concat(), line);
		}
	}

	#[test]
	fn runs_alternate_and_are_never_empty() {
		let tokens = tokenize(" the quick\t\tbrown  fox ");
		assert!(tokens.iter().all(|t| !t.is_empty()));
		for pair in tokens.windows(2) {
			assert_ne!(is_space_token(&pair[0]), is_space_token(&pair[1]));
		}
	}

	#[test]
	fn bytes_are_checked() {
		assert_eq!(tokenize_bytes(b"a b").unwrap(), vec!["a", " ", "b"]);
		assert!(tokenize_bytes(&[b'a', b' ', 0xC3]).is_err());
	}
}
