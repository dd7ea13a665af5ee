use crate::error::{Error, Result};

/// Default cap on the number of tokens of a generated reply.
pub const DEFAULT_MAX_TOKENS: usize = 100;

/// Default reply when no anchor prefix can be found.
pub const DEFAULT_PLACEHOLDER: &str = "nothing learned yet";

/// Parameters controlling how replies are generated.
///
/// These are runtime settings: they are not part of a model snapshot.
///
/// # Invariants
/// - `max_tokens` is always >= 1
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseSettings {
	/// Reply returned when the model knows nothing related to the input.
	pub placeholder: String,

	/// Cap on the length of a reply, in tokens. The anchor prefix is never
	/// cut, so a reply can still hold `order` tokens when the cap is lower.
	max_tokens: usize,
}

impl Default for ResponseSettings {
	fn default() -> Self {
		Self {
			placeholder: DEFAULT_PLACEHOLDER.to_owned(),
			max_tokens: DEFAULT_MAX_TOKENS,
		}
	}
}

impl ResponseSettings {
	/// Returns the current length cap.
	pub fn max_tokens(&self) -> usize {
		self.max_tokens
	}

	/// Sets the length cap of generated replies.
	///
	/// # Errors
	/// Returns an error if `max_tokens` is 0.
	pub fn set_max_tokens(&mut self, max_tokens: usize) -> Result<()> {
		if max_tokens == 0 {
			return Err(Error::InvalidSetting("max_tokens must be >= 1".to_owned()));
		}
		self.max_tokens = max_tokens;
		Ok(())
	}
}
