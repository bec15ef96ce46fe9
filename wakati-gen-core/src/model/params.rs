use crate::error::{Result, WakatiError};

use super::text_model::Overlap;

/// Default upper bound on the characters of a sentence.
pub const DEFAULT_MAX_CHARS: usize = 100;
/// Default upper bound on the tokens of a sentence.
pub const DEFAULT_MAX_WORDS: usize = 20;
/// Default number of attempts per sentence.
pub const DEFAULT_MAX_TRIES: usize = 120;

/// Strategy used to select the window a sentence starts from.
///
/// # Variants
/// - `Random`: a window that opened a corpus line, weighted by how often
///   it did.
/// - `Custom(tokens)`: exactly `order` tokens name any observed window;
///   fewer tokens restrict the random start to windows beginning with them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StartSeed {
	#[default]
	Random,
	Custom(Vec<String>),
}

impl StartSeed {
	/// Parses space separated start tokens. Blank input means `Random`.
	pub fn parse(text: &str) -> Self {
		let tokens: Vec<String> = text.split_whitespace().map(str::to_owned).collect();
		if tokens.is_empty() { StartSeed::Random } else { StartSeed::Custom(tokens) }
	}
}

/// Parameters of a single sentence generation.
///
/// # Invariants
/// - `max_words >= 1`
/// - `min_words <= max_words` and `min_chars <= max_chars`
/// - `overlap`, when set, holds validated bounds
#[derive(Clone, Debug, PartialEq)]
pub struct GenerateParams {
	/// Maximum characters of the joined sentence.
	pub max_chars: usize,
	/// Maximum tokens of the sentence.
	max_words: usize,
	/// Number of attempts before giving up.
	pub max_tries: usize,
	/// Minimum characters of the joined sentence.
	pub min_chars: usize,
	/// Minimum tokens of the sentence.
	pub min_words: usize,
	/// Where sentences start from.
	pub start: StartSeed,
	/// Originality check, disabled when `None`.
	overlap: Option<Overlap>,
	/// Inserted between tokens in the output (empty strips boundaries).
	pub joiner: String,
}

impl Default for GenerateParams {
	fn default() -> Self {
		Self {
			max_chars: DEFAULT_MAX_CHARS,
			max_words: DEFAULT_MAX_WORDS,
			max_tries: DEFAULT_MAX_TRIES,
			min_chars: 0,
			min_words: 0,
			start: StartSeed::Random,
			overlap: None,
			joiner: String::new(),
		}
	}
}

impl GenerateParams {
	/// Parameters with the given length bounds and retry budget, other
	/// fields at their defaults.
	pub fn new(max_chars: usize, max_words: usize, max_tries: usize) -> Result<Self> {
		let mut params = Self { max_chars, max_tries, ..Default::default() };
		params.set_max_words(max_words)?;
		Ok(params)
	}

	pub fn max_words(&self) -> usize {
		self.max_words
	}

	/// Sets the maximum number of tokens.
	///
	/// # Errors
	/// Returns an error if `max_words` is 0.
	pub fn set_max_words(&mut self, max_words: usize) -> Result<()> {
		if max_words == 0 {
			return Err(WakatiError::invalid_parameter("max_words must be >= 1"));
		}
		self.max_words = max_words;
		Ok(())
	}

	pub fn overlap(&self) -> Option<Overlap> {
		self.overlap
	}

	/// Enables (or disables with `None`) the originality check.
	pub fn set_overlap(&mut self, overlap: Option<Overlap>) {
		self.overlap = overlap;
	}

	/// Checks the cross-field invariants.
	pub fn validate(&self) -> Result<()> {
		if self.min_words > self.max_words {
			return Err(WakatiError::invalid_parameter(format!(
				"min_words ({}) is greater than max_words ({})",
				self.min_words, self.max_words
			)));
		}
		if self.min_chars > self.max_chars {
			return Err(WakatiError::invalid_parameter(format!(
				"min_chars ({}) is greater than max_chars ({})",
				self.min_chars, self.max_chars
			)));
		}
		Ok(())
	}

	/// `true` if a sentence of `words` tokens and `chars` characters fits
	/// the length bounds.
	pub fn accepts_length(&self, words: usize, chars: usize) -> bool {
		(self.min_words..=self.max_words).contains(&words) && (self.min_chars..=self.max_chars).contains(&chars)
	}
}
