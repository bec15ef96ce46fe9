use crate::error::Result;

use super::Tokenizer;

/// Splits on Unicode whitespace only.
///
/// Meant for already segmented text or for languages that separate words
/// with spaces.
#[derive(Clone, Debug, Default)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
	pub fn new() -> Self {
		WhitespaceTokenizer
	}
}

impl Tokenizer for WhitespaceTokenizer {
	fn tokenize(&self, text: &str) -> Result<Vec<String>> {
		Ok(text.split_whitespace().map(str::to_owned).collect())
	}

	fn name(&self) -> &'static str {
		"whitespace"
	}
}
