//! Morphological segmentation backed by Lindera and an embedded IPADIC.
//!
//! This is the closest equivalent to MeCab's `-Owakati` output. Segmenting
//! an already segmented line is not guaranteed to be a no-op: a token may be
//! split again, so the pipeline tokenizes a corpus exactly once.

use std::borrow::Cow;
use std::str::FromStr;

use lindera::dictionary::{load_dictionary, load_user_dictionary};
use lindera::mode::Mode;
use lindera::segmenter::Segmenter;

use crate::error::{Result, WakatiError};

use super::Tokenizer;

/// Default embedded dictionary.
pub const DEFAULT_DICTIONARY: &str = "embedded://ipadic";

pub struct LinderaTokenizer {
	inner: Segmenter,
}

impl LinderaTokenizer {
	/// Creates a tokenizer with the embedded IPADIC in normal mode.
	pub fn ipadic() -> Result<Self> {
		Self::new("normal", DEFAULT_DICTIONARY, None)
	}

	/// Creates a tokenizer from a segmentation mode and dictionary URIs.
	pub fn new(mode_str: &str, dict_uri: &str, user_dict_uri: Option<&str>) -> Result<Self> {
		let mode = Mode::from_str(mode_str)
			.map_err(|e| WakatiError::tokenizer(format!("invalid mode '{}': {}", mode_str, e)))?;
		let dict = load_dictionary(dict_uri)
			.map_err(|e| WakatiError::tokenizer(format!("failed to load dictionary: {}", e)))?;
		let user_dict = match user_dict_uri {
			Some(uri) => Some(load_user_dictionary(uri, &dict.metadata).map_err(|e| {
				WakatiError::tokenizer(format!("failed to load user dictionary: {}", e))
			})?),
			None => None,
		};

		Ok(Self { inner: Segmenter::new(mode, dict, user_dict) })
	}
}

impl Tokenizer for LinderaTokenizer {
	fn tokenize(&self, text: &str) -> Result<Vec<String>> {
		let segments = self
			.inner
			.segment(Cow::Borrowed(text))
			.map_err(|e| WakatiError::tokenizer(format!("failed to segment text: {}", e)))?;

		Ok(segments
			.into_iter()
			.map(|token| token.surface.into_owned())
			.filter(|surface| !surface.trim().is_empty())
			.collect())
	}

	fn name(&self) -> &'static str {
		"lindera"
	}
}
