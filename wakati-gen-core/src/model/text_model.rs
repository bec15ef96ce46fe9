use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::chain::Chain;
use crate::corpus::Corpus;
use crate::error::{Result, WakatiError};

/// Bumped whenever the serialized layout changes.
const FORMAT_VERSION: u32 = 1;

/// Originality bounds: how much of a generated sentence may be copied
/// verbatim from a single corpus line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Overlap {
	/// Fraction of the sentence length, in `(0, 1]`.
	pub ratio: f64,
	/// Hard cap on the window size, in tokens.
	pub max_total: usize,
}

impl Default for Overlap {
	fn default() -> Self {
		Self { ratio: 0.7, max_total: 15 }
	}
}

impl Overlap {
	/// Validates and builds overlap bounds.
	///
	/// # Errors
	/// Returns `InvalidParameter` if `ratio` is outside `(0, 1]` or
	/// `max_total` is 0.
	pub fn new(ratio: f64, max_total: usize) -> Result<Self> {
		if !(ratio > 0.0 && ratio <= 1.0) {
			return Err(WakatiError::invalid_parameter(format!(
				"overlap ratio must be in (0, 1], got {}",
				ratio
			)));
		}
		if max_total == 0 {
			return Err(WakatiError::invalid_parameter("overlap total must be >= 1"));
		}
		Ok(Self { ratio, max_total })
	}

	/// Longest run of tokens a sentence of `len` tokens may share with a
	/// corpus line. Halves round to even.
	pub fn max_shared(&self, len: usize) -> usize {
		let by_ratio = (self.ratio * len as f64).round_ties_even() as usize;
		by_ratio.min(self.max_total)
	}

	/// Size of the token window that must not appear in the corpus for a
	/// sentence of `len` tokens: one more than [`Overlap::max_shared`],
	/// capped at `len`.
	pub fn window(&self, len: usize) -> usize {
		(self.max_shared(len) + 1).min(len)
	}
}

/// The trained model: a Markov chain plus, optionally, the corpus lines
/// it was trained on.
///
/// The retained lines are only needed by the originality check
/// ([`TextModel::is_original`]). They are stored padded with the boundary
/// marker (`" a b c "`) so that a window can be searched token-aligned.
///
/// Serialized with `postcard` by [`TextModel::save`] / [`TextModel::load`].
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TextModel {
	version: u32,
	chain: Chain,
	original: Option<Vec<String>>,
}

impl TextModel {
	/// Builds a model of order `order` from `corpus`.
	///
	/// With `retain_original`, corpus lines are kept for the originality
	/// check (and saved along with the model).
	pub fn build(corpus: &Corpus, order: usize, retain_original: bool) -> Result<Self> {
		let chain = Chain::build(corpus, order)?;
		let original = retain_original.then(|| corpus.lines().iter().map(|line| pad(line.as_slice())).collect());

		info!(
			"model built: order {}, {} states, {} transitions, {} start states, {} short lines skipped",
			chain.order(),
			chain.state_count(),
			chain.transition_count(),
			chain.start_count(),
			chain.short_lines()
		);
		Ok(Self { version: FORMAT_VERSION, chain, original })
	}

	/// The underlying transition table.
	pub fn chain(&self) -> &Chain {
		&self.chain
	}

	/// State size of the chain.
	pub fn order(&self) -> usize {
		self.chain.order()
	}

	/// `true` if the original lines were retained.
	pub fn retains_original(&self) -> bool {
		self.original.is_some()
	}

	/// Checks that no window of `overlap.window(len)` consecutive tokens of
	/// `tokens` appears as is in a single corpus line.
	///
	/// # Errors
	/// Returns `OriginalTextUnavailable` if the lines were not retained.
	pub fn is_original(&self, tokens: &[String], overlap: Overlap) -> Result<bool> {
		let original = self.original.as_ref().ok_or(WakatiError::OriginalTextUnavailable)?;
		if tokens.is_empty() {
			return Ok(true);
		}

		let window = overlap.window(tokens.len());
		for gram in tokens.windows(window) {
			let needle = pad(gram);
			if original.iter().any(|line| line.contains(&needle)) {
				return Ok(false);
			}
		}
		Ok(true)
	}

	/// Writes the model to `path`.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let bytes = postcard::to_stdvec(self)?;
		std::fs::write(&path, bytes).map_err(|e| WakatiError::from_io(e, path.as_ref()))?;
		info!("model saved to {}", path.as_ref().display());
		Ok(())
	}

	/// Reads a model written by [`TextModel::save`].
	///
	/// # Errors
	/// - `FileNotFound` / `Io` if the file cannot be read
	/// - `Serialization` if it is not a model or has another format version
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let bytes = std::fs::read(&path).map_err(|e| WakatiError::from_io(e, path.as_ref()))?;
		let model: TextModel = postcard::from_bytes(&bytes)?;
		if model.version != FORMAT_VERSION {
			return Err(WakatiError::Serialization(format!(
				"unsupported model format version {} (expected {})",
				model.version, FORMAT_VERSION
			)));
		}
		info!(
			"model loaded from {}: order {}, {} states",
			path.as_ref().display(),
			model.order(),
			model.chain.state_count()
		);
		Ok(model)
	}
}

fn pad<S: AsRef<str>>(tokens: &[S]) -> String {
	let mut out = String::from(" ");
	for token in tokens {
		out.push_str(token.as_ref());
		out.push(' ');
	}
	out
}
