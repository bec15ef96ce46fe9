//! Error types for the wakati generator.
//!
//! Every fallible operation of the crate returns [`Result`], whose error
//! side is a [`WakatiError`]. File-level errors are meant to abort a run,
//! while generation errors only concern a single sentence
//! (see [`WakatiError::is_per_sentence`]).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, WakatiError>;

/// All errors produced by the tokenizer stage, the corpus loader,
/// the transition model and the generator.
#[derive(Error, Debug)]
pub enum WakatiError {
	/// A source, intermediate or model file does not exist.
	#[error("file not found: {}", .0.display())]
	FileNotFound(PathBuf),

	/// Any other I/O failure.
	#[error("I/O error: {0}")]
	Io(#[from] io::Error),

	/// A text file is not valid UTF-8.
	#[error("{} is not valid UTF-8 (line {line})", .path.display())]
	InvalidEncoding { path: PathBuf, line: usize },

	/// The Markov order must be at least 1.
	#[error("invalid order {0}: the state size must be >= 1")]
	InvalidOrder(usize),

	/// The corpus holds no line long enough to produce a transition.
	#[error("insufficient corpus: no line has more tokens than the state size")]
	InsufficientCorpus,

	/// Every attempt for a sentence was rejected.
	#[error("generation exhausted after {tries} tries")]
	GenerationExhausted { tries: usize },

	/// The requested start tokens do not match any observed state.
	#[error("unknown start seed: {0:?}")]
	UnknownSeed(Vec<String>),

	/// The originality check needs the original lines, which were not retained.
	#[error("originality check requested but the model did not retain its original lines")]
	OriginalTextUnavailable,

	/// A generation or corpus parameter is out of range.
	#[error("invalid parameter: {0}")]
	InvalidParameter(String),

	/// The segmenter failed.
	#[error("tokenizer error: {0}")]
	Tokenizer(String),

	/// Model (de)serialization failed.
	#[error("serialization error: {0}")]
	Serialization(String),
}

impl WakatiError {
	/// Builds an `InvalidParameter` error.
	pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
		WakatiError::InvalidParameter(msg.into())
	}

	/// Builds a `Tokenizer` error.
	pub fn tokenizer<S: Into<String>>(msg: S) -> Self {
		WakatiError::Tokenizer(msg.into())
	}

	/// Maps an `io::Error` raised while opening `path`, turning `NotFound`
	/// into [`WakatiError::FileNotFound`].
	pub fn from_io(err: io::Error, path: impl Into<PathBuf>) -> Self {
		if err.kind() == io::ErrorKind::NotFound {
			WakatiError::FileNotFound(path.into())
		} else {
			WakatiError::Io(err)
		}
	}

	/// Returns `true` for errors that only concern a single generated
	/// sentence and must not abort a batch.
	pub fn is_per_sentence(&self) -> bool {
		matches!(
			self,
			WakatiError::InsufficientCorpus
				| WakatiError::GenerationExhausted { .. }
				| WakatiError::UnknownSeed(_)
		)
	}
}

impl From<postcard::Error> for WakatiError {
	fn from(err: postcard::Error) -> Self {
		WakatiError::Serialization(err.to_string())
	}
}
