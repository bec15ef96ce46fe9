//! Command line arguments, parsed with clap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use wakati_gen_core::model::DEFAULT_ORDER;
use wakati_gen_core::model::params::{DEFAULT_MAX_CHARS, DEFAULT_MAX_TRIES, DEFAULT_MAX_WORDS};
use wakati_gen_core::tokenizer::Normalization;

/// Generate sentences from a Japanese text file with a Markov chain.
///
/// The source file is first split into words (wakati-gaki) and written to an
/// intermediate file, which then trains a word-level Markov chain.
#[derive(Parser, Debug, Clone)]
#[command(name = "wakati-gen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct Args {
	/// Source text file (already tokenized when --markov-only is given)
	#[arg(short = 'f', long, env = "WAKATI_GEN_FILENAME", required_unless_present = "load_model")]
	pub filename: Option<PathBuf>,

	/// Intermediate tokenized file written before training (unused with --markov-only)
	#[arg(short = 'w', long, env = "WAKATI_GEN_WAKATI_FILENAME", default_value = "wakati.txt")]
	pub wakati_filename: PathBuf,

	/// Only run the Markov chain, the source file is already tokenized
	#[arg(short = 'm', long)]
	pub markov_only: bool,

	/// Number of sentences to generate
	#[arg(short = 'c', long, env = "WAKATI_GEN_COUNT", default_value_t = 1)]
	pub count: usize,

	/// Markov state size, in tokens
	#[arg(long, env = "WAKATI_GEN_ORDER", default_value_t = DEFAULT_ORDER)]
	pub order: usize,

	/// Maximum characters per sentence
	#[arg(long, default_value_t = DEFAULT_MAX_CHARS)]
	pub max_chars: usize,

	/// Maximum tokens per sentence
	#[arg(long, default_value_t = DEFAULT_MAX_WORDS)]
	pub max_words: usize,

	/// Minimum characters per sentence
	#[arg(long, default_value_t = 0)]
	pub min_chars: usize,

	/// Minimum tokens per sentence
	#[arg(long, default_value_t = 0)]
	pub min_words: usize,

	/// Attempts per sentence before giving up
	#[arg(long, default_value_t = DEFAULT_MAX_TRIES)]
	pub tries: usize,

	/// Space separated tokens every sentence starts with
	#[arg(long)]
	pub start: Option<String>,

	/// Reject sentences copying too much of a single corpus line
	#[arg(long)]
	pub novel: bool,

	/// Fraction of a sentence that may be copied verbatim (with --novel)
	#[arg(long, default_value_t = 0.7)]
	pub max_overlap_ratio: f64,

	/// Maximum copied tokens (with --novel)
	#[arg(long, default_value_t = 15)]
	pub max_overlap_total: usize,

	/// String inserted between tokens of a generated sentence
	#[arg(long, default_value_t = String::new())]
	pub joiner: String,

	/// Segmentation used to tokenize the source file
	#[arg(long, value_enum, env = "WAKATI_GEN_TOKENIZER", default_value_t = TokenizerKind::Script)]
	pub tokenizer: TokenizerKind,

	/// Unicode normalization applied before tokenization
	#[arg(long, value_enum, default_value_t = NormalizeForm::None)]
	pub normalize: NormalizeForm,

	/// Keep corpus lines with quotes, parentheses or brackets (skipped by default)
	#[arg(long)]
	pub keep_malformed: bool,

	/// Seed of the random generator, for reproducible output
	#[arg(long, env = "WAKATI_GEN_SEED")]
	pub seed: Option<u64>,

	/// Write the trained model to this file
	#[arg(long)]
	pub save_model: Option<PathBuf>,

	/// Load a trained model instead of reading a corpus
	#[arg(long, conflicts_with = "filename")]
	pub load_model: Option<PathBuf>,

	/// Stop at the first sentence that cannot be generated
	#[arg(long)]
	pub fail_fast: bool,

	/// Verbosity (-v info, -vv debug, -vvv trace)
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Only log errors (overrides verbose)
	#[arg(short, long)]
	pub quiet: bool,
}

impl Args {
	/// Log level derived from `-v` / `-q`.
	pub fn log_level(&self) -> LevelFilter {
		if self.quiet {
			return LevelFilter::Error;
		}
		match self.verbose {
			0 => LevelFilter::Warn,
			1 => LevelFilter::Info,
			2 => LevelFilter::Debug,
			_ => LevelFilter::Trace,
		}
	}
}

/// Available segmenters.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerKind {
	/// Dictionary-free, cuts on script changes
	Script,
	/// Splits on whitespace only
	Whitespace,
	/// Morphological analysis with IPADIC
	#[cfg(feature = "lindera")]
	Lindera,
}

/// Unicode normalization forms offered on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeForm {
	None,
	Nfc,
	Nfkc,
}

impl From<NormalizeForm> for Normalization {
	fn from(form: NormalizeForm) -> Self {
		match form {
			NormalizeForm::None => Normalization::None,
			NormalizeForm::Nfc => Normalization::Nfc,
			NormalizeForm::Nfkc => Normalization::Nfkc,
		}
	}
}
