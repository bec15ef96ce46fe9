//! Tokenized corpus: the input of the transition model.
//!
//! A corpus is the content of a wakati file: one sentence per line, tokens
//! separated by whitespace. It is read once and never modified.

use std::path::Path;
use std::sync::LazyLock;

use log::{debug, info};
use regex::Regex;

use crate::error::Result;
use crate::io;

/// Lines with stray apostrophes, double quotes, parentheses or brackets.
///
/// Full-width and CJK forms count as their ASCII equivalents: `「」『』【】〔〕`
/// are brackets, `“”＂` double quotes and `‘’＇` apostrophes.
static REJECT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"(^['‘’＇])|(['‘’＇]$)|\s['‘’＇]|['‘’＇]\s|["“”＂()\[\]（）［］「」『』【】〔〕]"#)
		.expect("valid reject pattern")
});

/// Options controlling how lines are accepted into a corpus.
#[derive(Clone, Copy, Debug)]
pub struct CorpusOptions {
	/// Reject lines containing quoting or bracket characters (on by default).
	pub well_formed: bool,
}

impl Default for CorpusOptions {
	fn default() -> Self {
		Self { well_formed: true }
	}
}

/// Counters collected while parsing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CorpusStats {
	pub lines: usize,
	pub blank_lines: usize,
	pub rejected_lines: usize,
	pub tokens: usize,
}

/// An ordered list of tokenized lines.
#[derive(Clone, Debug, Default)]
pub struct Corpus {
	lines: Vec<Vec<String>>,
	stats: CorpusStats,
}

impl Corpus {
	/// Parses wakati text.
	///
	/// - Lines are split on runs of whitespace
	/// - Blank lines are skipped
	/// - With `well_formed`, lines matching the reject pattern are skipped
	pub fn parse(text: &str, options: CorpusOptions) -> Self {
		let mut corpus = Corpus::default();

		for (number, line) in text.lines().enumerate() {
			let trimmed = line.trim();
			if trimmed.is_empty() {
				corpus.stats.blank_lines += 1;
				continue;
			}
			if options.well_formed && REJECT_PATTERN.is_match(trimmed) {
				debug!("line {} rejected as malformed", number + 1);
				corpus.stats.rejected_lines += 1;
				continue;
			}

			let tokens: Vec<String> = trimmed.split_whitespace().map(str::to_owned).collect();
			corpus.stats.tokens += tokens.len();
			corpus.lines.push(tokens);
		}

		corpus.stats.lines = corpus.lines.len();
		corpus
	}

	/// Reads and parses a wakati file.
	pub fn from_file<P: AsRef<Path>>(path: P, options: CorpusOptions) -> Result<Self> {
		let text = io::read_text(&path)?;
		let corpus = Self::parse(&text, options);
		info!(
			"loaded corpus {}: {} lines, {} tokens ({} blank, {} rejected)",
			path.as_ref().display(),
			corpus.stats.lines,
			corpus.stats.tokens,
			corpus.stats.blank_lines,
			corpus.stats.rejected_lines
		);
		Ok(corpus)
	}

	/// Builds a corpus from already split lines (mainly for tests and embedding).
	pub fn from_lines<I, L, T>(lines: I) -> Self
	where
		I: IntoIterator<Item = L>,
		L: IntoIterator<Item = T>,
		T: Into<String>,
	{
		let lines: Vec<Vec<String>> = lines
			.into_iter()
			.map(|line| line.into_iter().map(Into::into).collect::<Vec<String>>())
			.filter(|line| !line.is_empty())
			.collect();
		let stats = CorpusStats {
			lines: lines.len(),
			tokens: lines.iter().map(Vec::len).sum(),
			..Default::default()
		};
		Corpus { lines, stats }
	}

	/// Accepted lines, in input order.
	pub fn lines(&self) -> &[Vec<String>] {
		&self.lines
	}

	/// Counters gathered while parsing.
	pub fn stats(&self) -> CorpusStats {
		self.stats
	}

	/// `true` if no line was accepted.
	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}
}
