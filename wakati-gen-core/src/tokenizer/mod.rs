//! Wakati-gaki: segmentation of raw text into space separated tokens.
//!
//! The tokenizer stage reads a raw text file line by line and writes an
//! intermediate file with exactly one line per input line, tokens separated
//! by a single space. The generator never needs to know how tokens were
//! chosen, only that segmentation is deterministic and keeps line order.
//!
//! # Available tokenizers
//!
//! - [`script::ScriptTokenizer`]: dictionary-free, splits on script changes
//! - [`whitespace::WhitespaceTokenizer`]: splits on whitespace only
//! - `lindera::LinderaTokenizer`: morphological analysis (feature `lindera`)

use std::io::Write;
use std::path::Path;

use log::{debug, info};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Result, WakatiError};
use crate::io;

pub mod script;
pub mod whitespace;

#[cfg(feature = "lindera")]
pub mod lindera;

/// Separator written between tokens of a wakati line.
pub const BOUNDARY: char = ' ';

/// Splits one line of raw text into tokens.
///
/// Implementations must be deterministic: the same input line always
/// yields the same tokens. Returned tokens never contain whitespace.
pub trait Tokenizer: Send + Sync {
	/// Tokenizes a single line (without its line terminator).
	fn tokenize(&self, text: &str) -> Result<Vec<String>>;

	/// Short identifier used in logs.
	fn name(&self) -> &'static str;
}

/// Unicode normalization applied to a line before tokenization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Normalization {
	#[default]
	None,
	Nfc,
	Nfkc,
}

impl Normalization {
	/// Applies the normalization form to `text`.
	pub fn apply(self, text: &str) -> String {
		match self {
			Normalization::None => text.to_owned(),
			Normalization::Nfc => text.nfc().collect(),
			Normalization::Nfkc => text.nfkc().collect(),
		}
	}
}

/// Counters returned by [`tokenize_file`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenizeStats {
	/// Lines read (and written).
	pub lines: usize,
	/// Tokens written over all lines.
	pub tokens: usize,
	/// Lines that produced no token.
	pub empty_lines: usize,
}

/// Tokenizes one line and joins the tokens with [`BOUNDARY`].
pub fn wakati_line(tokenizer: &dyn Tokenizer, line: &str, normalization: Normalization) -> Result<String> {
	let normalized = normalization.apply(line);
	let tokens = tokenizer.tokenize(&normalized)?;
	Ok(join_tokens(&tokens))
}

fn join_tokens(tokens: &[String]) -> String {
	let mut out = String::with_capacity(tokens.iter().map(|t| t.len() + 1).sum());
	for (i, token) in tokens.iter().enumerate() {
		if i > 0 {
			out.push(BOUNDARY);
		}
		out.push_str(token);
	}
	out
}

/// Tokenizes `input` into `output`, one line per input line.
///
/// - Line order is preserved, blank lines stay blank
/// - Every written line is terminated by `\n`
/// - The output file is created or truncated, only once the input is open
///
/// # Errors
/// - `FileNotFound` / `InvalidEncoding` for an unreadable input
/// - `InvalidParameter` if `output` is the input file itself
pub fn tokenize_file<PI, PO>(
	tokenizer: &dyn Tokenizer,
	input: PI,
	output: PO,
	normalization: Normalization,
) -> Result<TokenizeStats>
where
	PI: AsRef<Path>,
	PO: AsRef<Path>,
{
	let reader = io::open_reader(&input)?;
	if io::same_file(&input, &output)? {
		return Err(WakatiError::invalid_parameter(format!(
			"tokenizer output {} is the input file",
			output.as_ref().display()
		)));
	}
	let mut writer = io::create_writer(&output)?;
	let mut stats = TokenizeStats::default();

	io::read_lines(reader, &input, |number, line| {
		let normalized = normalization.apply(line);
		let tokens = tokenizer.tokenize(&normalized)?;
		if tokens.is_empty() {
			debug!("line {} produced no token", number);
			stats.empty_lines += 1;
		}
		stats.lines += 1;
		stats.tokens += tokens.len();
		writeln!(writer, "{}", join_tokens(&tokens))?;
		Ok(())
	})?;

	writer.flush()?;
	info!(
		"{} tokenized {} lines into {} tokens ({} -> {})",
		tokenizer.name(),
		stats.lines,
		stats.tokens,
		input.as_ref().display(),
		output.as_ref().display()
	);
	Ok(stats)
}
