//! Dictionary-free segmentation for Japanese text.
//!
//! Japanese has no spaces between words, but script changes are a usable
//! approximation of word boundaries: kanji stems, hiragana particles and
//! inflections, katakana loanwords and latin words tend to alternate.
//! This tokenizer cuts whenever the script changes and isolates every
//! punctuation or symbol character.
//!
//! ```
//! use wakati_gen_core::tokenizer::Tokenizer;
//! use wakati_gen_core::tokenizer::script::ScriptTokenizer;
//!
//! let tokens = ScriptTokenizer::new().tokenize("吾輩は猫である。").unwrap();
//! assert_eq!(tokens, vec!["吾輩", "は", "猫", "である", "。"]);
//! ```

use crate::error::Result;

use super::Tokenizer;

/// Character classes driving the segmentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CharClass {
	Kanji,
	Hiragana,
	Katakana,
	Alnum,
	Symbol,
	/// `ー` / `ｰ`: belongs to the kana run it follows.
	ProlongedMark,
	/// Combining (han)dakuten: glued to whatever precedes it.
	Combining,
	Space,
}

fn classify(c: char) -> CharClass {
	match c {
		c if c.is_whitespace() => CharClass::Space,
		'\u{30FC}' | '\u{FF70}' => CharClass::ProlongedMark,
		'\u{3099}' | '\u{309A}' => CharClass::Combining,
		'\u{3005}'..='\u{3007}'
		| '\u{3400}'..='\u{4DBF}'
		| '\u{4E00}'..='\u{9FFF}'
		| '\u{F900}'..='\u{FAFF}'
		| '\u{20000}'..='\u{2FFFF}' => CharClass::Kanji,
		'\u{3041}'..='\u{3096}' | '\u{309B}'..='\u{309F}' => CharClass::Hiragana,
		'\u{30A1}'..='\u{30FA}'
		| '\u{30FD}'..='\u{30FF}'
		| '\u{31F0}'..='\u{31FF}'
		| '\u{FF66}'..='\u{FF9F}' => CharClass::Katakana,
		c if c.is_alphanumeric() => CharClass::Alnum,
		_ => CharClass::Symbol,
	}
}

/// Splits text on whitespace, script changes and symbols.
///
/// The output is stable: tokenizing a line already produced by this
/// tokenizer yields the same tokens.
#[derive(Clone, Debug, Default)]
pub struct ScriptTokenizer;

impl ScriptTokenizer {
	pub fn new() -> Self {
		ScriptTokenizer
	}
}

impl Tokenizer for ScriptTokenizer {
	fn tokenize(&self, text: &str) -> Result<Vec<String>> {
		let mut tokens = Vec::new();
		let mut current = String::new();
		let mut current_class: Option<CharClass> = None;

		for c in text.chars() {
			let class = match classify(c) {
				CharClass::Space => {
					if !current.is_empty() {
						tokens.push(std::mem::take(&mut current));
					}
					current_class = None;
					continue;
				}
				CharClass::Combining => {
					if current.is_empty() {
						current_class = Some(CharClass::Symbol);
					}
					current.push(c);
					continue;
				}
				CharClass::ProlongedMark => match current_class {
					Some(CharClass::Hiragana) => CharClass::Hiragana,
					_ => CharClass::Katakana,
				},
				class => class,
			};

			let extends = current_class == Some(class) && class != CharClass::Symbol;
			if !extends && !current.is_empty() {
				tokens.push(std::mem::take(&mut current));
			}
			current.push(c);
			current_class = Some(class);
		}

		if !current.is_empty() {
			tokens.push(current);
		}
		Ok(tokens)
	}

	fn name(&self) -> &'static str {
		"script"
	}
}
