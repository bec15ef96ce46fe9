use log::{debug, trace};
use rand::Rng;

use super::chain::WalkEnd;
use super::params::{GenerateParams, StartSeed};
use super::text_model::TextModel;
use crate::error::{Result, WakatiError};

/// Resolved start strategy for one sentence.
#[derive(Clone, Copy)]
enum Start<'a> {
	Random,
	Fixed(&'a [String]),
	Prefix(&'a [String]),
}

/// Sentence generation over a trained [`TextModel`].
///
/// # Responsibilities
/// - Pick a start window (random or seeded)
/// - Walk the chain until a line end is sampled
/// - Retry until a sentence fits the length bounds (and, optionally, is
///   original enough) or the retry budget is spent
///
/// The model is only read; all randomness comes from the RNG passed to
/// each call, so a seeded RNG gives reproducible output.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'m> {
	model: &'m TextModel,
}

impl<'m> Generator<'m> {
	/// Wraps a trained model.
	pub fn new(model: &'m TextModel) -> Self {
		Self { model }
	}

	/// Generates the tokens of one sentence.
	///
	/// # Errors
	/// - `InvalidParameter` / `OriginalTextUnavailable` for unusable params
	/// - `InsufficientCorpus` if the model has no start window
	/// - `UnknownSeed` if a custom start matches nothing
	/// - `GenerationExhausted` if every try was rejected
	pub fn generate_tokens<R: Rng + ?Sized>(&self, params: &GenerateParams, rng: &mut R) -> Result<Vec<String>> {
		params.validate()?;
		if params.overlap().is_some() && !self.model.retains_original() {
			return Err(WakatiError::OriginalTextUnavailable);
		}

		let chain = self.model.chain();
		if chain.is_empty() {
			return Err(WakatiError::InsufficientCorpus);
		}

		let start = self.resolve_start(&params.start)?;

		for attempt in 1..=params.max_tries {
			let window = match start {
				Start::Random => chain.random_start(rng),
				Start::Fixed(tokens) => Some(tokens),
				Start::Prefix(prefix) => chain.random_start_with(prefix, rng),
			};
			let Some(window) = window else {
				// non-empty chains always have a start
				return Err(WakatiError::InsufficientCorpus);
			};

			let walk = chain.walk(window, params.max_words(), rng);
			if walk.end == WalkEnd::Limit {
				trace!("try {}: more than {} words", attempt, params.max_words());
				continue;
			}

			let chars: usize = walk.tokens.iter().map(|t| t.chars().count()).sum::<usize>()
				+ params.joiner.chars().count() * walk.tokens.len().saturating_sub(1);
			if !params.accepts_length(walk.tokens.len(), chars) {
				trace!("try {}: {} words, {} chars out of bounds", attempt, walk.tokens.len(), chars);
				continue;
			}

			if let Some(overlap) = params.overlap() {
				if !self.model.is_original(&walk.tokens, overlap)? {
					trace!("try {}: too close to the corpus", attempt);
					continue;
				}
			}

			debug!("sentence accepted after {} tries", attempt);
			return Ok(walk.tokens);
		}

		Err(WakatiError::GenerationExhausted { tries: params.max_tries })
	}

	/// Generates one sentence, tokens joined with `params.joiner`.
	pub fn generate_sentence<R: Rng + ?Sized>(&self, params: &GenerateParams, rng: &mut R) -> Result<String> {
		self.generate_tokens(params, rng).map(|tokens| tokens.join(params.joiner.as_str()))
	}

	/// Generates `count` sentences independently.
	///
	/// Always returns exactly `count` results in request order; a failed
	/// sentence does not stop the batch.
	pub fn generate_many<R: Rng + ?Sized>(
		&self,
		count: usize,
		params: &GenerateParams,
		rng: &mut R,
	) -> Vec<Result<String>> {
		(0..count).map(|_| self.generate_sentence(params, rng)).collect()
	}

	fn resolve_start<'s>(&self, seed: &'s StartSeed) -> Result<Start<'s>> {
		let chain = self.model.chain();
		match seed {
			StartSeed::Random => Ok(Start::Random),
			StartSeed::Custom(tokens) if tokens.len() == chain.order() => {
				if chain.state(tokens).is_some() {
					Ok(Start::Fixed(tokens))
				} else {
					Err(WakatiError::UnknownSeed(tokens.clone()))
				}
			}
			StartSeed::Custom(tokens) if !tokens.is_empty() && tokens.len() < chain.order() => {
				if chain.has_start_with(tokens) {
					Ok(Start::Prefix(tokens))
				} else {
					Err(WakatiError::UnknownSeed(tokens.clone()))
				}
			}
			StartSeed::Custom(tokens) => Err(WakatiError::UnknownSeed(tokens.clone())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::corpus::Corpus;
	use crate::model::text_model::Overlap;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn s(tokens: &[&str]) -> Vec<String> {
		tokens.iter().map(|t| t.to_string()).collect()
	}

	fn tea_model() -> TextModel {
		let corpus = Corpus::from_lines(vec![vec!["I", "like", "tea"], vec!["I", "like", "coffee"]]);
		TextModel::build(&corpus, 2, true).unwrap()
	}

	#[test]
	fn test_tea_or_coffee() {
		let model = tea_model();
		let generator = Generator::new(&model);
		let mut rng = StdRng::seed_from_u64(1);

		let mut seen = std::collections::HashSet::new();
		for _ in 0..50 {
			let sentence = generator.generate_sentence(&GenerateParams::default(), &mut rng).unwrap();
			assert!(sentence == "Iliketea" || sentence == "Ilikecoffee", "got {}", sentence);
			seen.insert(sentence);
		}
		assert_eq!(seen.len(), 2);
	}

	#[test]
	fn test_joiner() {
		let model = tea_model();
		let mut params = GenerateParams::default();
		params.joiner = " ".into();
		let mut rng = StdRng::seed_from_u64(1);

		let sentence = Generator::new(&model).generate_sentence(&params, &mut rng).unwrap();
		assert!(sentence.starts_with("I like "));
	}

	#[test]
	fn test_insufficient_corpus() {
		let corpus = Corpus::from_lines(vec![vec!["I", "like"]]);
		let model = TextModel::build(&corpus, 2, false).unwrap();
		let mut rng = StdRng::seed_from_u64(1);

		let result = Generator::new(&model).generate_sentence(&GenerateParams::default(), &mut rng);
		assert!(matches!(result, Err(WakatiError::InsufficientCorpus)));
	}

	#[test]
	fn test_exhausted_when_too_long() {
		let model = tea_model();
		// "Iliketea" has 8 characters
		let params = GenerateParams::new(5, 20, 10).unwrap();
		let mut rng = StdRng::seed_from_u64(1);

		let result = Generator::new(&model).generate_sentence(&params, &mut rng);
		assert!(matches!(result, Err(WakatiError::GenerationExhausted { tries: 10 })));
	}

	#[test]
	fn test_zero_tries() {
		let model = tea_model();
		let params = GenerateParams::new(100, 20, 0).unwrap();
		let mut rng = StdRng::seed_from_u64(1);

		let result = Generator::new(&model).generate_sentence(&params, &mut rng);
		assert!(matches!(result, Err(WakatiError::GenerationExhausted { tries: 0 })));
	}

	#[test]
	fn test_word_limit() {
		let model = tea_model();
		let params = GenerateParams::new(100, 2, 5).unwrap();
		let mut rng = StdRng::seed_from_u64(1);

		let result = Generator::new(&model).generate_sentence(&params, &mut rng);
		assert!(matches!(result, Err(WakatiError::GenerationExhausted { .. })));
	}

	#[test]
	fn test_min_chars_filters() {
		let model = tea_model();
		// only "Ilikecoffee" (11 chars) is long enough
		let mut params = GenerateParams::default();
		params.min_chars = 10;
		let mut rng = StdRng::seed_from_u64(9);

		for _ in 0..10 {
			let sentence = Generator::new(&model).generate_sentence(&params, &mut rng).unwrap();
			assert_eq!(sentence, "Ilikecoffee");
		}
	}

	#[test]
	fn test_custom_seed() {
		let corpus = Corpus::from_lines(vec![
			vec!["猫", "が", "鳴く", "夜"],
			vec!["犬", "が", "走る", "朝"],
		]);
		let model = TextModel::build(&corpus, 2, false).unwrap();
		let generator = Generator::new(&model);
		let mut rng = StdRng::seed_from_u64(5);

		let mut params = GenerateParams::default();
		params.start = StartSeed::Custom(s(&["が", "走る"]));
		assert_eq!(generator.generate_sentence(&params, &mut rng).unwrap(), "が走る朝");

		params.start = StartSeed::Custom(s(&["猫"]));
		assert_eq!(generator.generate_sentence(&params, &mut rng).unwrap(), "猫が鳴く夜");

		params.start = StartSeed::Custom(s(&["鳥"]));
		assert!(matches!(generator.generate_sentence(&params, &mut rng), Err(WakatiError::UnknownSeed(_))));

		params.start = StartSeed::Custom(s(&["猫", "が", "鳴く"]));
		assert!(matches!(generator.generate_sentence(&params, &mut rng), Err(WakatiError::UnknownSeed(_))));
	}

	#[test]
	fn test_originality_rejects_copies() {
		let model = tea_model();
		let mut params = GenerateParams::default();
		params.set_overlap(Some(Overlap::default()));
		params.max_tries = 20;
		let mut rng = StdRng::seed_from_u64(1);

		// every possible output is a corpus line
		let result = Generator::new(&model).generate_sentence(&params, &mut rng);
		assert!(matches!(result, Err(WakatiError::GenerationExhausted { tries: 20 })));
	}

	#[test]
	fn test_originality_accepts_novel_sentence() {
		let corpus = Corpus::from_lines(vec![vec!["a", "b", "c"], vec!["b", "c", "d", "e"]]);
		let model = TextModel::build(&corpus, 2, true).unwrap();
		let mut params = GenerateParams::default();
		params.set_overlap(Some(Overlap::default()));
		params.max_tries = 200;
		let mut rng = StdRng::seed_from_u64(1);

		// "abc", "bc" and "bcde" copy a line; only "abcde" is new
		for _ in 0..5 {
			let sentence = Generator::new(&model).generate_sentence(&params, &mut rng).unwrap();
			assert_eq!(sentence, "abcde");
		}
	}

	#[test]
	fn test_originality_needs_retained_lines() {
		let corpus = Corpus::from_lines(vec![vec!["I", "like", "tea"]]);
		let model = TextModel::build(&corpus, 2, false).unwrap();
		let mut params = GenerateParams::default();
		params.set_overlap(Some(Overlap::default()));
		let mut rng = StdRng::seed_from_u64(1);

		let result = Generator::new(&model).generate_sentence(&params, &mut rng);
		assert!(matches!(result, Err(WakatiError::OriginalTextUnavailable)));
	}

	#[test]
	fn test_generate_many_keeps_count() {
		let model = tea_model();
		let mut rng = StdRng::seed_from_u64(1);

		let results = Generator::new(&model).generate_many(3, &GenerateParams::default(), &mut rng);
		assert_eq!(results.len(), 3);
		assert!(results.iter().all(|r| r.is_ok()));
	}

	#[test]
	fn test_generate_many_reports_per_item() {
		let corpus = Corpus::from_lines(vec![vec!["too", "short"]]);
		let model = TextModel::build(&corpus, 2, false).unwrap();
		let mut rng = StdRng::seed_from_u64(1);

		let results = Generator::new(&model).generate_many(4, &GenerateParams::default(), &mut rng);
		assert_eq!(results.len(), 4);
		assert!(results.iter().all(|r| matches!(r, Err(WakatiError::InsufficientCorpus))));
	}

	#[test]
	fn test_seeded_runs_are_reproducible() {
		let corpus = Corpus::from_lines(vec![
			vec!["a", "b", "c", "d"],
			vec!["a", "b", "d", "c"],
			vec!["b", "c", "a", "b", "c", "d"],
		]);
		let model = TextModel::build(&corpus, 2, false).unwrap();
		let generator = Generator::new(&model);
		let params = GenerateParams::default();

		let first = generator.generate_many(10, &params, &mut StdRng::seed_from_u64(77));
		let second = generator.generate_many(10, &params, &mut StdRng::seed_from_u64(77));
		let first: Vec<_> = first.into_iter().map(|r| r.unwrap()).collect();
		let second: Vec<_> = second.into_iter().map(|r| r.unwrap()).collect();
		assert_eq!(first, second);
	}
}
