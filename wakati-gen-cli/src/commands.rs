//! Pipeline driven by the command line: tokenize, train, generate.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use wakati_gen_core::corpus::{Corpus, CorpusOptions};
use wakati_gen_core::model::{GenerateParams, Generator, Overlap, StartSeed, TextModel};
use wakati_gen_core::tokenizer::script::ScriptTokenizer;
use wakati_gen_core::tokenizer::whitespace::WhitespaceTokenizer;
use wakati_gen_core::tokenizer::{Tokenizer, tokenize_file};
use wakati_gen_core::{Result as CoreResult, WakatiError};

use crate::args::{Args, TokenizerKind};

/// What happened to the requested sentences.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
	pub generated: usize,
	pub failed: usize,
}

/// Runs the whole pipeline.
///
/// Sentences go to `out`, per-sentence failures to `err`. File-level
/// problems are returned as errors; sentence failures only show up in the
/// returned [`Summary`].
pub fn run<O: Write, E: Write>(args: &Args, out: &mut O, err: &mut E) -> anyhow::Result<Summary> {
	let model = load_model(args)?;

	if let Some(path) = &args.save_model {
		model.save(path).with_context(|| format!("cannot save model to {}", path.display()))?;
	}

	let params = build_params(args)?;
	if params.overlap().is_some() && !model.retains_original() {
		bail!("--novel needs a model trained with its original lines (re-save it with --novel or --save-model)");
	}

	let mut rng = match args.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};
	let generator = Generator::new(&model);
	let mut summary = Summary::default();

	if args.fail_fast {
		for index in 0..args.count {
			let result = generator.generate_sentence(&params, &mut rng);
			if !report(index, result, out, err, &mut summary)? {
				break;
			}
		}
	} else {
		for (index, result) in generator.generate_many(args.count, &params, &mut rng).into_iter().enumerate() {
			report(index, result, out, err, &mut summary)?;
		}
	}

	info!("{} sentences generated, {} failed", summary.generated, summary.failed);
	Ok(summary)
}

/// Writes one result; returns `false` when the sentence failed.
fn report<O: Write, E: Write>(
	index: usize,
	result: CoreResult<String>,
	out: &mut O,
	err: &mut E,
	summary: &mut Summary,
) -> anyhow::Result<bool> {
	match result {
		Ok(sentence) => {
			writeln!(out, "{}", sentence)?;
			summary.generated += 1;
			Ok(true)
		}
		Err(e) if e.is_per_sentence() => {
			warn!("sentence {} failed: {}", index + 1, e);
			writeln!(err, "sentence {}: {}", index + 1, e)?;
			summary.failed += 1;
			Ok(false)
		}
		Err(e) => Err(e.into()),
	}
}

/// Loads a saved model, or tokenizes and trains from the source file.
fn load_model(args: &Args) -> anyhow::Result<TextModel> {
	if let Some(path) = &args.load_model {
		return TextModel::load(path).with_context(|| format!("cannot load model {}", path.display()));
	}

	let Some(source) = &args.filename else {
		bail!("either --filename or --load-model is required");
	};

	let corpus_path: &Path = if args.markov_only {
		source
	} else {
		let tokenizer = make_tokenizer(args.tokenizer)?;
		let stats = tokenize_file(tokenizer.as_ref(), source, &args.wakati_filename, args.normalize.into())
			.with_context(|| format!("cannot tokenize {}", source.display()))?;
		info!("{} lines written to {}", stats.lines, args.wakati_filename.display());
		&args.wakati_filename
	};

	let corpus = Corpus::from_file(corpus_path, CorpusOptions { well_formed: !args.keep_malformed })
		.with_context(|| format!("cannot read corpus {}", corpus_path.display()))?;
	let retain_original = args.novel || args.save_model.is_some();
	Ok(TextModel::build(&corpus, args.order, retain_original)?)
}

fn make_tokenizer(kind: TokenizerKind) -> CoreResult<Box<dyn Tokenizer>> {
	let tokenizer: Box<dyn Tokenizer> = match kind {
		TokenizerKind::Script => Box::new(ScriptTokenizer::new()),
		TokenizerKind::Whitespace => Box::new(WhitespaceTokenizer::new()),
		#[cfg(feature = "lindera")]
		TokenizerKind::Lindera => Box::new(wakati_gen_core::tokenizer::lindera::LinderaTokenizer::ipadic()?),
	};
	Ok(tokenizer)
}

fn build_params(args: &Args) -> Result<GenerateParams, WakatiError> {
	let mut params = GenerateParams::new(args.max_chars, args.max_words, args.tries)?;
	params.min_chars = args.min_chars;
	params.min_words = args.min_words;
	params.joiner = args.joiner.clone();
	if let Some(start) = &args.start {
		params.start = StartSeed::parse(start);
	}
	if args.novel {
		params.set_overlap(Some(Overlap::new(args.max_overlap_ratio, args.max_overlap_total)?));
	}
	params.validate()?;
	Ok(params)
}
