use std::fs;

use rand::SeedableRng;
use rand::rngs::StdRng;
use wakati_gen_core::WakatiError;
use wakati_gen_core::corpus::{Corpus, CorpusOptions};
use wakati_gen_core::model::{GenerateParams, Generator, Outcome, TextModel};
use wakati_gen_core::tokenizer::script::ScriptTokenizer;
use wakati_gen_core::tokenizer::whitespace::WhitespaceTokenizer;
use wakati_gen_core::tokenizer::{Normalization, tokenize_file};

const NEKO: &str = "吾輩は猫である。名前はまだ無い。
どこで生れたかとんと見当がつかぬ。
何でも薄暗いじめじめした所でニャーニャー泣いていた事だけは記憶している。
吾輩はここで始めて人間というものを見た。
";

#[test]
fn test_tea_or_coffee_end_to_end() {
	let dir = tempfile::tempdir().unwrap();
	let raw = dir.path().join("raw.txt");
	let wakati = dir.path().join("wakati.txt");
	fs::write(&raw, "I like tea\nI like coffee\n").unwrap();

	tokenize_file(&WhitespaceTokenizer::new(), &raw, &wakati, Normalization::None).unwrap();
	let corpus = Corpus::from_file(&wakati, CorpusOptions::default()).unwrap();
	let model = TextModel::build(&corpus, 2, false).unwrap();

	let start = vec!["I".to_string(), "like".to_string()];
	assert_eq!(model.chain().start_weight(&start), 2);
	let state = model.chain().state(&start).unwrap();
	assert_eq!(state.count(&Outcome::Token("tea".into())), state.count(&Outcome::Token("coffee".into())));

	let mut rng = StdRng::seed_from_u64(2024);
	let sentence = Generator::new(&model).generate_sentence(&GenerateParams::default(), &mut rng).unwrap();
	assert!(sentence == "Iliketea" || sentence == "Ilikecoffee");
}

#[test]
fn test_japanese_pipeline() {
	let dir = tempfile::tempdir().unwrap();
	let raw = dir.path().join("neko.txt");
	let wakati = dir.path().join("wakati.txt");
	fs::write(&raw, NEKO).unwrap();

	let stats = tokenize_file(&ScriptTokenizer::new(), &raw, &wakati, Normalization::Nfkc).unwrap();
	assert_eq!(stats.lines, 4);

	let written = fs::read_to_string(&wakati).unwrap();
	assert_eq!(written.lines().count(), 4);
	assert!(written.starts_with("吾輩 は 猫 である 。"));

	let corpus = Corpus::from_file(&wakati, CorpusOptions::default()).unwrap();
	let model = TextModel::build(&corpus, 2, true).unwrap();
	let generator = Generator::new(&model);
	let mut rng = StdRng::seed_from_u64(7);

	for result in generator.generate_many(5, &GenerateParams::default(), &mut rng) {
		let sentence = result.unwrap();
		assert!(!sentence.contains(' '));
		assert!(sentence.chars().count() <= 100);
	}
}

#[test]
fn test_count_three_keeps_order_and_size() {
	let corpus = Corpus::parse("a b c d\na b d c\nb c a\n", CorpusOptions::default());
	let model = TextModel::build(&corpus, 2, false).unwrap();
	let generator = Generator::new(&model);
	let params = GenerateParams::default();

	let batch: Vec<String> = generator
		.generate_many(3, &params, &mut StdRng::seed_from_u64(3))
		.into_iter()
		.map(Result::unwrap)
		.collect();

	let mut rng = StdRng::seed_from_u64(3);
	let one_by_one: Vec<String> = (0..3).map(|_| generator.generate_sentence(&params, &mut rng).unwrap()).collect();

	assert_eq!(batch.len(), 3);
	assert_eq!(batch, one_by_one);
}

#[test]
fn test_saved_model_generates_the_same() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("model.bin");
	let corpus = Corpus::parse(NEKO_WAKATI, CorpusOptions::default());
	let model = TextModel::build(&corpus, 2, false).unwrap();
	model.save(&path).unwrap();
	let loaded = TextModel::load(&path).unwrap();

	let params = GenerateParams::default();
	let before = Generator::new(&model).generate_many(5, &params, &mut StdRng::seed_from_u64(99));
	let after = Generator::new(&loaded).generate_many(5, &params, &mut StdRng::seed_from_u64(99));

	let before: Vec<String> = before.into_iter().map(Result::unwrap).collect();
	let after: Vec<String> = after.into_iter().map(Result::unwrap).collect();
	assert_eq!(before, after);
}

#[test]
fn test_missing_source_is_fatal() {
	let dir = tempfile::tempdir().unwrap();
	let result = tokenize_file(
		&ScriptTokenizer::new(),
		dir.path().join("missing.txt"),
		dir.path().join("wakati.txt"),
		Normalization::None,
	);
	assert!(matches!(result, Err(WakatiError::FileNotFound(_))));
	assert!(matches!(
		Corpus::from_file(dir.path().join("missing.txt"), CorpusOptions::default()),
		Err(WakatiError::FileNotFound(_))
	));
}

const NEKO_WAKATI: &str = "吾輩 は 猫 で ある 。
名前 は まだ 無い 。
吾輩 は ここ で 始め て 人間 という もの を 見 た 。
";
