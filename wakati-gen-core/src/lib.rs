//! Wakati-gaki segmentation and Markov chain sentence generation.
//!
//! This crate provides:
//! - A tokenizer stage turning raw Japanese text into space separated
//!   tokens, one line per input line
//! - A corpus loader for such tokenized text
//! - A word-level Markov chain (state size 2 by default) with weighted
//!   sampling and an explicit, inspectable transition table
//! - A sentence generator with length bounds, a retry budget and an
//!   injectable random source
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use wakati_gen_core::corpus::{Corpus, CorpusOptions};
//! use wakati_gen_core::model::{GenerateParams, Generator, TextModel};
//!
//! let corpus = Corpus::parse("I like tea\nI like coffee\n", CorpusOptions::default());
//! let model = TextModel::build(&corpus, 2, false).unwrap();
//! let mut rng = StdRng::seed_from_u64(0);
//!
//! let sentence = Generator::new(&model)
//! 	.generate_sentence(&GenerateParams::default(), &mut rng)
//! 	.unwrap();
//! assert!(sentence == "Iliketea" || sentence == "Ilikecoffee");
//! ```

/// Tokenized corpus loading.
pub mod corpus;

/// Error type and `Result` alias.
pub mod error;

/// Markov chain, trained model and sentence generation.
pub mod model;

/// Raw text to wakati segmentation.
pub mod tokenizer;

/// File helpers (UTF-8 checks, line streaming).
///
/// Not exposed
pub(crate) mod io;

pub use error::{Result, WakatiError};
