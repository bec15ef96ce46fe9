//! Word-level Markov text model.
//!
//! - [`chain::Chain`]: transition table of a fixed order, built from a corpus
//! - [`text_model::TextModel`]: the chain plus the retained corpus lines,
//!   persisted with postcard
//! - [`params::GenerateParams`]: length bounds, retry budget, start seed
//! - [`generator::Generator`]: bounded-retry sentence generation

/// Fixed-order transition table.
///
/// Handles line ingestion, transition counting, start windows and
/// random walks.
pub mod chain;

/// High-level sentence generation with retries and length checks.
pub mod generator;

/// Generation parameters and start seed strategy.
pub mod params;

/// Outcomes observed after a single window, with weighted sampling.
pub mod state;

/// Trained model: chain, originality check, persistence.
pub mod text_model;

pub use chain::{Chain, DEFAULT_ORDER};
pub use generator::Generator;
pub use params::{GenerateParams, StartSeed};
pub use state::{Outcome, State};
pub use text_model::{Overlap, TextModel};
