use std::collections::BTreeMap;

use rand::Rng;

use serde::{Deserialize, Serialize};

/// What may follow a state: another token, or the end of the line.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
	Token(String),
	End,
}

/// Outgoing transitions of one Markov state.
///
/// A `State` is the node reached after a window of `order` tokens. It keeps
/// how many times each outcome was observed right after that window.
///
/// ## Invariants
/// - Every stored count is strictly positive
/// - Outcomes are kept ordered so that a seeded RNG always samples the
///   same way
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
	/// Example: { Token("tea") => 1, Token("coffee") => 1, End => 2 }
	outcomes: BTreeMap<Outcome, usize>,
}

impl State {
	/// Creates a state with no outcome.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one more occurrence of `outcome`.
	pub fn add(&mut self, outcome: Outcome) {
		*self.outcomes.entry(outcome).or_insert(0) += 1;
	}

	/// Observed count of `outcome`, 0 when never seen.
	pub fn count(&self, outcome: &Outcome) -> usize {
		self.outcomes.get(outcome).copied().unwrap_or(0)
	}

	/// Sum of all counts.
	pub fn total(&self) -> usize {
		self.outcomes.values().sum()
	}

	/// `true` if this state was observed to close a line.
	pub fn is_terminal(&self) -> bool {
		self.outcomes.contains_key(&Outcome::End)
	}

	/// `true` when no outcome was ever recorded.
	pub fn is_empty(&self) -> bool {
		self.outcomes.is_empty()
	}

	/// Iterates over `(outcome, count)` pairs in a stable order.
	pub fn outcomes(&self) -> impl Iterator<Item = (&Outcome, usize)> {
		self.outcomes.iter().map(|(outcome, count)| (outcome, *count))
	}

	/// Samples an outcome with probability proportional to its count.
	///
	/// - O(n) scan over the outcomes
	/// - a cumulative subtraction selects the bucket
	///
	/// Returns `None` if the state has no outcome.
	pub fn predict<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Outcome> {
		let total = self.total();
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..total);
		for (outcome, count) in &self.outcomes {
			if r < *count {
				return Some(outcome);
			}
			r -= count;
		}

		// r < total guarantees a bucket was hit
		None
	}
}
