use std::collections::BTreeMap;

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Outcome, State};
use crate::corpus::Corpus;
use crate::error::{Result, WakatiError};

/// Default Markov state size.
pub const DEFAULT_ORDER: usize = 2;

/// Word-level Markov chain of a fixed order.
///
/// Each state is a window of `order` consecutive tokens taken from a single
/// corpus line. The chain also keeps how often each window opened a line,
/// which is the distribution sentences start from.
///
/// # Invariants
/// - `order >= 1`
/// - Every key of `states` and `starts` has exactly `order` tokens
/// - Only windows and outcomes observed in the corpus are stored, with
///   counts >= 1
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Chain {
	order: usize,
	/// Window -> outcomes observed right after it.
	states: BTreeMap<Vec<String>, State>,
	/// Opening window of a line -> number of lines it opened.
	starts: BTreeMap<Vec<String>, usize>,
	/// Lines too short to contribute.
	short_lines: usize,
}

/// Why a walk stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkEnd {
	/// The `End` outcome was sampled.
	Terminal,
	/// The current window has no outcome.
	DeadEnd,
	/// The walk grew past the requested token limit.
	Limit,
}

/// Tokens produced by [`Chain::walk`], start window included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Walk {
	pub tokens: Vec<String>,
	pub end: WalkEnd,
}

impl Chain {
	/// Creates an empty chain of order `order`.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `order < 1`.
	pub fn new(order: usize) -> Result<Self> {
		if order < 1 {
			return Err(WakatiError::InvalidOrder(order));
		}
		Ok(Self { order, states: BTreeMap::new(), starts: BTreeMap::new(), short_lines: 0 })
	}

	/// Builds a chain from every line of `corpus`.
	pub fn build(corpus: &Corpus, order: usize) -> Result<Self> {
		let mut chain = Self::new(order)?;
		for line in corpus.lines() {
			chain.add_line(line);
		}
		debug!(
			"chain of order {} built: {} states, {} starts, {} short lines",
			order,
			chain.states.len(),
			chain.starts.len(),
			chain.short_lines
		);
		Ok(chain)
	}

	/// Adds one line to the chain.
	///
	/// Lines with fewer than `order + 1` tokens contribute nothing: no
	/// start, no transition, no end. Returns whether the line was used.
	pub fn add_line(&mut self, tokens: &[String]) -> bool {
		if tokens.len() < self.order + 1 {
			self.short_lines += 1;
			return false;
		}

		*self.starts.entry(tokens[..self.order].to_vec()).or_insert(0) += 1;

		for (i, window) in tokens.windows(self.order).enumerate() {
			let outcome = match tokens.get(i + self.order) {
				Some(next) => Outcome::Token(next.clone()),
				None => Outcome::End,
			};
			self.states.entry(window.to_vec()).or_default().add(outcome);
		}
		true
	}

	/// State size, in tokens.
	pub fn order(&self) -> usize {
		self.order
	}

	/// `true` when no line contributed, i.e. nothing can be generated.
	pub fn is_empty(&self) -> bool {
		self.starts.is_empty()
	}

	/// Number of distinct observed states.
	pub fn state_count(&self) -> usize {
		self.states.len()
	}

	/// Number of distinct start states.
	pub fn start_count(&self) -> usize {
		self.starts.len()
	}

	/// Number of distinct (state, outcome) pairs.
	pub fn transition_count(&self) -> usize {
		self.states.values().map(|s| s.outcomes().count()).sum()
	}

	/// Lines skipped for having no more than `order` tokens.
	pub fn short_lines(&self) -> usize {
		self.short_lines
	}

	/// Outcomes observed after `window`.
	pub fn state(&self, window: &[String]) -> Option<&State> {
		self.states.get(window)
	}

	/// Number of lines opened by `window`.
	pub fn start_weight(&self, window: &[String]) -> usize {
		self.starts.get(window).copied().unwrap_or(0)
	}

	/// `true` if `outcome` was observed right after `window`.
	pub fn has_transition(&self, window: &[String], outcome: &Outcome) -> bool {
		self.state(window).is_some_and(|s| s.count(outcome) > 0)
	}

	/// Samples a start window, weighted by how many lines it opened.
	pub fn random_start<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&[String]> {
		sample_weighted(self.starts.iter().map(|(k, w)| (k, *w)), rng).map(Vec::as_slice)
	}

	/// Samples a start window whose first tokens are `prefix`.
	pub fn random_start_with<R: Rng + ?Sized>(&self, prefix: &[String], rng: &mut R) -> Option<&[String]> {
		let matching = self
			.starts
			.iter()
			.filter(|(window, _)| window.starts_with(prefix))
			.map(|(k, w)| (k, *w));
		sample_weighted(matching, rng).map(Vec::as_slice)
	}

	/// `true` if some line opened with `prefix`.
	pub fn has_start_with(&self, prefix: &[String]) -> bool {
		self.starts.keys().any(|window| window.starts_with(prefix))
	}

	/// Walks the chain from `start` until an end is sampled.
	///
	/// The walk is abandoned with [`WalkEnd::Limit`] as soon as it holds
	/// more than `max_tokens` tokens.
	pub fn walk<R: Rng + ?Sized>(&self, start: &[String], max_tokens: usize, rng: &mut R) -> Walk {
		let mut tokens = start.to_vec();
		if tokens.len() < self.order {
			return Walk { tokens, end: WalkEnd::DeadEnd };
		}

		loop {
			if tokens.len() > max_tokens {
				return Walk { tokens, end: WalkEnd::Limit };
			}
			let window = &tokens[tokens.len() - self.order..];
			match self.states.get(window).and_then(|state| state.predict(rng)) {
				Some(Outcome::Token(next)) => {
					let next = next.clone();
					tokens.push(next);
				}
				Some(Outcome::End) => return Walk { tokens, end: WalkEnd::Terminal },
				None => return Walk { tokens, end: WalkEnd::DeadEnd },
			}
		}
	}
}

/// Picks one key with probability proportional to its weight.
fn sample_weighted<'a, K, I, R>(items: I, rng: &mut R) -> Option<&'a K>
where
	I: Iterator<Item = (&'a K, usize)> + Clone,
	R: Rng + ?Sized,
{
	let total: usize = items.clone().map(|(_, w)| w).sum();
	if total == 0 {
		return None;
	}

	let mut r = rng.random_range(0..total);
	for (key, weight) in items {
		if r < weight {
			return Some(key);
		}
		r -= weight;
	}
	None
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn s(tokens: &[&str]) -> Vec<String> {
		tokens.iter().map(|t| t.to_string()).collect()
	}

	fn tea_chain() -> Chain {
		let corpus = Corpus::from_lines(vec![vec!["I", "like", "tea"], vec!["I", "like", "coffee"]]);
		Chain::build(&corpus, 2).unwrap()
	}

	#[test]
	fn test_order_zero_is_rejected() {
		assert!(matches!(Chain::new(0), Err(WakatiError::InvalidOrder(0))));
	}

	#[test]
	fn test_tea_and_coffee() {
		let chain = tea_chain();

		assert_eq!(chain.start_count(), 1);
		assert_eq!(chain.start_weight(&s(&["I", "like"])), 2);

		let state = chain.state(&s(&["I", "like"])).unwrap();
		assert_eq!(state.count(&Outcome::Token("tea".into())), 1);
		assert_eq!(state.count(&Outcome::Token("coffee".into())), 1);
		assert!(!state.is_terminal());

		assert!(chain.state(&s(&["like", "tea"])).unwrap().is_terminal());
		assert!(chain.state(&s(&["like", "coffee"])).unwrap().is_terminal());
		assert_eq!(chain.state_count(), 3);
		assert_eq!(chain.transition_count(), 4);
	}

	#[test]
	fn test_lines_do_not_span() {
		let chain = tea_chain();
		// "tea" never precedes "I": the second line starts fresh
		assert!(chain.state(&s(&["tea", "I"])).is_none());
		assert!(!chain.has_transition(&s(&["like", "tea"]), &Outcome::Token("I".into())));
	}

	#[test]
	fn test_short_lines_are_skipped() {
		let corpus = Corpus::from_lines(vec![vec!["a"], vec!["a", "b"], vec!["x", "y", "z"]]);
		let chain = Chain::build(&corpus, 2).unwrap();

		assert_eq!(chain.short_lines(), 2);
		assert_eq!(chain.start_count(), 1);
		assert!(chain.state(&s(&["a", "b"])).is_none());
	}

	#[test]
	fn test_insufficient_corpus_is_empty() {
		let corpus = Corpus::from_lines(vec![vec!["only", "two"]]);
		let chain = Chain::build(&corpus, 2).unwrap();
		assert!(chain.is_empty());
		assert_eq!(chain.transition_count(), 0);

		let mut rng = StdRng::seed_from_u64(0);
		assert!(chain.random_start(&mut rng).is_none());
	}

	#[test]
	fn test_order_one() {
		let corpus = Corpus::from_lines(vec![vec!["a", "b", "a", "c"]]);
		let chain = Chain::build(&corpus, 1).unwrap();

		let a = chain.state(&s(&["a"])).unwrap();
		assert_eq!(a.count(&Outcome::Token("b".into())), 1);
		assert_eq!(a.count(&Outcome::Token("c".into())), 1);
		assert!(chain.state(&s(&["c"])).unwrap().is_terminal());
	}

	#[test]
	fn test_walk_reaches_terminal() {
		let chain = tea_chain();
		let mut rng = StdRng::seed_from_u64(3);

		let start = chain.random_start(&mut rng).unwrap().to_vec();
		let walk = chain.walk(&start, 20, &mut rng);

		assert_eq!(walk.end, WalkEnd::Terminal);
		assert!(walk.tokens == s(&["I", "like", "tea"]) || walk.tokens == s(&["I", "like", "coffee"]));
	}

	#[test]
	fn test_walk_limit() {
		let corpus = Corpus::from_lines(vec![vec!["a", "b", "c", "d", "e"]]);
		let chain = Chain::build(&corpus, 2).unwrap();
		let mut rng = StdRng::seed_from_u64(3);

		let walk = chain.walk(&s(&["a", "b"]), 3, &mut rng);
		assert_eq!(walk.end, WalkEnd::Limit);
		assert_eq!(walk.tokens, s(&["a", "b", "c", "d"]));
	}

	#[test]
	fn test_walk_dead_end() {
		let chain = tea_chain();
		let mut rng = StdRng::seed_from_u64(3);

		let walk = chain.walk(&s(&["never", "seen"]), 20, &mut rng);
		assert_eq!(walk.end, WalkEnd::DeadEnd);
		assert_eq!(walk.tokens, s(&["never", "seen"]));
	}

	#[test]
	fn test_random_start_with_prefix() {
		let corpus = Corpus::from_lines(vec![
			vec!["猫", "が", "鳴く"],
			vec!["猫", "は", "寝る"],
			vec!["犬", "が", "走る"],
		]);
		let chain = Chain::build(&corpus, 2).unwrap();
		let mut rng = StdRng::seed_from_u64(11);

		for _ in 0..20 {
			let start = chain.random_start_with(&s(&["猫"]), &mut rng).unwrap();
			assert_eq!(start[0], "猫");
		}
		assert!(chain.random_start_with(&s(&["鳥"]), &mut rng).is_none());
		assert!(chain.has_start_with(&s(&["犬"])));
		assert!(!chain.has_start_with(&s(&["が"])));
	}
}
