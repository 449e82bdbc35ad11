//! Add-k smoothed conditional probabilities.
//!
//! For a context `c` of length n and a next word `w`:
//!
//! ```text
//! P(w | c) = (count(c ++ w) + k) / (count(c) + k * V)
//! ```
//!
//! where the counts come from the order-(n+1) and order-n tables and `V` is
//! the vocabulary size. Unseen contexts and unseen words degrade to `1 / V`
//! instead of zero.

use serde::Serialize;

use super::frequency_table::FrequencyTable;
use super::vocabulary::Vocabulary;
use crate::error::{NGramError, check_smoothing};

/// Next-word probabilities for a fixed context.
///
/// Entries follow the vocabulary enumeration order, END and UNKNOWN last.
/// Serializes as a list of `[word, probability]` pairs.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Distribution {
	entries: Vec<(String, f64)>,
}

impl Distribution {
	/// Probability of `word`, `None` if it is not part of the distribution.
	pub fn get(&self, word: &str) -> Option<f64> {
		self.entries.iter().find(|(w, _)| w == word).map(|(_, p)| *p)
	}

	/// Iterates over `(word, probability)` in enumeration order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
		self.entries.iter().map(|(w, p)| (w.as_str(), *p))
	}

	/// Number of entries, the extended vocabulary size.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True when the distribution has no entry.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Sum of all probabilities.
	///
	/// 1 for tables built from the same corpus, unless the context ends with
	/// END: no window ever extends END, so that mass is never observed.
	pub fn sum(&self) -> f64 {
		self.entries.iter().map(|(_, p)| p).sum()
	}

	/// The `count` most probable entries, highest first.
	///
	/// Equal probabilities keep their enumeration order.
	pub fn top(&self, count: usize) -> Vec<(&str, f64)> {
		let mut sorted: Vec<(&str, f64)> = self.iter().collect();
		sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
		sorted.truncate(count);
		sorted
	}

	/// The `count` most probable entries as a distribution of their own,
	/// highest first. The result is a view and does not sum to 1.
	pub fn most_probable(&self, count: usize) -> Distribution {
		let entries = self.top(count).into_iter().map(|(w, p)| (w.to_owned(), p)).collect();
		Distribution { entries }
	}
}

/// Validated estimation inputs shared by the public operations.
pub(crate) struct Estimator<'a> {
	counts_n: &'a FrequencyTable,
	counts_n1: &'a FrequencyTable,
	vocabulary_size: usize,
	k: f64,
}

impl<'a> Estimator<'a> {
	/// # Errors
	/// - [`NGramError::InvalidVocabulary`] if `vocabulary_size` is 0
	/// - [`NGramError::InvalidSmoothing`] if `k` is not positive
	/// - [`NGramError::MalformedCounts`] if the tables are not of orders n and n+1
	pub(crate) fn new(
		counts_n: &'a FrequencyTable,
		counts_n1: &'a FrequencyTable,
		vocabulary_size: usize,
		k: f64,
	) -> Result<Self, NGramError> {
		if vocabulary_size == 0 {
			return Err(NGramError::InvalidVocabulary("vocabulary size must be > 0".to_owned()));
		}
		check_smoothing(k)?;
		if counts_n1.arity() != counts_n.arity() + 1 {
			return Err(NGramError::MalformedCounts(format!(
				"expected a {}-gram table next to the {}-gram table, got a {}-gram table",
				counts_n.arity() + 1,
				counts_n.arity(),
				counts_n1.arity()
			)));
		}
		Ok(Self { counts_n, counts_n1, vocabulary_size, k })
	}

	/// Order of the context table.
	pub(crate) fn n(&self) -> usize {
		self.counts_n.arity()
	}

	/// Denominator of every probability sharing `context`.
	pub(crate) fn denominator(&self, context: &[String]) -> f64 {
		self.counts_n.get(context) as f64 + self.k * self.vocabulary_size as f64
	}

	/// Probability of `word` after the context held in `key`.
	///
	/// `key` is used as a scratch buffer and holds the context again on return.
	pub(crate) fn probability(&self, key: &mut Vec<String>, word: &str, denominator: f64) -> f64 {
		key.push(word.to_owned());
		let numerator = self.counts_n1.get(key) as f64 + self.k;
		key.pop();
		numerator / denominator
	}
}

fn context_key<S: AsRef<str>>(context: &[S]) -> Vec<String> {
	let mut key = Vec::with_capacity(context.len() + 1);
	key.extend(context.iter().map(|t| t.as_ref().to_owned()));
	key
}

/// Add-k smoothed probability of `word` following `context`.
///
/// `counts_n` holds the context counts, `counts_n1` the context + word
/// counts. The result is always in `(0, 1]`.
///
/// # Errors
/// - [`NGramError::InvalidVocabulary`] if `vocabulary_size` is 0
/// - [`NGramError::InvalidSmoothing`] if `k <= 0`
/// - [`NGramError::MalformedCounts`] if `counts_n1` is not of order `counts_n + 1`
pub fn probability_of<S: AsRef<str>>(
	word: &str,
	context: &[S],
	counts_n: &FrequencyTable,
	counts_n1: &FrequencyTable,
	vocabulary_size: usize,
	k: f64,
) -> Result<f64, NGramError> {
	let estimator = Estimator::new(counts_n, counts_n1, vocabulary_size, k)?;
	let mut key = context_key(context);
	let denominator = estimator.denominator(&key);
	Ok(estimator.probability(&mut key, word, denominator))
}

/// Probability of every word of the extended vocabulary following `context`.
///
/// The distribution covers the vocabulary words then END and UNKNOWN
/// (START is never a next word) and is normalized over that closed set.
///
/// # Errors
/// - [`NGramError::InvalidVocabulary`] if `vocabulary` is empty
/// - [`NGramError::InvalidSmoothing`] if `k <= 0`
/// - [`NGramError::MalformedCounts`] if `counts_n1` is not of order `counts_n + 1`
pub fn distribution_over<S: AsRef<str>>(
	context: &[S],
	counts_n: &FrequencyTable,
	counts_n1: &FrequencyTable,
	vocabulary: &Vocabulary,
	k: f64,
) -> Result<Distribution, NGramError> {
	if vocabulary.is_empty() {
		return Err(NGramError::InvalidVocabulary("cannot normalize over an empty vocabulary".to_owned()));
	}
	let estimator = Estimator::new(counts_n, counts_n1, vocabulary.extended_len(), k)?;
	let mut key = context_key(context);
	let denominator = estimator.denominator(&key);
	let entries = vocabulary
		.extended()
		.map(|word| (word.to_owned(), estimator.probability(&mut key, word, denominator)))
		.collect();
	Ok(Distribution { entries })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::token::{END, START, UNKNOWN};

	fn corpus(sentences: &[&[&str]]) -> Vec<Vec<String>> {
		sentences.iter().map(|s| s.iter().map(|w| w.to_string()).collect()).collect()
	}

	fn cats_and_dogs() -> (FrequencyTable, FrequencyTable, Vocabulary) {
		let c = corpus(&[&["i", "like", "cats"], &["i", "like", "dogs"]]);
		(
			FrequencyTable::count(&c, 1).unwrap(),
			FrequencyTable::count(&c, 2).unwrap(),
			Vocabulary::new(["i", "like", "cats", "dogs"]).unwrap(),
		)
	}

	#[test]
	fn probability_of_seen_bigram() {
		let (unigrams, bigrams, vocabulary) = cats_and_dogs();
		let p = probability_of("like", &["i"], &unigrams, &bigrams, vocabulary.extended_len(), 1.0).unwrap();
		assert!((p - 0.375).abs() < 1e-12, "got {p}");
	}

	#[test]
	fn unseen_context_degrades_to_uniform() {
		let (unigrams, bigrams, vocabulary) = cats_and_dogs();
		let v = vocabulary.extended_len();
		let p = probability_of("cats", &["zebra"], &unigrams, &bigrams, v, 0.5).unwrap();
		assert!((p - 1.0 / v as f64).abs() < 1e-12);
	}

	#[test]
	fn probabilities_are_in_unit_interval() {
		let (unigrams, bigrams, vocabulary) = cats_and_dogs();
		for context in [START, "i", "like", "cats", "dogs", "zebra"] {
			for word in vocabulary.extended().chain([START, "zebra"]) {
				for k in [0.001, 0.5, 1.0, 10.0] {
					let p = probability_of(word, &[context], &unigrams, &bigrams, vocabulary.extended_len(), k).unwrap();
					assert!(p > 0.0 && p <= 1.0, "P({word} | {context}) = {p}");
				}
			}
		}
	}

	#[test]
	fn distributions_sum_to_one() {
		let (unigrams, bigrams, vocabulary) = cats_and_dogs();
		for context in [START, "i", "like", "cats", "dogs", "never-seen"] {
			for k in [0.01, 1.0, 3.0] {
				let d = distribution_over(&[context], &unigrams, &bigrams, &vocabulary, k).unwrap();
				assert_eq!(d.len(), 6);
				assert!((d.sum() - 1.0).abs() < 1e-9, "context {context}, k {k}: {}", d.sum());
			}
		}
	}

	#[test]
	fn distribution_order_and_sentinels() {
		let (unigrams, bigrams, vocabulary) = cats_and_dogs();
		let d = distribution_over(&["like"], &unigrams, &bigrams, &vocabulary, 1.0).unwrap();
		let words: Vec<&str> = d.iter().map(|(w, _)| w).collect();
		assert_eq!(words, ["i", "like", "cats", "dogs", END, UNKNOWN]);
		assert!(d.get(START).is_none());
		assert_eq!(d.get("cats"), Some(2.0 / 8.0));
		assert_eq!(d.get("i"), Some(1.0 / 8.0));
	}

	#[test]
	fn distribution_is_idempotent() {
		let (unigrams, bigrams, vocabulary) = cats_and_dogs();
		let a = distribution_over(&["i"], &unigrams, &bigrams, &vocabulary, 1.0).unwrap();
		let b = distribution_over(&["i"], &unigrams, &bigrams, &vocabulary, 1.0).unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn top_orders_by_probability_then_enumeration() {
		let (unigrams, bigrams, vocabulary) = cats_and_dogs();
		let d = distribution_over(&["like"], &unigrams, &bigrams, &vocabulary, 1.0).unwrap();
		let top = d.top(3);
		assert_eq!(top[0].0, "cats");
		assert_eq!(top[1].0, "dogs");
		assert_eq!(top[2].0, "i");
	}

	#[test]
	fn most_probable_keeps_the_head_of_top() {
		let (unigrams, bigrams, vocabulary) = cats_and_dogs();
		let d = distribution_over(&["like"], &unigrams, &bigrams, &vocabulary, 1.0).unwrap();
		let head = d.most_probable(2);
		assert_eq!(head.len(), 2);
		assert_eq!(head.iter().collect::<Vec<_>>(), d.top(2));
		assert_eq!(head.get("cats"), Some(2.0 / 8.0));
		assert!(head.get("i").is_none());
		assert_eq!(d.most_probable(100).len(), d.len());
	}

	#[test]
	fn context_ending_with_end_is_not_normalized() {
		let (unigrams, bigrams, vocabulary) = cats_and_dogs();
		// Two END windows, six words: (0 + 1) * 6 / (2 + 6).
		let d = distribution_over(&[END], &unigrams, &bigrams, &vocabulary, 1.0).unwrap();
		assert!((d.sum() - 0.75).abs() < 1e-12, "got {}", d.sum());
		for (_, p) in d.iter() {
			assert!((p - 1.0 / 8.0).abs() < 1e-12);
		}
	}

	#[test]
	fn invalid_inputs_are_rejected() {
		let (unigrams, bigrams, vocabulary) = cats_and_dogs();
		assert!(matches!(
			probability_of("i", &[START], &unigrams, &bigrams, 0, 1.0),
			Err(NGramError::InvalidVocabulary(_))
		));
		assert!(matches!(
			probability_of("i", &[START], &unigrams, &bigrams, 6, 0.0),
			Err(NGramError::InvalidSmoothing(_))
		));
		assert!(matches!(
			probability_of("i", &[START], &bigrams, &unigrams, 6, 1.0),
			Err(NGramError::MalformedCounts(_))
		));
		assert!(matches!(
			distribution_over(&[START], &unigrams, &bigrams, &Vocabulary::default(), 1.0),
			Err(NGramError::InvalidVocabulary(_))
		));
		assert!(matches!(
			distribution_over(&[START], &unigrams, &bigrams, &vocabulary, -2.0),
			Err(NGramError::InvalidSmoothing(_))
		));
	}
}
