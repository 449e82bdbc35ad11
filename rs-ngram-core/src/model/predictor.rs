use serde::Serialize;

use super::estimator::distribution_over;
use super::frequency_table::FrequencyTable;
use super::vocabulary::Vocabulary;
use crate::error::NGramError;

/// Outcome of a next-word prediction.
///
/// `NoMatch` is returned when no word satisfies the prefix filter. It is
/// distinct from a real prediction: under add-k smoothing every word has a
/// strictly positive probability.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prediction {
	Word { word: String, probability: f64 },
	NoMatch,
}

impl Prediction {
	/// The predicted word, `None` for `NoMatch`.
	pub fn word(&self) -> Option<&str> {
		match self {
			Prediction::Word { word, .. } => Some(word),
			Prediction::NoMatch => None,
		}
	}

	/// Probability of the predicted word, 0 for `NoMatch`.
	pub fn probability(&self) -> f64 {
		match self {
			Prediction::Word { probability, .. } => *probability,
			Prediction::NoMatch => 0.0,
		}
	}
}

/// Returns the last `n` tokens of `tokens`, or all of them if there are fewer.
fn last_n<S>(tokens: &[S], n: usize) -> &[S] {
	&tokens[tokens.len().saturating_sub(n)..]
}

/// Predicts the most likely word following `prefix`.
///
/// # Behavior
/// - Uses the last `n` tokens of `prefix` as context, `n` being the order of `counts_n`.
/// - Considers the vocabulary words, END and UNKNOWN, in enumeration order.
/// - With `prefix_filter`, only words starting with it are considered.
/// - A word replaces the current best only if its probability is strictly
///   greater, so ties keep the earlier-enumerated word.
///
/// # Errors
/// Same as [`distribution_over`].
pub fn predict_next<S: AsRef<str>>(
	prefix: &[S],
	counts_n: &FrequencyTable,
	counts_n1: &FrequencyTable,
	vocabulary: &Vocabulary,
	k: f64,
	prefix_filter: Option<&str>,
) -> Result<Prediction, NGramError> {
	let context = last_n(prefix, counts_n.arity());
	let distribution = distribution_over(context, counts_n, counts_n1, vocabulary, k)?;

	let mut prediction = Prediction::NoMatch;
	let mut max_probability = 0.0;
	for (word, probability) in distribution.iter() {
		if let Some(filter) = prefix_filter {
			if !word.starts_with(filter) {
				continue;
			}
		}
		if probability > max_probability {
			max_probability = probability;
			prediction = Prediction::Word { word: word.to_owned(), probability };
		}
	}
	Ok(prediction)
}

/// Predicts the next word with every consecutive pair of tables.
///
/// `tables` must be ordered by increasing order; table `i` is used as the
/// context table of table `i + 1`. The result has one prediction per pair,
/// in input order, so that several model orders can be compared side by side.
///
/// # Errors
/// Same as [`predict_next`], for the first failing pair.
pub fn predict_next_cascade<S: AsRef<str>>(
	prefix: &[S],
	tables: &[FrequencyTable],
	vocabulary: &Vocabulary,
	k: f64,
	prefix_filter: Option<&str>,
) -> Result<Vec<Prediction>, NGramError> {
	tables
		.windows(2)
		.map(|pair| predict_next(prefix, &pair[0], &pair[1], vocabulary, k, prefix_filter))
		.collect()
}
