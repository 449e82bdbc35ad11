use log::warn;

use super::estimator::Estimator;
use super::frequency_table::{FrequencyTable, pad};
use crate::error::NGramError;

/// Perplexity of one sentence under the model formed by `counts_n` and `counts_n1`.
///
/// The sentence is padded with `n` START tokens and one END token, `n`
/// being the order of `counts_n`. With `N` the padded length, the result is
/// the `N`-th root of the product of `1 / P(token[t] | token[t-n..t])` over
/// `t` in `n..N`. Lower is a better fit.
///
/// The product is accumulated as a sum of logarithms so long sentences
/// cannot overflow.
///
/// # Errors
/// - [`NGramError::MalformedCounts`] if `counts_n` is empty or the tables
///   are not of orders n and n+1
/// - [`NGramError::InvalidVocabulary`] if `vocabulary_size` is 0
/// - [`NGramError::InvalidSmoothing`] if `k <= 0`
pub fn perplexity(
	sentence: &[String],
	counts_n: &FrequencyTable,
	counts_n1: &FrequencyTable,
	vocabulary_size: usize,
	k: f64,
) -> Result<f64, NGramError> {
	if counts_n.is_empty() {
		return Err(NGramError::MalformedCounts("cannot score with an empty context table".to_owned()));
	}
	let estimator = Estimator::new(counts_n, counts_n1, vocabulary_size, k)?;
	let n = estimator.n();

	let padded = pad(sentence, n);
	let length = padded.len();

	let mut log_sum = 0.0;
	for t in n..length {
		let mut key: Vec<String> = padded[t - n..t].iter().map(|s| (*s).to_owned()).collect();
		let denominator = estimator.denominator(&key);
		let probability = estimator.probability(&mut key, padded[t], denominator);
		log_sum -= probability.ln();
	}

	Ok((log_sum / length as f64).exp())
}

/// Average perplexity over a set of held-out sentences.
///
/// # Errors
/// - [`NGramError::InvalidCorpus`] if `sentences` is empty
/// - Any error of [`perplexity`]
pub fn mean_perplexity(
	sentences: &[Vec<String>],
	counts_n: &FrequencyTable,
	counts_n1: &FrequencyTable,
	vocabulary_size: usize,
	k: f64,
) -> Result<f64, NGramError> {
	if sentences.is_empty() {
		warn!("No sentence to score");
		return Err(NGramError::InvalidCorpus("no sentence to score".to_owned()));
	}
	let mut total = 0.0;
	for sentence in sentences {
		total += perplexity(sentence, counts_n, counts_n1, vocabulary_size, k)?;
	}
	Ok(total / sentences.len() as f64)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::estimator::probability_of;
	use crate::model::token::{END, START};
	use crate::model::vocabulary::Vocabulary;

	fn corpus(sentences: &[&[&str]]) -> Vec<Vec<String>> {
		sentences.iter().map(|s| s.iter().map(|w| w.to_string()).collect()).collect()
	}

	fn setup() -> (Vec<Vec<String>>, FrequencyTable, FrequencyTable, usize) {
		let c = corpus(&[&["i", "like", "cats"], &["i", "like", "dogs"]]);
		let v = Vocabulary::new(["i", "like", "cats", "dogs"]).unwrap();
		let unigrams = FrequencyTable::count(&c, 1).unwrap();
		let bigrams = FrequencyTable::count(&c, 2).unwrap();
		(c, unigrams, bigrams, v.extended_len())
	}

	#[test]
	fn matches_direct_product_formula() {
		let (c, unigrams, bigrams, v) = setup();
		let sentence = &c[0];
		let tokens = [START, "i", "like", "cats", END];
		let mut product = 1.0;
		for t in 1..tokens.len() {
			product /= probability_of(tokens[t], &tokens[t - 1..t], &unigrams, &bigrams, v, 1.0).unwrap();
		}
		let expected = f64::powf(product, 1.0 / tokens.len() as f64);
		let got = perplexity(sentence, &unigrams, &bigrams, v, 1.0).unwrap();
		assert!((got - expected).abs() < 1e-9, "{got} != {expected}");
	}

	#[test]
	fn is_finite_above_one_and_reproducible() {
		let (c, unigrams, bigrams, v) = setup();
		let first = perplexity(&c[0], &unigrams, &bigrams, v, 1.0).unwrap();
		let second = perplexity(&c[0], &unigrams, &bigrams, v, 1.0).unwrap();
		assert!(first.is_finite());
		assert!(first > 1.0);
		assert_eq!(first, second);
	}

	#[test]
	fn unfamiliar_sentence_scores_worse() {
		let (_, unigrams, bigrams, v) = setup();
		let seen = perplexity(&corpus(&[&["i", "like", "cats"]])[0], &unigrams, &bigrams, v, 1.0).unwrap();
		let unseen = perplexity(&corpus(&[&["cats", "i", "dogs"]])[0], &unigrams, &bigrams, v, 1.0).unwrap();
		assert!(unseen > seen);
	}

	#[test]
	fn long_sentences_do_not_overflow() {
		let (_, unigrams, bigrams, v) = setup();
		let sentence: Vec<String> = (0..5000).map(|i| format!("never-seen-{i}")).collect();
		let p = perplexity(&sentence, &unigrams, &bigrams, v, 0.001).unwrap();
		assert!(p.is_finite());
		assert!(p > 1.0);
	}

	#[test]
	fn rejects_empty_or_mismatched_tables() {
		let (c, unigrams, bigrams, v) = setup();
		let empty = FrequencyTable::new(1).unwrap();
		assert!(matches!(perplexity(&c[0], &empty, &bigrams, v, 1.0), Err(NGramError::MalformedCounts(_))));
		assert!(matches!(perplexity(&c[0], &bigrams, &unigrams, v, 1.0), Err(NGramError::MalformedCounts(_))));
		assert!(matches!(perplexity(&c[0], &unigrams, &bigrams, v, -1.0), Err(NGramError::InvalidSmoothing(_))));
	}

	#[test]
	fn mean_over_test_set() {
		let (c, unigrams, bigrams, v) = setup();
		let a = perplexity(&c[0], &unigrams, &bigrams, v, 1.0).unwrap();
		let b = perplexity(&c[1], &unigrams, &bigrams, v, 1.0).unwrap();
		let mean = mean_perplexity(&c, &unigrams, &bigrams, v, 1.0).unwrap();
		assert!((mean - (a + b) / 2.0).abs() < 1e-12);
		assert!(matches!(mean_perplexity(&[], &unigrams, &bigrams, v, 1.0), Err(NGramError::InvalidCorpus(_))));
	}
}
