use std::ops::RangeInclusive;

use log::info;

use super::dataset::Dataset;
use super::estimator::{Distribution, distribution_over};
use super::frequency_table::FrequencyTable;
use super::matrix::DistributionMatrix;
use super::perplexity::{mean_perplexity, perplexity};
use super::predictor::{Prediction, predict_next, predict_next_cascade};
use super::vocabulary::Vocabulary;
use crate::config::TrainingConfig;
use crate::error::{NGramError, check_smoothing};

/// A vocabulary, a smoothing constant and the frequency tables of every
/// order from 1 to `max_order + 1`, built from one corpus.
///
/// "Order" below is the context length `n`: order 1 pairs the unigram and
/// bigram tables (a bigram model), order 2 the bigram and trigram tables,
/// and so on.
///
/// # Invariants
/// - `tables[i]` has arity `i + 1`
/// - `tables.len() >= 2`
/// - All tables come from the same corpus pass, so every distribution sums to 1
#[derive(Clone, Debug)]
pub struct LanguageModel {
	vocabulary: Vocabulary,
	k: f64,
	tables: Vec<FrequencyTable>,
}

impl LanguageModel {
	/// Counts the tables of orders `1..=max_order + 1` over `corpus`.
	///
	/// # Errors
	/// - [`NGramError::InvalidArity`] if `max_order < 1`
	/// - [`NGramError::InvalidSmoothing`] if `k <= 0`
	/// - [`NGramError::InvalidVocabulary`] if `vocabulary` is empty
	pub fn train(corpus: &[Vec<String>], vocabulary: Vocabulary, max_order: usize, k: f64) -> Result<Self, NGramError> {
		if max_order < 1 {
			return Err(NGramError::InvalidArity(max_order));
		}
		check_smoothing(k)?;
		if vocabulary.is_empty() {
			return Err(NGramError::InvalidVocabulary("cannot train with an empty vocabulary".to_owned()));
		}

		let tables = (1..=max_order + 1)
			.map(|n| FrequencyTable::count_parallel(corpus, n))
			.collect::<Result<Vec<_>, _>>()?;

		info!(
			"Trained orders 1..={} over {} sentences ({} known words, k = {})",
			max_order,
			corpus.len(),
			vocabulary.len(),
			k
		);
		Ok(Self { vocabulary, k, tables })
	}

	/// Trains on the training half of `dataset` with the orders and `k` of `config`.
	pub fn from_dataset(dataset: &Dataset, config: &TrainingConfig) -> Result<Self, NGramError> {
		Self::train(&dataset.train, dataset.vocabulary.clone(), config.max_order(), config.k())
	}

	pub fn vocabulary(&self) -> &Vocabulary {
		&self.vocabulary
	}

	pub fn k(&self) -> f64 {
		self.k
	}

	/// Largest usable context length.
	pub fn max_order(&self) -> usize {
		self.tables.len() - 1
	}

	/// Usable context lengths.
	pub fn orders(&self) -> RangeInclusive<usize> {
		1..=self.max_order()
	}

	/// The frequency table of arity `n`.
	pub fn table(&self, n: usize) -> Option<&FrequencyTable> {
		n.checked_sub(1).and_then(|i| self.tables.get(i))
	}

	/// The context and extension tables of `order`.
	fn pair(&self, order: usize) -> Result<(&FrequencyTable, &FrequencyTable), NGramError> {
		if !self.orders().contains(&order) {
			return Err(NGramError::InvalidArity(order));
		}
		Ok((&self.tables[order - 1], &self.tables[order]))
	}

	/// Most likely next word after `prefix` with the model of `order`.
	pub fn predict<S: AsRef<str>>(&self, prefix: &[S], order: usize, prefix_filter: Option<&str>) -> Result<Prediction, NGramError> {
		let (counts_n, counts_n1) = self.pair(order)?;
		predict_next(prefix, counts_n, counts_n1, &self.vocabulary, self.k, prefix_filter)
	}

	/// One prediction per order, lowest order first.
	pub fn predict_cascade<S: AsRef<str>>(&self, prefix: &[S], prefix_filter: Option<&str>) -> Result<Vec<Prediction>, NGramError> {
		predict_next_cascade(prefix, &self.tables, &self.vocabulary, self.k, prefix_filter)
	}

	/// Next-word distribution after `prefix`, using its last `order` tokens as context.
	pub fn distribution<S: AsRef<str>>(&self, prefix: &[S], order: usize) -> Result<Distribution, NGramError> {
		let (counts_n, counts_n1) = self.pair(order)?;
		let context = &prefix[prefix.len().saturating_sub(order)..];
		distribution_over(context, counts_n, counts_n1, &self.vocabulary, self.k)
	}

	/// Perplexity of `sentence` under the model of `order`.
	pub fn perplexity(&self, sentence: &[String], order: usize) -> Result<f64, NGramError> {
		let (counts_n, counts_n1) = self.pair(order)?;
		perplexity(sentence, counts_n, counts_n1, self.vocabulary.extended_len(), self.k)
	}

	/// Average perplexity of `sentences` under the model of `order`.
	pub fn mean_perplexity(&self, sentences: &[Vec<String>], order: usize) -> Result<f64, NGramError> {
		let (counts_n, counts_n1) = self.pair(order)?;
		mean_perplexity(sentences, counts_n, counts_n1, self.vocabulary.extended_len(), self.k)
	}

	/// Count matrix, or smoothed probability matrix, of the model of `order`.
	pub fn matrix(&self, order: usize, probabilities: bool) -> Result<DistributionMatrix, NGramError> {
		let (_, counts_n1) = self.pair(order)?;
		if probabilities {
			DistributionMatrix::probabilities(counts_n1, &self.vocabulary, self.k)
		} else {
			Ok(DistributionMatrix::counts(counts_n1, &self.vocabulary))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn corpus(sentences: &[&[&str]]) -> Vec<Vec<String>> {
		sentences.iter().map(|s| s.iter().map(|w| w.to_string()).collect()).collect()
	}

	fn model(max_order: usize) -> LanguageModel {
		let c = corpus(&[&["i", "like", "a", "cat"], &["this", "dog", "is", "like", "a", "cat"]]);
		let v = Vocabulary::from_corpus(&c, 1);
		LanguageModel::train(&c, v, max_order, 1.0).unwrap()
	}

	#[test]
	fn builds_one_table_per_arity() {
		let m = model(3);
		assert_eq!(m.max_order(), 3);
		assert_eq!(m.orders(), 1..=3);
		for n in 1..=4 {
			assert_eq!(m.table(n).unwrap().arity(), n);
		}
		assert!(m.table(0).is_none());
		assert!(m.table(5).is_none());
	}

	#[test]
	fn rejects_invalid_training_input() {
		let c = corpus(&[&["a"]]);
		let v = Vocabulary::from_corpus(&c, 1);
		assert!(matches!(LanguageModel::train(&c, v.clone(), 0, 1.0), Err(NGramError::InvalidArity(0))));
		assert!(matches!(LanguageModel::train(&c, v, 1, 0.0), Err(NGramError::InvalidSmoothing(_))));
		assert!(matches!(
			LanguageModel::train(&c, Vocabulary::default(), 1, 1.0),
			Err(NGramError::InvalidVocabulary(_))
		));
	}

	#[test]
	fn order_out_of_range_is_invalid_arity() {
		let m = model(2);
		assert!(matches!(m.predict(&["a"], 0, None), Err(NGramError::InvalidArity(0))));
		assert!(matches!(m.predict(&["a"], 3, None), Err(NGramError::InvalidArity(3))));
		assert!(matches!(m.matrix(3, false), Err(NGramError::InvalidArity(3))));
	}

	#[test]
	fn predictions_and_cascade_agree() {
		let m = model(3);
		let cascade = m.predict_cascade(&["i", "like"], None).unwrap();
		assert_eq!(cascade.len(), 3);
		for order in m.orders() {
			assert_eq!(m.predict(&["i", "like"], order, None).unwrap(), cascade[order - 1]);
		}
		assert_eq!(cascade[0].word(), Some("a"));
		assert_eq!(cascade[1].word(), Some("a"));
	}

	#[test]
	fn distributions_sum_to_one_for_every_order() {
		let m = model(3);
		for order in m.orders() {
			let d = m.distribution(&["this", "dog", "is"], order).unwrap();
			assert!((d.sum() - 1.0).abs() < 1e-9);
		}
	}

	#[test]
	fn higher_orders_fit_training_sentences_better() {
		let m = model(3);
		let sentence = corpus(&[&["this", "dog", "is", "like", "a", "cat"]]).remove(0);
		let bigram = m.perplexity(&sentence, 1).unwrap();
		let trigram = m.perplexity(&sentence, 2).unwrap();
		assert!(bigram > 1.0);
		assert!(trigram < bigram);
	}
}
