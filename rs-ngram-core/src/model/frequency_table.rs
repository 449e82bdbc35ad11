use std::collections::{BTreeSet, HashMap};
use std::sync::mpsc;
use std::thread;

use log::debug;

use super::token::{END, START};
use crate::error::NGramError;

/// Frequency table of fixed-order word n-grams.
///
/// Every sentence is padded with `n` START tokens in front and one END
/// token at the back before being cut into windows of length `n`, so a
/// sentence of `len` words always contributes `len + 2` windows.
///
/// # Responsibilities
/// - Count n-gram windows over a tokenized corpus
/// - Count in parallel over corpus chunks and merge the partial tables
/// - Answer count lookups (0 for unseen n-grams)
///
/// # Invariants
/// - `n` is always >= 1
/// - Every key has exactly `n` tokens
/// - Every stored count is >= 1
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyTable {
	/// The order of the table (number of tokens per key).
	n: usize,

	/// N-gram -> number of occurrences.
	counts: HashMap<Vec<String>, usize>,
}

/// Pads a sentence with `n` START tokens and one END token.
pub(crate) fn pad(sentence: &[String], n: usize) -> Vec<&str> {
	let mut padded = Vec::with_capacity(sentence.len() + n + 1);
	padded.extend(std::iter::repeat_n(START, n));
	padded.extend(sentence.iter().map(String::as_str));
	padded.push(END);
	padded
}

impl FrequencyTable {
	/// Creates an empty table of order `n`.
	///
	/// # Errors
	/// Returns [`NGramError::InvalidArity`] if `n < 1`.
	pub fn new(n: usize) -> Result<Self, NGramError> {
		if n < 1 {
			return Err(NGramError::InvalidArity(n));
		}
		Ok(Self { n, counts: HashMap::new() })
	}

	/// Counts every n-gram window of `corpus` in a single pass.
	///
	/// # Errors
	/// Returns [`NGramError::InvalidArity`] if `n < 1`.
	pub fn count(corpus: &[Vec<String>], n: usize) -> Result<Self, NGramError> {
		let mut table = Self::new(n)?;
		for sentence in corpus {
			table.add_sentence(sentence);
		}
		debug!("Counted {} distinct {}-grams over {} sentences", table.len(), n, corpus.len());
		Ok(table)
	}

	/// Counts every n-gram window of `corpus` using worker threads.
	///
	/// - Splits the corpus into chunks (based on CPU cores * factor).
	/// - Each worker counts its chunk into its own partial table.
	/// - Partial tables are merged on the calling thread.
	///
	/// The result is identical to [`FrequencyTable::count`].
	///
	/// # Errors
	/// Returns [`NGramError::InvalidArity`] if `n < 1`.
	pub fn count_parallel(corpus: &[Vec<String>], n: usize) -> Result<Self, NGramError> {
		let mut table = Self::new(n)?;
		if corpus.is_empty() {
			return Ok(table);
		}

		let chunks = num_cpus::get() * 8;
		let chunk_size = corpus.len().div_ceil(chunks).max(1);

		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for chunk in corpus.chunks(chunk_size) {
				let tx = tx.clone();
				scope.spawn(move || {
					let mut partial = Self { n, counts: HashMap::new() };
					for sentence in chunk {
						partial.add_sentence(sentence);
					}
					tx.send(partial).expect("Failed to send from thread");
				});
			}
		});
		drop(tx);

		for partial in rx.iter() {
			table.merge(&partial)?;
		}
		debug!("Counted {} distinct {}-grams over {} sentences in chunks of {}", table.len(), n, corpus.len(), chunk_size);
		Ok(table)
	}

	/// Adds the windows of one sentence to the table.
	///
	/// The sentence must not contain padding tokens; padding is applied here.
	pub fn add_sentence(&mut self, sentence: &[String]) {
		let padded = pad(sentence, self.n);
		for window in padded.windows(self.n) {
			let key: Vec<String> = window.iter().map(|t| (*t).to_owned()).collect();
			*self.counts.entry(key).or_insert(0) += 1;
		}
	}

	/// Merges another table of the same order into this one.
	///
	/// Occurrence counts of matching n-grams are summed.
	///
	/// # Errors
	/// Returns [`NGramError::MalformedCounts`] if the orders do not match.
	pub fn merge(&mut self, other: &Self) -> Result<(), NGramError> {
		if self.n != other.n {
			return Err(NGramError::MalformedCounts(format!(
				"cannot merge a {}-gram table into a {}-gram table",
				other.n, self.n
			)));
		}
		for (key, count) in &other.counts {
			*self.counts.entry(key.clone()).or_insert(0) += *count;
		}
		Ok(())
	}

	/// The order `n` of the table.
	pub fn arity(&self) -> usize {
		self.n
	}

	/// Number of occurrences of `ngram`, 0 if it was never seen.
	pub fn get(&self, ngram: &[String]) -> usize {
		self.counts.get(ngram).copied().unwrap_or(0)
	}

	/// Number of distinct n-grams.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	/// Returns `true` if nothing was counted.
	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Total number of counted windows.
	pub fn total(&self) -> usize {
		self.counts.values().sum()
	}

	/// Iterates over `(n-gram, count)` pairs in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&[String], usize)> {
		self.counts.iter().map(|(k, v)| (k.as_slice(), *v))
	}

	/// Distinct keys truncated by their last token, sorted.
	///
	/// For an (n+1)-gram table these are the n-gram contexts it was built from.
	pub fn contexts(&self) -> Vec<&[String]> {
		self.counts
			.keys()
			.map(|k| &k[..k.len() - 1])
			.collect::<BTreeSet<_>>()
			.into_iter()
			.collect()
	}
}
