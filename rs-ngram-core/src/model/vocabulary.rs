use std::collections::HashMap;

use log::{debug, info};

use super::token::{END, START, UNKNOWN};
use crate::error::NGramError;

/// The closed set of words a model recognises as known.
///
/// Words are enumerated in insertion order, which fixes the order of every
/// distribution built over the vocabulary and therefore the prediction
/// tie-break.
///
/// # Invariants
/// - Words are unique
/// - No sentinel token (START, END, UNKNOWN) is ever stored; END and
///   UNKNOWN are appended by [`Vocabulary::extended`] only
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
	/// Words in enumeration order.
	words: Vec<String>,
	/// Word -> position in `words`.
	index: HashMap<String, usize>,
}

impl Vocabulary {
	/// Builds a vocabulary from words in the given order.
	///
	/// Duplicates are skipped (first occurrence wins).
	///
	/// # Errors
	/// Returns [`NGramError::InvalidVocabulary`] if a sentinel token is given.
	pub fn new<I, S>(words: I) -> Result<Self, NGramError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut vocabulary = Self::default();
		for word in words {
			let word = word.into();
			if word == START || word == END || word == UNKNOWN {
				return Err(NGramError::InvalidVocabulary(format!("sentinel {word} cannot be a vocabulary word")));
			}
			vocabulary.insert(word);
		}
		Ok(vocabulary)
	}

	/// Builds the vocabulary of words seen at least `threshold` times in `corpus`.
	///
	/// Words keep the order of their first occurrence. Sentinel tokens found
	/// in the corpus are never promoted to vocabulary words.
	pub fn from_corpus(corpus: &[Vec<String>], threshold: usize) -> Self {
		let counts = count_words(corpus);
		let seen = counts.len();
		let mut vocabulary = Self::default();
		for (word, count) in counts {
			if count >= threshold && word != START && word != END && word != UNKNOWN {
				vocabulary.insert(word);
			}
		}
		info!("Vocabulary: kept {} of {} distinct words (threshold {})", vocabulary.len(), seen, threshold);
		vocabulary
	}

	fn insert(&mut self, word: String) {
		if self.index.contains_key(&word) {
			return;
		}
		self.index.insert(word.clone(), self.words.len());
		self.words.push(word);
	}

	/// Number of known words (sentinels excluded).
	pub fn len(&self) -> usize {
		self.words.len()
	}

	/// Returns `true` if there is no known word.
	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	/// Returns `true` if `word` is a known word.
	pub fn contains(&self, word: &str) -> bool {
		self.index.contains_key(word)
	}

	/// Known words in enumeration order.
	pub fn words(&self) -> &[String] {
		&self.words
	}

	/// Known words followed by END then UNKNOWN.
	///
	/// This is the closed set a next-word distribution is normalized over.
	/// START is never part of it.
	pub fn extended(&self) -> impl Iterator<Item = &str> {
		self.words.iter().map(String::as_str).chain([END, UNKNOWN])
	}

	/// Size of [`Vocabulary::extended`].
	pub fn extended_len(&self) -> usize {
		self.words.len() + 2
	}

	/// Replaces every word of `sentence` outside the vocabulary with UNKNOWN.
	pub fn replace_unknown(&self, sentence: &[String]) -> Vec<String> {
		sentence
			.iter()
			.map(|token| if self.contains(token) { token.clone() } else { UNKNOWN.to_owned() })
			.collect()
	}

	/// Replaces every word outside the vocabulary with UNKNOWN, sentence by sentence.
	pub fn replace_oov(&self, corpus: &[Vec<String>]) -> Vec<Vec<String>> {
		let result: Vec<Vec<String>> = corpus.iter().map(|sentence| self.replace_unknown(sentence)).collect();
		debug!(
			"Replaced {} out-of-vocabulary tokens",
			result.iter().flatten().filter(|t| *t == UNKNOWN).count()
		);
		result
	}
}

/// Counts word occurrences over a tokenized corpus.
///
/// Returns `(word, count)` pairs in order of first occurrence.
pub fn count_words(corpus: &[Vec<String>]) -> Vec<(String, usize)> {
	let mut position: HashMap<&str, usize> = HashMap::new();
	let mut counts: Vec<(String, usize)> = Vec::new();
	for sentence in corpus {
		for word in sentence {
			match position.get(word.as_str()) {
				Some(&i) => counts[i].1 += 1,
				None => {
					position.insert(word.as_str(), counts.len());
					counts.push((word.clone(), 1));
				}
			}
		}
	}
	counts
}

#[cfg(test)]
mod tests {
	use super::*;

	fn corpus(sentences: &[&[&str]]) -> Vec<Vec<String>> {
		sentences.iter().map(|s| s.iter().map(|w| w.to_string()).collect()).collect()
	}

	#[test]
	fn new_skips_duplicates_and_keeps_order() {
		let v = Vocabulary::new(["b", "a", "b", "c"]).unwrap();
		assert_eq!(v.words(), ["b", "a", "c"]);
		assert_eq!(v.len(), 3);
		assert!(v.contains("a"));
		assert!(!v.contains("d"));
	}

	#[test]
	fn new_rejects_sentinels() {
		assert!(matches!(Vocabulary::new(["a", END]), Err(NGramError::InvalidVocabulary(_))));
		assert!(matches!(Vocabulary::new([UNKNOWN]), Err(NGramError::InvalidVocabulary(_))));
		assert!(matches!(Vocabulary::new([START]), Err(NGramError::InvalidVocabulary(_))));
	}

	#[test]
	fn extended_appends_end_and_unknown() {
		let v = Vocabulary::new(["x", "y"]).unwrap();
		let extended: Vec<&str> = v.extended().collect();
		assert_eq!(extended, ["x", "y", END, UNKNOWN]);
		assert_eq!(v.extended_len(), 4);
	}

	#[test]
	fn count_words_keeps_first_seen_order() {
		let c = corpus(&[&["sky", "is", "blue"], &["leaves", "are", "green"], &["sky", "is"]]);
		let counts = count_words(&c);
		assert_eq!(counts[0], ("sky".to_owned(), 2));
		assert_eq!(counts[1], ("is".to_owned(), 2));
		assert_eq!(counts[2], ("blue".to_owned(), 1));
		assert_eq!(counts.len(), 6);
	}

	#[test]
	fn from_corpus_applies_threshold() {
		let c = corpus(&[&["sky", "is", "blue"], &["leaves", "are", "green"], &["roses", "are", "red"]]);
		let v = Vocabulary::from_corpus(&c, 2);
		assert_eq!(v.words(), ["are"]);
		let v = Vocabulary::from_corpus(&c, 1);
		assert_eq!(v.len(), 8);
	}

	#[test]
	fn from_corpus_never_keeps_sentinels() {
		let c = corpus(&[&["a", UNKNOWN, UNKNOWN]]);
		let v = Vocabulary::from_corpus(&c, 1);
		assert_eq!(v.words(), ["a"]);
	}

	#[test]
	fn replace_oov_substitutes_unknown() {
		let v = Vocabulary::new(["sky", "is"]).unwrap();
		let c = corpus(&[&["sky", "is", "blue"], &["dogs", "sleep"]]);
		let replaced = v.replace_oov(&c);
		assert_eq!(replaced, corpus(&[&["sky", "is", UNKNOWN], &[UNKNOWN, UNKNOWN]]));
	}
}
