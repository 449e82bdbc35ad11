use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use log::info;

use super::tokenizer::tokenize_sentences;
use super::vocabulary::Vocabulary;
use crate::config::TrainingConfig;
use crate::error::NGramError;
use crate::io::read_sentences;

/// Shuffles `sentences` with a seeded generator and splits them in two.
///
/// The first `floor(len * train_ratio)` shuffled sentences form the
/// training set, the rest the test set. The same seed always yields the
/// same split.
///
/// # Errors
/// Returns [`NGramError::InvalidCorpus`] if `sentences` is empty or
/// `train_ratio` is outside `(0, 1]`.
pub fn split<T>(mut sentences: Vec<T>, train_ratio: f64, seed: u64) -> Result<(Vec<T>, Vec<T>), NGramError> {
	if sentences.is_empty() {
		return Err(NGramError::InvalidCorpus("nothing to split".to_owned()));
	}
	if !(train_ratio > 0.0 && train_ratio <= 1.0) {
		return Err(NGramError::InvalidCorpus(format!("train ratio must be in (0, 1], got {train_ratio}")));
	}

	let mut rng = StdRng::seed_from_u64(seed);
	sentences.shuffle(&mut rng);

	let train_size = (sentences.len() as f64 * train_ratio) as usize;
	let test = sentences.split_off(train_size);
	Ok((sentences, test))
}

/// Tokenized train and test sets sharing one vocabulary.
///
/// Words of either set that are not in the vocabulary (built from the
/// training set only) are replaced with UNKNOWN.
#[derive(Clone, Debug)]
pub struct Dataset {
	pub train: Vec<Vec<String>>,
	pub test: Vec<Vec<String>>,
	pub vocabulary: Vocabulary,
}

impl Dataset {
	/// Runs tokenization, splitting, vocabulary building and unknown-word
	/// substitution over raw sentences.
	///
	/// # Errors
	/// Returns [`NGramError::InvalidCorpus`] if there is no sentence to split.
	pub fn prepare<S: AsRef<str>>(sentences: &[S], config: &TrainingConfig) -> Result<Self, NGramError> {
		let tokenized = tokenize_sentences(sentences);
		let (train, test) = split(tokenized, config.train_ratio(), config.seed)?;

		let vocabulary = Vocabulary::from_corpus(&train, config.count_threshold);
		let train = vocabulary.replace_oov(&train);
		let test = vocabulary.replace_oov(&test);

		info!(
			"Dataset: {} training sentences, {} test sentences, {} known words",
			train.len(),
			test.len(),
			vocabulary.len()
		);
		Ok(Self { train, test, vocabulary })
	}

	/// Reads `config.corpus_path` and prepares it.
	///
	/// # Errors
	/// Returns an error if the file cannot be read or contains no sentence.
	pub fn load(config: &TrainingConfig) -> Result<Self, Box<dyn std::error::Error>> {
		let sentences = read_sentences(&config.corpus_path)?;
		info!("Loaded {} sentences from {}", sentences.len(), config.corpus_path.display());
		Ok(Self::prepare(&sentences, config)?)
	}
}
