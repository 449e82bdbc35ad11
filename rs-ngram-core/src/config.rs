//! Training configuration.
//!
//! [`TrainingConfig`] gathers everything needed to go from a corpus file to a
//! trained [`LanguageModel`](crate::model::language_model::LanguageModel).
//! Values can be set in code or read from `NGRAM_*` environment variables
//! with [`TrainingConfig::from_env`]; unset variables keep their default.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "NGRAM_";

pub const DEFAULT_CORPUS_PATH: &str = "./data/corpus.txt";
pub const DEFAULT_MAX_ORDER: usize = 3;
pub const DEFAULT_K: f64 = 1.0;
pub const DEFAULT_COUNT_THRESHOLD: usize = 2;
pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;
pub const DEFAULT_SEED: u64 = 10;

/// Errors produced when building or validating configuration.
///
/// # Variants
///
/// - **Validation**: a value is out of range (e.g. `k <= 0`).
/// - **Parse**: an environment variable is set but cannot be parsed
///   into the expected type (e.g. `NGRAM_K=abc`).
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
	Validation(String),
	Parse {
		key: String,
		value: String,
		message: String,
	},
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::Validation(m) => write!(f, "config validation: {m}"),
			ConfigError::Parse { key, value, message } => write!(f, "env var {key}={value:?}: {message}"),
		}
	}
}

impl std::error::Error for ConfigError {}

/// Returns the full environment variable name for `key`.
pub fn env_key(key: &str) -> String {
	format!("{ENV_PREFIX}{key}")
}

/// Reads `NGRAM_<key>` and parses it, `Ok(None)` if it is unset.
///
/// # Errors
/// Returns [`ConfigError::Parse`] if the variable is set but invalid.
pub fn env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
	T: FromStr,
	T::Err: fmt::Display,
{
	let full = env_key(key);
	match env::var(&full) {
		Ok(value) => value.trim().parse::<T>().map(Some).map_err(|e| ConfigError::Parse {
			key: full,
			value,
			message: e.to_string(),
		}),
		Err(_) => Ok(None),
	}
}

/// Parameters of the corpus -> model pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingConfig {
	/// Corpus file, one sentence per line.
	pub corpus_path: PathBuf,

	/// Largest context length. Tables of orders `1..=max_order + 1` are built.
	max_order: usize,

	/// Add-k smoothing constant.
	k: f64,

	/// Words seen fewer times than this in the training set become UNKNOWN.
	pub count_threshold: usize,

	/// Share of the sentences used for training, in `(0, 1]`.
	train_ratio: f64,

	/// Shuffle seed of the train/test split.
	pub seed: u64,
}

impl Default for TrainingConfig {
	fn default() -> Self {
		Self {
			corpus_path: PathBuf::from(DEFAULT_CORPUS_PATH),
			max_order: DEFAULT_MAX_ORDER,
			k: DEFAULT_K,
			count_threshold: DEFAULT_COUNT_THRESHOLD,
			train_ratio: DEFAULT_TRAIN_RATIO,
			seed: DEFAULT_SEED,
		}
	}
}

impl TrainingConfig {
	/// Builds a configuration from the environment over the defaults.
	///
	/// Reads `NGRAM_CORPUS`, `NGRAM_MAX_ORDER`, `NGRAM_K`, `NGRAM_THRESHOLD`,
	/// `NGRAM_TRAIN_RATIO` and `NGRAM_SEED`, then validates the result.
	///
	/// # Errors
	/// Returns a [`ConfigError`] if a variable cannot be parsed or a value is out of range.
	pub fn from_env() -> Result<Self, ConfigError> {
		let mut config = Self::default();
		if let Some(path) = env_parsed::<String>("CORPUS")? {
			config.corpus_path = PathBuf::from(path);
		}
		if let Some(max_order) = env_parsed("MAX_ORDER")? {
			config.max_order = max_order;
		}
		if let Some(k) = env_parsed("K")? {
			config.k = k;
		}
		if let Some(threshold) = env_parsed("THRESHOLD")? {
			config.count_threshold = threshold;
		}
		if let Some(ratio) = env_parsed("TRAIN_RATIO")? {
			config.train_ratio = ratio;
		}
		if let Some(seed) = env_parsed("SEED")? {
			config.seed = seed;
		}
		config.validate()?;
		Ok(config)
	}

	/// Checks every range constraint.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.max_order < 1 {
			return Err(ConfigError::Validation("max_order must be >= 1".to_owned()));
		}
		if !self.k.is_finite() || self.k <= 0.0 {
			return Err(ConfigError::Validation(format!("k must be > 0, got {}", self.k)));
		}
		if !(self.train_ratio > 0.0 && self.train_ratio <= 1.0) {
			return Err(ConfigError::Validation(format!(
				"train_ratio must be in (0, 1], got {}",
				self.train_ratio
			)));
		}
		Ok(())
	}

	pub fn max_order(&self) -> usize {
		self.max_order
	}

	pub fn k(&self) -> f64 {
		self.k
	}

	pub fn train_ratio(&self) -> f64 {
		self.train_ratio
	}

	/// Sets the largest context length.
	///
	/// # Errors
	/// Returns an error if `max_order < 1`.
	pub fn set_max_order(&mut self, max_order: usize) -> Result<(), ConfigError> {
		if max_order < 1 {
			return Err(ConfigError::Validation("max_order must be >= 1".to_owned()));
		}
		self.max_order = max_order;
		Ok(())
	}

	/// Sets the smoothing constant.
	///
	/// # Errors
	/// Returns an error if `k` is not a positive finite number.
	pub fn set_k(&mut self, k: f64) -> Result<(), ConfigError> {
		if !k.is_finite() || k <= 0.0 {
			return Err(ConfigError::Validation(format!("k must be > 0, got {k}")));
		}
		self.k = k;
		Ok(())
	}

	/// Sets the share of sentences used for training.
	///
	/// # Errors
	/// Returns an error if the ratio is outside `(0, 1]`.
	pub fn set_train_ratio(&mut self, train_ratio: f64) -> Result<(), ConfigError> {
		if !(train_ratio > 0.0 && train_ratio <= 1.0) {
			return Err(ConfigError::Validation(format!("train_ratio must be in (0, 1], got {train_ratio}")));
		}
		self.train_ratio = train_ratio;
		Ok(())
	}
}
