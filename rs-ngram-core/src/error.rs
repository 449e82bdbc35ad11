//! Errors returned by the n-gram engine.
//!
//! Every variant is a caller-input error detected at the start of the
//! operation that reports it. Nothing is retried and no shared table is
//! modified when an error is returned.

use std::fmt;

/// Errors produced by counting, estimation, prediction and scoring.
///
/// # Variants
///
/// - **InvalidArity**: an n-gram order below 1 was requested, or a model
///   order outside the trained range.
/// - **InvalidVocabulary**: the vocabulary is empty where a distribution must
///   be normalized, or contains a reserved sentinel.
/// - **InvalidSmoothing**: the smoothing constant `k` is not a positive finite number.
/// - **MalformedCounts**: the order-n and order-(n+1) tables passed together
///   do not have consecutive arities, or an empty table was given where the
///   arity must be inferred from its keys.
/// - **InvalidCorpus**: the corpus handed to a collaborator (splitter,
///   test-set scoring) cannot be used (empty, bad split ratio).
#[derive(Debug, Clone, PartialEq)]
pub enum NGramError {
	InvalidArity(usize),
	InvalidVocabulary(String),
	InvalidSmoothing(f64),
	MalformedCounts(String),
	InvalidCorpus(String),
}

impl fmt::Display for NGramError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			NGramError::InvalidArity(n) => write!(f, "invalid arity {n}, n must be >= 1"),
			NGramError::InvalidVocabulary(m) => write!(f, "invalid vocabulary: {m}"),
			NGramError::InvalidSmoothing(k) => write!(f, "invalid smoothing constant {k}, k must be > 0"),
			NGramError::MalformedCounts(m) => write!(f, "malformed counts: {m}"),
			NGramError::InvalidCorpus(m) => write!(f, "invalid corpus: {m}"),
		}
	}
}

impl std::error::Error for NGramError {}

/// Checks that `k` can be used as an add-k smoothing constant.
pub(crate) fn check_smoothing(k: f64) -> Result<(), NGramError> {
	if !k.is_finite() || k <= 0.0 {
		return Err(NGramError::InvalidSmoothing(k));
	}
	Ok(())
}
