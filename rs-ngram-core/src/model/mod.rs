//! Top-level module for the n-gram language model.
//!
//! The engine, leaves first:
//! - Frequency tables of fixed-order n-grams (`FrequencyTable`)
//! - Add-k smoothed probabilities and distributions (`estimator`)
//! - Next-word prediction (`predictor`)
//! - Perplexity scoring (`perplexity`)
//! - Dense count/probability matrix (`DistributionMatrix`)
//!
//! And the collaborators feeding it:
//! - Tokenization (`tokenizer`)
//! - Vocabulary building and unknown-word substitution (`Vocabulary`)
//! - Seeded train/test splitting (`dataset`)
//! - A trained multi-order bundle (`LanguageModel`)

/// Reserved sentinel tokens.
pub mod token;

/// Fixed-order n-gram counting with boundary padding.
///
/// Handles sentence padding, window counting, parallel counting
/// and merging of partial tables.
pub mod frequency_table;

/// Add-k smoothed conditional probabilities.
pub mod estimator;

/// Most likely next word, for one model or a cascade of orders.
pub mod predictor;

/// Geometric-mean inverse probability of a sentence.
pub mod perplexity;

/// Dense context x word matrix for inspection.
pub mod matrix;

/// Known-word set with a stable enumeration order.
pub mod vocabulary;

/// Lower-casing word tokenizer.
pub mod tokenizer;

/// Seeded train/test split and end-to-end dataset preparation.
pub mod dataset;

/// Vocabulary, smoothing constant and tables of every order, trained together.
pub mod language_model;
