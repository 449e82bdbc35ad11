//! Smoothed n-gram language modelling.
//!
//! This crate provides a word-level n-gram engine including:
//! - Frequency tables of fixed-length word tuples with boundary padding
//! - Add-k smoothed conditional probabilities and next-word distributions
//! - Next-word prediction, alone or across a cascade of model orders
//! - Sentence perplexity scoring
//! - A dense count/probability matrix for inspection
//!
//! The collaborators that prepare the data (corpus loading, tokenization,
//! vocabulary building, train/test splitting) live next to the engine but
//! the engine itself only ever sees tokenized sentences and a finished
//! vocabulary.

/// Counting, estimation, prediction and scoring.
pub mod model;

/// Training parameters and their environment loading.
pub mod config;

/// Error type shared by every engine operation.
pub mod error;

/// Corpus file reading and sentence splitting.
pub mod io;

pub use error::NGramError;
