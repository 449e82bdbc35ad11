use std::collections::HashMap;
use std::fmt;

use super::frequency_table::FrequencyTable;
use super::vocabulary::Vocabulary;
use crate::error::{NGramError, check_smoothing};

/// Dense view of an (n+1)-gram table: one row per n-gram context, one
/// column per word of the extended vocabulary.
///
/// Built for inspection only; prediction and scoring never go through it.
///
/// # Invariants
/// - Rows are the distinct truncated keys of the source table, sorted
/// - Columns are the vocabulary words then END and UNKNOWN
/// - `cells` is `rows.len()` x `columns.len()`
#[derive(Clone, Debug, PartialEq)]
pub struct DistributionMatrix {
	rows: Vec<Vec<String>>,
	columns: Vec<String>,
	row_index: HashMap<Vec<String>, usize>,
	column_index: HashMap<String, usize>,
	cells: Vec<Vec<f64>>,
}

impl DistributionMatrix {
	/// Raw counts of every (context, word) pair, 0 for unseen pairs.
	///
	/// N-grams whose last token is not in the extended vocabulary (START
	/// for instance) are left out.
	pub fn counts(counts_n1: &FrequencyTable, vocabulary: &Vocabulary) -> Self {
		let rows: Vec<Vec<String>> = counts_n1.contexts().into_iter().map(<[String]>::to_vec).collect();
		let columns: Vec<String> = vocabulary.extended().map(str::to_owned).collect();

		let row_index: HashMap<Vec<String>, usize> = rows.iter().cloned().enumerate().map(|(i, r)| (r, i)).collect();
		let column_index: HashMap<String, usize> = columns.iter().cloned().enumerate().map(|(j, c)| (c, j)).collect();

		let mut cells = vec![vec![0.0; columns.len()]; rows.len()];
		for (ngram, count) in counts_n1.iter() {
			let (word, context) = match ngram.split_last() {
				Some(split) => split,
				None => continue,
			};
			let Some(&j) = column_index.get(word) else {
				continue;
			};
			if let Some(&i) = row_index.get(context) {
				cells[i][j] = count as f64;
			}
		}

		Self { rows, columns, row_index, column_index, cells }
	}

	/// Add-k smoothed probabilities, each row normalized to 1.
	///
	/// Cell = `(count + k) / sum over the row of (count + k)`.
	///
	/// # Errors
	/// Returns [`NGramError::InvalidSmoothing`] if `k <= 0`.
	pub fn probabilities(counts_n1: &FrequencyTable, vocabulary: &Vocabulary, k: f64) -> Result<Self, NGramError> {
		check_smoothing(k)?;
		let mut matrix = Self::counts(counts_n1, vocabulary);
		for row in &mut matrix.cells {
			let total: f64 = row.iter().map(|c| c + k).sum();
			for cell in row.iter_mut() {
				*cell = (*cell + k) / total;
			}
		}
		Ok(matrix)
	}

	/// Contexts, in row order.
	pub fn rows(&self) -> &[Vec<String>] {
		&self.rows
	}

	/// Words, in column order.
	pub fn columns(&self) -> &[String] {
		&self.columns
	}

	/// The cells of the row for `context`.
	pub fn row(&self, context: &[String]) -> Option<&[f64]> {
		self.row_index.get(context).map(|&i| self.cells[i].as_slice())
	}

	/// The cell at (`context`, `word`).
	pub fn get(&self, context: &[String], word: &str) -> Option<f64> {
		let j = *self.column_index.get(word)?;
		self.row(context).map(|row| row[j])
	}
}

impl fmt::Display for DistributionMatrix {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let labels: Vec<String> = self
			.rows
			.iter()
			.map(|r| if r.is_empty() { "()".to_owned() } else { r.join(" ") })
			.collect();
		let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
		let width = self.columns.iter().map(|c| c.chars().count()).max().unwrap_or(0).max(6);

		write!(f, "{:label_width$}", "")?;
		for column in &self.columns {
			write!(f, " {column:>width$}")?;
		}
		writeln!(f)?;
		for (label, row) in labels.iter().zip(&self.cells) {
			write!(f, "{label:label_width$}")?;
			for cell in row {
				if cell.fract() == 0.0 {
					write!(f, " {:>width$}", *cell as u64)?;
				} else {
					write!(f, " {cell:>width$.4}")?;
				}
			}
			writeln!(f)?;
		}
		Ok(())
	}
}
