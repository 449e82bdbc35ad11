use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;

/// Reads a text file and returns its whole content.
pub fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents)
}

/// Splits raw text into sentences, one per line.
///
/// - Splits on `\n` / `\r\n`
/// - Trims surrounding whitespace
/// - Drops empty lines
pub fn split_sentences(text: &str) -> Vec<String> {
	text.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.map(str::to_owned)
		.collect()
}

/// Reads a corpus file and returns its non-empty sentences.
pub fn read_sentences<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	Ok(split_sentences(&read_file(filename)?))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn split_sentences_trims_and_drops_blank_lines() {
		let text = "  first line \r\n\n   \nsecond\n";
		assert_eq!(split_sentences(text), vec!["first line", "second"]);
	}

	#[test]
	fn read_sentences_from_temp_file() {
		let path = std::env::temp_dir().join("rs_ngram_io_test_sentences.txt");
		let mut f = File::create(&path).unwrap();
		writeln!(f, "I like cats").unwrap();
		writeln!(f).unwrap();
		writeln!(f, "  I like dogs  ").unwrap();
		drop(f);

		let result = read_sentences(&path);
		let _ = std::fs::remove_file(&path);
		assert_eq!(result.unwrap(), vec!["I like cats", "I like dogs"]);
	}

	#[test]
	fn read_missing_file_is_io_error() {
		assert!(read_file("/nonexistent/rs_ngram_never_exists.txt").is_err());
	}
}
