/// Splits a sentence into lower-cased word tokens.
///
/// - Words are runs of alphanumeric characters; an apostrophe between two
///   alphanumeric characters stays inside the word (`don't`).
/// - Any other non-whitespace character is a token of its own (`.`, `,`, `!`).
/// - Whitespace only separates tokens.
pub fn tokenize(sentence: &str) -> Vec<String> {
	let chars: Vec<char> = sentence.chars().flat_map(char::to_lowercase).collect();
	let mut tokens = Vec::new();
	let mut word = String::new();

	for (i, &c) in chars.iter().enumerate() {
		if c.is_alphanumeric() {
			word.push(c);
			continue;
		}
		let inner_apostrophe = c == '\''
			&& !word.is_empty()
			&& chars.get(i + 1).is_some_and(|next| next.is_alphanumeric());
		if inner_apostrophe {
			word.push(c);
			continue;
		}
		if !word.is_empty() {
			tokens.push(std::mem::take(&mut word));
		}
		if !c.is_whitespace() {
			tokens.push(c.to_string());
		}
	}
	if !word.is_empty() {
		tokens.push(word);
	}
	tokens
}

/// Tokenizes every sentence, keeping their order.
pub fn tokenize_sentences<S: AsRef<str>>(sentences: &[S]) -> Vec<Vec<String>> {
	sentences.iter().map(|s| tokenize(s.as_ref())).collect()
}
