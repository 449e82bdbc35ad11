/// Padding token placed `n` times before every sentence.
pub const START: &str = "<s>";

/// Token appended once after every sentence.
pub const END: &str = "<e>";

/// Placeholder substituted for words outside the vocabulary.
pub const UNKNOWN: &str = "<unk>";

