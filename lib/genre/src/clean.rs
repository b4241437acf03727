/// Normalise free text before feature extraction.
///
/// Lowercases, then drops every character that is neither an ASCII letter
/// nor whitespace. Digits and punctuation vanish without leaving a gap, so
/// "sci-fi" becomes "scifi".
pub fn clean_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect()
}

/// Split cleaned text into terms of two or more letters
pub(crate) fn tokens(cleaned: &str) -> impl Iterator<Item = &str> {
    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() >= 2)
}
