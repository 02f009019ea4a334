const MIN_KEYWORD_LEN: usize = 3;

pub const STOP_WORDS: [&str; 39] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "what", "when", "where", "why", "how", "this", "that", "these",
    "those",
];

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Lowercases `text`, turns punctuation into separators and keeps the tokens that
/// are neither stop words nor shorter than three characters.
///
/// Order and duplicates are preserved.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_KEYWORD_LEN && !is_stop_word(token))
        .map(str::to_string)
        .collect()
}
