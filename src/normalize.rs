/// Canonical token set for a display name: trimmed, ASCII-lowercased,
/// stripped of everything outside `[A-Za-z0-9 ]`, split on whitespace.
/// Runs of spaces left behind by stripped punctuation never produce empty
/// tokens. The result is sorted and deduplicated so downstream set
/// operations iterate deterministically.
pub fn tokenize_name(name: &str) -> Vec<String> {
    let filtered: String = name
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect::<String>()
        .to_ascii_lowercase();
    let mut tokens: Vec<String> = filtered.split_whitespace().map(str::to_owned).collect();
    tokens.sort();
    tokens.dedup();
    tokens
}
