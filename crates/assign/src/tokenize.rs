use crate::normalize::normalize;

/// Connector words of the source locale dropped from token lists.
pub const STOP_WORDS: [&str; 9] = ["da", "de", "do", "das", "dos", "e", "d", "di", "du"];

/// Characters turned into spaces before splitting.
const VALUE_SEPARATORS: [char; 4] = ['|', ',', ';', '/'];

/// Split normalized text into comparison tokens.
///
/// Order of first occurrence is kept and duplicates are not removed;
/// callers only test membership.
pub fn tokenize(text: &str) -> Vec<String> {
    let spaced: String = normalize(text)
        .chars()
        .map(|c| if VALUE_SEPARATORS.contains(&c) { ' ' } else { c })
        .collect();

    spaced
        .split(is_token_boundary)
        .map(str::trim)
        .filter(|token| !token.is_empty() && !is_stop_word(token))
        .map(String::from)
        .collect()
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

fn is_token_boundary(c: char) -> bool {
    c.is_whitespace() || c == '-' || c == '_' || c == '/'
}
