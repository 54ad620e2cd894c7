use unicode_normalization::UnicodeNormalization;

/// Canonical comparison form: NFD, combining marks stripped, whitespace
/// collapsed and trimmed, lower-cased.
///
/// Total over any input; `normalize("")` is `""`.
pub fn normalize(text: &str) -> String {
    let stripped: String = text.nfd().filter(|c| !is_combining_diacritic(*c)).collect();
    let lowered = stripped.to_lowercase();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Combining Diacritical Marks block (U+0300..=U+036F).
fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}
