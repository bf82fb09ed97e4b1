use unicode_normalization::UnicodeNormalization;

/// Canonical comparison form of free text.
///
/// Decomposes the input and drops combining marks (U+0300–U+036F) so
/// accented letters fold to their base letter, removes everything that is
/// not an ASCII letter, digit or whitespace, collapses whitespace runs to a
/// single space, then lowercases and trims.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    folded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

/// Whitespace tokens of an already-normalized string.
pub fn tokens(normalized: &str) -> Vec<&str> {
    normalized.split(' ').filter(|t| !t.is_empty()).collect()
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}
