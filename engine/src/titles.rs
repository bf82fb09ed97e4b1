use crate::normalize::normalize;

/// Honorifics that may precede a name and are ignored when matching.
/// Compared against the normalized token, so "Dr." and "dr" are the same.
pub const TITLE_WORDS: &[&str] = &[
    "sir", "dr", "mr", "mrs", "ms", "lord", "lady", // Forms of address
    "professor", "prof", "captain", // Rank
    "king", "queen", "prince", "princess", "duke", "duchess", // Nobility
    "saint", "st",
];

/// Regnal numerals dropped from the end of a name before taking the surname.
pub const ROMAN_NUMERALS: &[&str] = &["i", "ii", "iii", "iv", "v", "vi", "vii", "viii", "ix", "x"];

fn is_title(token: &str) -> bool {
    TITLE_WORDS.contains(&normalize(token).as_str())
}

fn is_roman_numeral(token: &str) -> bool {
    ROMAN_NUMERALS.contains(&normalize(token).as_str())
}

/// Remove leading title words from a full name.
///
/// Stops at the first non-title token and never removes the last token,
/// so "King" alone stays "King".
pub fn strip_titles(full_name: &str) -> String {
    let tokens: Vec<&str> = full_name.split_whitespace().collect();
    let mut i = 0;
    while i + 1 < tokens.len() && is_title(tokens[i]) {
        i += 1;
    }
    tokens[i..].join(" ")
}

/// Normalized surname: the last token of the title-stripped name, after
/// dropping a trailing Roman numeral (I–X).
///
/// Returns an empty string for an empty name.
pub fn surname(full_name: &str) -> String {
    let stripped = strip_titles(full_name);
    let mut parts: Vec<&str> = stripped.split_whitespace().collect();
    if parts.len() > 1 && parts.last().is_some_and(|p| is_roman_numeral(p)) {
        parts.pop();
    }
    parts.last().map(|p| normalize(p)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_leading_titles() {
        assert_eq!(strip_titles("Sir Isaac Newton"), "Isaac Newton");
        assert_eq!(strip_titles("Dr. Martin Luther King"), "Martin Luther King");
        assert_eq!(strip_titles("Saint Queen Margaret"), "Margaret");
    }

    #[test]
    fn test_strip_stops_at_first_non_title() {
        // "King" after a given name is part of the name
        assert_eq!(strip_titles("Martin Luther King"), "Martin Luther King");
    }

    #[test]
    fn test_strip_never_removes_last_token() {
        assert_eq!(strip_titles("King"), "King");
        assert_eq!(strip_titles("Lord Prince"), "Prince");
        assert_eq!(strip_titles(""), "");
    }

    #[test]
    fn test_surname_basic() {
        assert_eq!(surname("Johann Sebastian Bach"), "bach");
        assert_eq!(surname("Sir Isaac Newton"), "newton");
        assert_eq!(surname("Frédéric Chopin"), "chopin");
    }

    #[test]
    fn test_surname_drops_regnal_numeral() {
        assert_eq!(surname("King Henry VIII"), "henry");
        assert_eq!(surname("Louis ix"), "louis");
        // Only I–X are recognised
        assert_eq!(surname("Louis XIV"), "xiv");
    }

    #[test]
    fn test_surname_single_token() {
        assert_eq!(surname("Voltaire"), "voltaire");
        // A lone numeral is the whole name, not a suffix
        assert_eq!(surname("V"), "v");
        assert_eq!(surname(""), "");
    }
}
