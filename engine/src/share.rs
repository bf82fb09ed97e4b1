//! Shareable result text.
//!
//! The symbols are part of the published share format: 🟩 for the winning
//! guess, ⬆️/⬇️ for earlier/later hints, ⬛ for everything else.

use crate::game::{Direction, GuessOutcome};

pub const WIN: &str = "🟩";
pub const EARLIER: &str = "⬆️";
pub const LATER: &str = "⬇️";
pub const MISS: &str = "⬛";

pub fn emoji(outcome: &GuessOutcome) -> &'static str {
    if outcome.is_win() {
        return WIN;
    }
    match outcome.direction() {
        Some(Direction::Earlier) => EARLIER,
        Some(Direction::Later) => LATER,
        None => MISS,
    }
}

pub fn emoji_line(history: &[GuessOutcome]) -> String {
    history.iter().map(emoji).collect::<Vec<_>>().join(" ")
}

/// `"<title> • <used>/<max>"`, a blank line, the emoji line, and the page
/// URL after another blank line when given.
pub fn share_text(title: &str, used: u32, max: u32, history: &[GuessOutcome], url: Option<&str>) -> String {
    let mut text = format!("{title} • {used}/{max}\n\n{}", emoji_line(history));
    if let Some(url) = url {
        text.push_str("\n\n");
        text.push_str(url);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> Vec<GuessOutcome> {
        vec![
            GuessOutcome::NotFound { guess: "zorro".into() },
            GuessOutcome::WrongPerson {
                name: "Ernest Hemingway".into(),
                years_off: 2,
                direction: Direction::Earlier,
            },
            GuessOutcome::YearHint {
                year: 1950,
                direction: Direction::Later,
            },
            GuessOutcome::Correct { name: "Walt Disney".into() },
        ]
    }

    #[test]
    fn test_emoji_mapping() {
        assert_eq!(emoji_line(&history()), "⬛ ⬆️ ⬇️ 🟩");
        let reveal = GuessOutcome::Revealed {
            name: "Isaac Newton".into(),
            birthyear: "1643".into(),
        };
        assert_eq!(emoji(&reveal), MISS);
        assert_eq!(emoji_line(&[]), "");
    }

    #[test]
    fn test_share_text_layout() {
        assert_eq!(
            share_text("Bornle 1901", 4, 5, &history(), None),
            "Bornle 1901 • 4/5\n\n⬛ ⬆️ ⬇️ 🟩"
        );
        assert_eq!(
            share_text("Bornle 1901", 1, 5, &history()[3..], Some("https://example.org/bornle")),
            "Bornle 1901 • 1/5\n\n🟩\n\nhttps://example.org/bornle"
        );
    }
}
