//! Free-text name matching.
//!
//! One policy serves every game variant. A normalized guess identifies a
//! person when it equals
//!   1. the full name, with or without its leading titles,
//!   2. one of the aliases,
//!   3. the surname (last token after titles and a trailing I–X numeral),
//!   4. a single whole token of the title-stripped name, if the guess is one
//!      token of at least four characters,
//!   5. or, for a multi-token guess, when every guess token is a whole token
//!      of the title-stripped name.
//!
//! A title word on its own ("king", "saint") never identifies anyone.

use crate::normalize::{normalize, tokens};
use crate::person::PersonRecord;
use crate::roster::Roster;
use crate::titles::{strip_titles, surname};

/// Single-token guesses shorter than this never match a name token.
pub const MIN_TOKEN_GUESS: usize = 4;

/// Precomputed comparison forms of one person's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameKey {
    /// Normalized name as written, titles included
    pub full: String,
    /// Normalized name with leading titles removed
    pub stripped: String,
    /// Tokens of `stripped`
    pub tokens: Vec<String>,
    pub surname: String,
    pub aliases: Vec<String>,
}

impl NameKey {
    pub fn new(person: &PersonRecord) -> Self {
        let stripped = normalize(&strip_titles(&person.name));
        NameKey {
            full: normalize(&person.name),
            tokens: tokens(&stripped).into_iter().map(str::to_string).collect(),
            stripped,
            surname: surname(&person.name),
            aliases: person.alias_list(),
        }
    }

    /// Whether an already-normalized guess identifies this person.
    pub fn accepts(&self, guess: &str) -> bool {
        if guess.is_empty() {
            return false;
        }
        if guess == self.full || guess == self.stripped || guess == self.surname {
            return true;
        }
        if self.aliases.iter().any(|a| a == guess) {
            return true;
        }

        let guess_tokens = tokens(guess);
        match guess_tokens.as_slice() {
            [] => false,
            [single] => single.len() >= MIN_TOKEN_GUESS && self.has_token(single),
            many => many.iter().all(|t| self.has_token(t)),
        }
    }

    /// Whether this person's name, surname or an alias starts with the
    /// normalized query.
    pub fn has_prefix(&self, query: &str) -> bool {
        self.stripped.starts_with(query)
            || self.surname.starts_with(query)
            || self.aliases.iter().any(|a| a.starts_with(query))
    }

    fn has_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }
}

/// Does `raw_guess` identify `person`? Empty guesses never match.
pub fn matches(person: &PersonRecord, raw_guess: &str) -> bool {
    NameKey::new(person).accepts(&normalize(raw_guess))
}

/// Autocomplete candidates from `pool` (roster indices) for a partial name.
///
/// Queries shorter than `min_chars` return nothing. Results keep pool order,
/// skip repeated names and stop at `limit`.
pub fn suggest<'a>(
    roster: &'a Roster,
    pool: &[usize],
    query: &str,
    min_chars: usize,
    limit: usize,
) -> Vec<&'a PersonRecord> {
    if query.trim().chars().count() < min_chars {
        return Vec::new();
    }
    let q = normalize(query);
    if q.is_empty() {
        return Vec::new();
    }

    let mut out: Vec<&PersonRecord> = Vec::new();
    for &idx in pool {
        if out.len() >= limit {
            break;
        }
        let (Some(person), Some(key)) = (roster.get(idx), roster.key(idx)) else {
            continue;
        };
        if key.has_prefix(&q) && !out.iter().any(|p| p.name == person.name) {
            out.push(person);
        }
    }
    out
}
