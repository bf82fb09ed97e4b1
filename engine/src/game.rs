//! Puzzle state machine.
//!
//! Single-stage: name a person born in the target year within a fixed
//! budget. Two-stage: first name someone born inside the period bounds,
//! then guess that person's exact birth year.
//!
//! ```text
//!   Single ──win──────────────▶ Finished(Won)
//!     └────budget spent──────▶ Finished(Exhausted)  (reveals a valid answer)
//!
//!   Name ──in-range match──▶ Year ──exact year──▶ Finished(Won)
//!     │                        └──budget spent──▶ Finished(Exhausted)  (reveals the year)
//!     └──budget spent──────────────────────────▶ Finished(Exhausted)
//! ```

use std::fmt;
use std::sync::Arc;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matcher::suggest;
use crate::normalize::normalize;
use crate::period::YearBounds;
use crate::person::PersonRecord;
use crate::roster::Roster;
use crate::select::pick_random;
use crate::share;

/// Rejected input. None of these consume a guess.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuessError {
    #[error("type a guess first")]
    Empty,
    #[error("\"{0}\" is not a year")]
    NotAYear(String),
    #[error("the game is over")]
    GameOver,
    #[error("still loading data, try again in a moment")]
    StillLoading,
    #[error("data failed to load: {0}")]
    LoadFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Name anyone born in the target year
    #[default]
    Single,
    /// Name someone from the period, then their exact year
    Staged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessLimits {
    pub single: u32,
    pub name: u32,
    pub year: u32,
}

impl Default for GuessLimits {
    fn default() -> Self {
        GuessLimits {
            single: 5,
            name: 5,
            year: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Single,
    Name,
    Year,
    Finished(Ending),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Ending {
    Won,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Earlier,
    Later,
}

impl Direction {
    /// `Earlier` when `guess` is before `truth`.
    pub fn of(guess: i64, truth: i64) -> Self {
        if guess < truth { Self::Earlier } else { Self::Later }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Earlier => "earlier",
            Self::Later => "later",
        }
    }
}

// ── Guess history ────────────────────────────────────────────────────────

/// One entry of the guess log, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuessOutcome {
    /// Nobody in the data matches the text
    NotFound { guess: String },
    /// Known person born outside the active bounds
    OutsideRange { name: String, birthyear: String },
    /// Known person, wrong birth year (single-stage)
    WrongPerson {
        name: String,
        years_off: u64,
        direction: Direction,
    },
    /// Wrong exact year (two-stage)
    YearHint { year: i64, direction: Direction },
    Correct { name: String },
    ExactYear { name: String, year: i64 },
    /// Budget spent; one of the valid answers is shown
    OutOfGuesses { name: String, year: i64 },
    /// Year budget spent; the true year is shown
    Revealed { name: String, birthyear: String },
}

impl GuessOutcome {
    /// Reveal entries are not guesses.
    pub fn consumed_guess(&self) -> bool {
        !matches!(self, Self::OutOfGuesses { .. } | Self::Revealed { .. })
    }

    pub fn is_win(&self) -> bool {
        matches!(self, Self::Correct { .. } | Self::ExactYear { .. })
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::WrongPerson { direction, .. } | Self::YearHint { direction, .. } => Some(*direction),
            _ => None,
        }
    }
}

impl fmt::Display for GuessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { guess } => write!(f, "❌ \"{guess}\" — Not found."),
            Self::OutsideRange { name, birthyear } => {
                write!(f, "❌ {name} — born in {birthyear}, outside range.")
            }
            Self::WrongPerson {
                name,
                years_off,
                direction,
            } => {
                let plural = if *years_off == 1 { "" } else { "s" };
                write!(f, "❌ {name} — {years_off} year{plural} {}.", direction.as_str())
            }
            Self::YearHint { year, direction } => write!(f, "❌ {year} — {}.", direction.as_str()),
            Self::Correct { name } => write!(f, "✅ {name} — Correct!"),
            Self::ExactYear { name, year } => write!(f, "✅ {name} — {year}"),
            Self::OutOfGuesses { name, year } => {
                write!(f, "🛑 Out of guesses. Here’s someone born in {year}: {name}.")
            }
            Self::Revealed { name, birthyear } => write!(f, "🛑 Revealed: {name} — {birthyear}"),
        }
    }
}

/// What a guess did, for the caller to present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// Negative outcome; the game goes on
    Missed(GuessOutcome),
    /// Name stage passed; now guess this person's year within `bounds`
    Identified {
        person: PersonRecord,
        bounds: YearBounds,
    },
    Won { person: PersonRecord },
    /// Budget spent. `reveal` is absent when the name stage ran out.
    Exhausted { reveal: Option<PersonRecord> },
}

// ── Puzzle ───────────────────────────────────────────────────────────────

/// The state of one puzzle. Replaced wholesale for a new period or day.
#[derive(Debug, Clone)]
pub struct PuzzleState {
    roster: Arc<Roster>,
    variant: Variant,
    limits: GuessLimits,
    bounds: YearBounds,
    target_year: Option<i64>,
    valid_answers: Vec<usize>,
    candidate_pool: Vec<usize>,
    stage: Stage,
    name_guesses: u32,
    year_guesses: u32,
    history: Vec<GuessOutcome>,
    current_person: Option<usize>,
    revealed: Option<usize>,
}

impl PuzzleState {
    /// Single-stage puzzle around `target_year`. `pool` (roster indices)
    /// feeds autocomplete; `bounds` is the period the year was drawn from.
    pub fn single(
        roster: Arc<Roster>,
        target_year: i64,
        bounds: YearBounds,
        pool: Vec<usize>,
        limits: GuessLimits,
    ) -> Self {
        let valid_answers = roster.born_in(target_year).to_vec();
        tracing::debug!(target_year, valid = valid_answers.len(), "single-stage puzzle");
        Self::fresh(
            roster,
            Variant::Single,
            limits,
            bounds,
            Some(target_year),
            valid_answers,
            pool,
            Stage::Single,
        )
    }

    /// Two-stage puzzle over `bounds`; any person can be named.
    pub fn staged(roster: Arc<Roster>, bounds: YearBounds, limits: GuessLimits) -> Self {
        let valid_answers = roster.within(bounds);
        let pool = roster.all();
        tracing::debug!(%bounds, valid = valid_answers.len(), "two-stage puzzle");
        Self::fresh(
            roster,
            Variant::Staged,
            limits,
            bounds,
            None,
            valid_answers,
            pool,
            Stage::Name,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn fresh(
        roster: Arc<Roster>,
        variant: Variant,
        limits: GuessLimits,
        bounds: YearBounds,
        target_year: Option<i64>,
        valid_answers: Vec<usize>,
        candidate_pool: Vec<usize>,
        stage: Stage,
    ) -> Self {
        PuzzleState {
            roster,
            variant,
            limits,
            bounds,
            target_year,
            valid_answers,
            candidate_pool,
            stage,
            name_guesses: 0,
            year_guesses: 0,
            history: Vec::new(),
            current_person: None,
            revealed: None,
        }
    }

    /// Apply one raw guess.
    ///
    /// Empty input, non-numeric year guesses and guesses after the end are
    /// rejected without touching the state.
    pub fn guess<R: RngCore + ?Sized>(&mut self, raw: &str, rng: &mut R) -> Result<Turn, GuessError> {
        if self.is_over() {
            return Err(GuessError::GameOver);
        }
        let guess = normalize(raw);
        if guess.is_empty() {
            return Err(GuessError::Empty);
        }

        let turn = match (self.stage, self.target_year) {
            (Stage::Single, Some(target)) => self.guess_single(raw, &guess, target, rng),
            (Stage::Name, _) => self.guess_name(raw, &guess),
            (Stage::Year, Some(target)) => self.guess_year(raw, target)?,
            _ => return Err(GuessError::GameOver),
        };
        tracing::debug!(stage = ?self.stage, history = self.history.len(), "guess applied");
        Ok(turn)
    }

    fn guess_single<R: RngCore + ?Sized>(&mut self, raw: &str, guess: &str, target: i64, rng: &mut R) -> Turn {
        self.name_guesses += 1;

        if let Some(idx) = self.roster.find_match(&self.valid_answers, guess) {
            let person = self.person(idx);
            self.history.push(GuessOutcome::Correct {
                name: person.name.clone(),
            });
            self.revealed = Some(idx);
            self.stage = Stage::Finished(Ending::Won);
            return Turn::Won { person };
        }

        let outcome = match self.roster.find_dated_match(guess) {
            Some((idx, year)) => GuessOutcome::WrongPerson {
                name: self.person(idx).name,
                years_off: year.abs_diff(target),
                direction: Direction::of(year, target),
            },
            None => GuessOutcome::NotFound {
                guess: raw.trim().to_string(),
            },
        };
        self.history.push(outcome.clone());

        if self.name_guesses < self.limits.single {
            return Turn::Missed(outcome);
        }

        self.stage = Stage::Finished(Ending::Exhausted);
        self.revealed = pick_random(&self.valid_answers, rng).copied();
        let reveal = self.revealed.map(|idx| self.person(idx));
        if let Some(person) = &reveal {
            self.history.push(GuessOutcome::OutOfGuesses {
                name: person.name.clone(),
                year: target,
            });
        }
        Turn::Exhausted { reveal }
    }

    fn guess_name(&mut self, raw: &str, guess: &str) -> Turn {
        let found = self
            .roster
            .find_match(&self.candidate_pool, guess)
            .map(|idx| (idx, self.person(idx)));

        let outcome = match found {
            Some((idx, person)) => match person.year() {
                Some(year) if self.bounds.contains(year) => {
                    self.current_person = Some(idx);
                    self.target_year = Some(year);
                    self.stage = Stage::Year;
                    return Turn::Identified {
                        person,
                        bounds: self.bounds,
                    };
                }
                _ => GuessOutcome::OutsideRange {
                    name: person.name,
                    birthyear: person.birthyear,
                },
            },
            None => GuessOutcome::NotFound {
                guess: raw.trim().to_string(),
            },
        };

        self.name_guesses += 1;
        self.history.push(outcome.clone());
        if self.name_guesses >= self.limits.name {
            self.stage = Stage::Finished(Ending::Exhausted);
            return Turn::Exhausted { reveal: None };
        }
        Turn::Missed(outcome)
    }

    fn guess_year(&mut self, raw: &str, target: i64) -> Result<Turn, GuessError> {
        let trimmed = raw.trim();
        let year: i64 = trimmed
            .parse()
            .map_err(|_| GuessError::NotAYear(trimmed.to_string()))?;
        let person = self.current_person.map(|idx| self.person(idx));
        let name = person.as_ref().map(|p| p.name.clone()).unwrap_or_default();

        if year == target {
            self.history.push(GuessOutcome::ExactYear { name, year });
            self.revealed = self.current_person;
            self.stage = Stage::Finished(Ending::Won);
            return Ok(match person {
                Some(person) => Turn::Won { person },
                None => Turn::Exhausted { reveal: None },
            });
        }

        self.year_guesses += 1;
        if self.year_guesses >= self.limits.year {
            let birthyear = person
                .as_ref()
                .map(|p| p.birthyear.clone())
                .unwrap_or_else(|| target.to_string());
            self.history.push(GuessOutcome::Revealed { name, birthyear });
            self.revealed = self.current_person;
            self.stage = Stage::Finished(Ending::Exhausted);
            return Ok(Turn::Exhausted { reveal: person });
        }

        let outcome = GuessOutcome::YearHint {
            year,
            direction: Direction::of(year, target),
        };
        self.history.push(outcome.clone());
        Ok(Turn::Missed(outcome))
    }

    fn person(&self, idx: usize) -> PersonRecord {
        self.roster.get(idx).cloned().unwrap_or_else(|| PersonRecord::new("", ""))
    }

    // ── accessors ────────────────────────────────────────────────────

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_over(&self) -> bool {
        matches!(self.stage, Stage::Finished(_))
    }

    pub fn is_won(&self) -> bool {
        self.stage == Stage::Finished(Ending::Won)
    }

    pub fn bounds(&self) -> YearBounds {
        self.bounds
    }

    /// Single-stage: the puzzle year. Two-stage: the identified person's
    /// year, once the name stage is passed.
    pub fn target_year(&self) -> Option<i64> {
        self.target_year
    }

    pub fn valid_answers(&self) -> Vec<&PersonRecord> {
        self.valid_answers.iter().filter_map(|&i| self.roster.get(i)).collect()
    }

    pub fn candidate_pool(&self) -> &[usize] {
        &self.candidate_pool
    }

    pub fn current_person(&self) -> Option<&PersonRecord> {
        self.current_person.and_then(|i| self.roster.get(i))
    }

    /// Person disclosed at the end of the game, win or lose.
    pub fn revealed(&self) -> Option<&PersonRecord> {
        self.revealed.and_then(|i| self.roster.get(i))
    }

    pub fn name_guesses(&self) -> u32 {
        self.name_guesses
    }

    pub fn year_guesses(&self) -> u32 {
        self.year_guesses
    }

    pub fn history(&self) -> &[GuessOutcome] {
        &self.history
    }

    /// Guesses spent so far, including the name that passed the name stage
    /// and the winning guess.
    pub fn guesses_used(&self) -> u32 {
        match self.variant {
            Variant::Single => self.name_guesses,
            Variant::Staged => {
                self.name_guesses
                    + self.year_guesses
                    + u32::from(self.current_person.is_some())
                    + u32::from(self.is_won())
            }
        }
    }

    pub fn max_guesses(&self) -> u32 {
        match self.variant {
            Variant::Single => self.limits.single,
            Variant::Staged => self.limits.name + self.limits.year,
        }
    }

    /// Guesses left in the current stage.
    pub fn remaining(&self) -> u32 {
        match self.stage {
            Stage::Single => self.limits.single.saturating_sub(self.name_guesses),
            Stage::Name => self.limits.name.saturating_sub(self.name_guesses),
            Stage::Year => self.limits.year.saturating_sub(self.year_guesses),
            Stage::Finished(_) => 0,
        }
    }

    /// What the player is asked right now.
    pub fn prompt(&self) -> String {
        let b = self.bounds;
        match (self.stage, self.target_year) {
            (Stage::Single, Some(year)) => format!("Guess someone born in {year}"),
            (Stage::Name, _) => format!("Guess someone born between {} and {}", b.start, b.end),
            (Stage::Year, _) => format!("Now guess the exact year between {} and {}.", b.start, b.end),
            (Stage::Finished(Ending::Won), _) => "Solved!".to_string(),
            _ => "Out of guesses.".to_string(),
        }
    }

    /// Autocomplete over the candidate pool.
    pub fn suggest(&self, query: &str, min_chars: usize, limit: usize) -> Vec<&PersonRecord> {
        suggest(&self.roster, &self.candidate_pool, query, min_chars, limit)
    }

    /// Header of the share text: the puzzle year, or the bounds for two-stage.
    pub fn share_title(&self, puzzle_name: &str) -> String {
        match (self.variant, self.target_year) {
            (Variant::Single, Some(year)) => format!("{puzzle_name} {year}"),
            _ => format!("{puzzle_name} {}", self.bounds),
        }
    }

    pub fn share_text(&self, puzzle_name: &str, url: Option<&str>) -> String {
        share::share_text(
            &self.share_title(puzzle_name),
            self.guesses_used(),
            self.max_guesses(),
            &self.history,
            url,
        )
    }
}
