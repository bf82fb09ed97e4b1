use std::sync::Arc;

use rand::RngCore;

use crate::config::GameConfig;
use crate::game::{GuessError, PuzzleState, Turn, Variant};
use crate::period::{PeriodKey, available_periods, rolling_window};
use crate::person::PersonRecord;
use crate::roster::Roster;
use crate::select::{DailyStrategy, PuzzleDate, SelectError, pick_calendar, pick_daily, pick_random};

/// One player's game: the loaded data plus the active puzzle.
#[derive(Debug, Clone)]
pub struct Session {
    roster: Arc<Roster>,
    config: GameConfig,
    variant: Variant,
    strategy: DailyStrategy,
    period: PeriodKey,
    date: PuzzleDate,
    puzzle: PuzzleState,
}

impl Session {
    pub fn start<R: RngCore + ?Sized>(
        people: Vec<PersonRecord>,
        config: GameConfig,
        variant: Variant,
        strategy: DailyStrategy,
        period: PeriodKey,
        date: PuzzleDate,
        rng: &mut R,
    ) -> Result<Self, SelectError> {
        let roster = Arc::new(Roster::new(people));
        let puzzle = build_puzzle(&roster, &config, variant, strategy, period, date, rng)?;
        Ok(Session {
            roster,
            config,
            variant,
            strategy,
            period,
            date,
            puzzle,
        })
    }

    /// Replace the active puzzle with a fresh one for `period` on `date`.
    /// On error the current puzzle is left as it was.
    pub fn reset<R: RngCore + ?Sized>(
        &mut self,
        period: PeriodKey,
        date: PuzzleDate,
        rng: &mut R,
    ) -> Result<(), SelectError> {
        let puzzle = build_puzzle(&self.roster, &self.config, self.variant, self.strategy, period, date, rng)?;
        tracing::debug!(%period, %date, "puzzle reset");
        self.puzzle = puzzle;
        self.period = period;
        self.date = date;
        Ok(())
    }

    pub fn guess<R: RngCore + ?Sized>(&mut self, raw: &str, rng: &mut R) -> Result<Turn, GuessError> {
        self.puzzle.guess(raw, rng)
    }

    pub fn puzzle(&self) -> &PuzzleState {
        &self.puzzle
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn period(&self) -> PeriodKey {
        self.period
    }

    pub fn date(&self) -> PuzzleDate {
        self.date
    }

    pub fn periods(&self) -> Vec<(PeriodKey, usize)> {
        available_periods(&self.roster)
    }

    pub fn suggest(&self, query: &str) -> Vec<&PersonRecord> {
        self.puzzle
            .suggest(query, self.config.suggest_min_chars, self.config.suggest_limit)
    }

    pub fn share_text(&self, url: Option<&str>) -> String {
        self.puzzle.share_text(&self.config.puzzle_name, url)
    }
}

fn build_puzzle<R: RngCore + ?Sized>(
    roster: &Arc<Roster>,
    config: &GameConfig,
    variant: Variant,
    strategy: DailyStrategy,
    period: PeriodKey,
    date: PuzzleDate,
    rng: &mut R,
) -> Result<PuzzleState, SelectError> {
    let day_index = date.day_index(config.epoch);
    let limits = config.limits();

    match (variant, period) {
        (Variant::Single, PeriodKey::Daily) => {
            let years = roster.years();
            let year = match strategy {
                DailyStrategy::SeededShuffle => pick_daily(&years, &config.daily_salt, day_index),
                DailyStrategy::Calendar => pick_calendar(&years, date).copied(),
            }
            .ok_or(SelectError::NoYears)?;
            tracing::debug!(year, day_index, ?strategy, "daily year");
            Ok(PuzzleState::single(
                Arc::clone(roster),
                year,
                period.bounds(),
                roster.all(),
                limits,
            ))
        }
        (Variant::Single, _) => {
            let bounds = period.bounds();
            let years = roster.years_in(bounds);
            let year = *pick_random(&years, rng).ok_or(SelectError::NoDataForPeriod(period))?;
            Ok(PuzzleState::single(
                Arc::clone(roster),
                year,
                bounds,
                roster.within(bounds),
                limits,
            ))
        }
        (Variant::Staged, PeriodKey::Daily) => {
            let bounds =
                rolling_window(&roster.years(), day_index, config.window_span).ok_or(SelectError::NoYears)?;
            Ok(PuzzleState::staged(Arc::clone(roster), bounds, limits))
        }
        (Variant::Staged, _) => {
            let bounds = period.bounds();
            if roster.years_in(bounds).is_empty() {
                return Err(SelectError::NoDataForPeriod(period));
            }
            Ok(PuzzleState::staged(Arc::clone(roster), bounds, limits))
        }
    }
}

// ── Load lifecycle ───────────────────────────────────────────────────────

/// The session as seen by the UI while the people list is loading.
#[derive(Debug, Clone, Default)]
pub enum SessionSlot {
    #[default]
    Loading,
    /// Loading failed; the message is shown to the player
    Failed(String),
    Ready(Box<Session>),
}

impl SessionSlot {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Ready(s) => Some(s),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        match self {
            Self::Ready(s) => Some(s),
            _ => None,
        }
    }

    /// Guesses before the data arrives are told to wait, not dropped.
    pub fn guess<R: RngCore + ?Sized>(&mut self, raw: &str, rng: &mut R) -> Result<Turn, GuessError> {
        match self {
            Self::Loading => Err(GuessError::StillLoading),
            Self::Failed(msg) => Err(GuessError::LoadFailed(msg.clone())),
            Self::Ready(s) => s.guess(raw, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Stage;
    use crate::period::YearBounds;
    use crate::rng::Mulberry32;

    fn people() -> Vec<PersonRecord> {
        vec![
            PersonRecord::new("Aristotle", "-384"),
            PersonRecord::new("Isaac Newton", "1643"),
            PersonRecord::new("Johann Sebastian Bach", "1685").with_aliases("J.S. Bach, Bach"),
            PersonRecord::new("Ada Lovelace", "1815"),
            PersonRecord::new("Albert Einstein", "1879"),
            PersonRecord::new("Louis Armstrong", "1901"),
            PersonRecord::new("Walt Disney", "1901"),
        ]
    }

    fn date(y: i32, m: u32, d: u32) -> PuzzleDate {
        PuzzleDate::new(y, m, d).unwrap()
    }

    fn start(variant: Variant, strategy: DailyStrategy, period: PeriodKey, on: PuzzleDate) -> Session {
        Session::start(
            people(),
            GameConfig::default(),
            variant,
            strategy,
            period,
            on,
            &mut Mulberry32::new(9),
        )
        .unwrap()
    }

    #[test]
    fn test_daily_is_reproducible() {
        let d = date(2025, 7, 4);
        for strategy in [DailyStrategy::SeededShuffle, DailyStrategy::Calendar] {
            let a = start(Variant::Single, strategy, PeriodKey::Daily, d);
            let b = start(Variant::Single, strategy, PeriodKey::Daily, d);
            assert_eq!(a.puzzle().target_year(), b.puzzle().target_year());
            let year = a.puzzle().target_year().unwrap();
            assert!(a.puzzle().valid_answers().iter().all(|p| p.year() == Some(year)));
            assert_eq!(a.puzzle().candidate_pool().len(), 7);
        }
    }

    #[test]
    fn test_calendar_daily_advances_one_year_per_day() {
        let roster = Roster::new(people());
        let years = roster.years();
        let today = start(Variant::Single, DailyStrategy::Calendar, PeriodKey::Daily, date(2025, 7, 4));
        let tomorrow = start(Variant::Single, DailyStrategy::Calendar, PeriodKey::Daily, date(2025, 7, 5));
        let i = years.iter().position(|y| Some(*y) == today.puzzle().target_year()).unwrap();
        let j = years.iter().position(|y| Some(*y) == tomorrow.puzzle().target_year()).unwrap();
        assert_eq!(j, (i + 1) % years.len());
    }

    #[test]
    fn test_period_puzzle_scopes_pool() {
        let s = start(Variant::Single, DailyStrategy::SeededShuffle, PeriodKey::Twentieth, date(2025, 7, 4));
        assert_eq!(s.puzzle().target_year(), Some(1901));
        assert_eq!(s.puzzle().candidate_pool().len(), 2);
        assert_eq!(s.puzzle().valid_answers().len(), 2);
        assert!(s.suggest("newt").is_empty());
        assert_eq!(s.suggest("walt").len(), 1);
    }

    #[test]
    fn test_staged_daily_window() {
        let s = start(Variant::Staged, DailyStrategy::SeededShuffle, PeriodKey::Daily, date(2025, 1, 1));
        // Years span -384..1901; day 0 starts the window at the earliest year
        assert_eq!(s.puzzle().bounds(), YearBounds::new(-384, -335));
        assert_eq!(s.puzzle().stage(), Stage::Name);
        assert_eq!(s.puzzle().valid_answers().len(), 1);
    }

    #[test]
    fn test_reset_replaces_puzzle_wholesale() {
        let mut rng = Mulberry32::new(3);
        let mut s = start(Variant::Staged, DailyStrategy::SeededShuffle, PeriodKey::EarlyModern, date(2025, 7, 4));
        s.guess("zorro", &mut rng).unwrap();
        s.guess("newton", &mut rng).unwrap();
        assert_eq!(s.puzzle().stage(), Stage::Year);

        s.reset(PeriodKey::Nineteenth, date(2025, 7, 4), &mut rng).unwrap();
        assert_eq!(s.period(), PeriodKey::Nineteenth);
        assert_eq!(s.puzzle().stage(), Stage::Name);
        assert!(s.puzzle().history().is_empty());
        assert!(s.puzzle().current_person().is_none());
        assert_eq!(s.puzzle().name_guesses(), 0);
    }

    #[test]
    fn test_reset_to_empty_period_keeps_current_puzzle() {
        let mut rng = Mulberry32::new(3);
        let mut s = start(Variant::Single, DailyStrategy::SeededShuffle, PeriodKey::Daily, date(2025, 7, 4));
        let before = s.puzzle().target_year();
        assert_eq!(
            s.reset(PeriodKey::Medieval, date(2025, 7, 4), &mut rng),
            Err(SelectError::NoDataForPeriod(PeriodKey::Medieval))
        );
        assert_eq!(s.period(), PeriodKey::Daily);
        assert_eq!(s.puzzle().target_year(), before);
    }

    #[test]
    fn test_periods_listed_with_data_only() {
        let s = start(Variant::Single, DailyStrategy::SeededShuffle, PeriodKey::Daily, date(2025, 7, 4));
        let keys: Vec<PeriodKey> = s.periods().into_iter().map(|(k, _)| k).collect();
        assert!(!keys.contains(&PeriodKey::Medieval));
        assert!(keys.contains(&PeriodKey::Ancient));
    }

    #[test]
    fn test_slot_lifecycle() {
        let mut rng = Mulberry32::new(1);
        let mut slot = SessionSlot::default();
        assert_eq!(slot.guess("bach", &mut rng), Err(GuessError::StillLoading));

        let mut failed = SessionSlot::Failed("network down".into());
        assert_eq!(
            failed.guess("bach", &mut rng),
            Err(GuessError::LoadFailed("network down".into()))
        );

        slot = SessionSlot::Ready(Box::new(start(
            Variant::Single,
            DailyStrategy::SeededShuffle,
            PeriodKey::Twentieth,
            date(2025, 7, 4),
        )));
        assert!(matches!(slot.guess("armstrong", &mut rng), Ok(Turn::Won { .. })));
    }

    #[test]
    fn test_empty_roster_cannot_start() {
        let err = Session::start(
            vec![PersonRecord::new("Mystery", "unknown")],
            GameConfig::default(),
            Variant::Single,
            DailyStrategy::SeededShuffle,
            PeriodKey::Daily,
            date(2025, 7, 4),
            &mut Mulberry32::new(1),
        )
        .unwrap_err();
        assert_eq!(err, SelectError::NoYears);
    }
}
