//! Deterministic choice of the day's puzzle.
//!
//! Two strategies: a calendar seed (`year*10000 + month*100 + day`) taken
//! modulo the list length, and a salted Fisher–Yates shuffle whose order is
//! fixed per salt, indexed by days since a fixed epoch. Both are pure
//! functions of their inputs.

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::period::PeriodKey;
use crate::rng::{Mulberry32, index_below, unit};

/// Salt of the published daily rotation.
pub const DAILY_SALT: &str = "bornle-v1";

/// Day zero of the daily rotation.
pub const EPOCH: PuzzleDate = PuzzleDate {
    year: 2025,
    month: 1,
    day: 1,
};

const MS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("no birth years in the loaded data")]
    NoYears,
    #[error("no data for period {0}")]
    NoDataForPeriod(PeriodKey),
    #[error("unknown period: {0}")]
    UnknownPeriod(String),
    #[error("invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

// ── Calendar date ────────────────────────────────────────────────────────

/// A proleptic Gregorian calendar date, as read from the player's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PuzzleDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl PuzzleDate {
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        let valid = (1..=12).contains(&month) && day >= 1 && day <= days_in_month(year, month);
        valid.then_some(PuzzleDate { year, month, day })
    }

    /// UTC date of a Unix timestamp in milliseconds.
    pub fn from_unix_millis(ms: i64) -> Self {
        Self::from_days(ms.div_euclid(MS_PER_DAY))
    }

    /// Date `days` after 1970-01-01.
    pub fn from_days(days: i64) -> Self {
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z - era * 146_097;
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
        let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
        let year = (yoe + era * 400 + i64::from(month <= 2)) as i32;
        PuzzleDate { year, month, day }
    }

    /// Days since 1970-01-01 (negative before).
    pub fn days(&self) -> i64 {
        let y = i64::from(self.year) - i64::from(self.month <= 2);
        let era = y.div_euclid(400);
        let yoe = y - era * 400;
        let m = i64::from(self.month);
        let mp = (m + 9) % 12;
        let doy = (153 * mp + 2) / 5 + i64::from(self.day) - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        era * 146_097 + doe - 719_468
    }

    /// Whole days elapsed since `epoch` (negative before it).
    pub fn day_index(&self, epoch: PuzzleDate) -> i64 {
        self.days() - epoch.days()
    }

    pub fn succ(&self) -> Self {
        Self::from_days(self.days() + 1)
    }

    /// `year*10000 + month*100 + day`, month 1-based.
    pub fn calendar_seed(&self) -> i64 {
        i64::from(self.year) * 10_000 + i64::from(self.month) * 100 + i64::from(self.day)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
        2 => 28,
        _ => 0,
    }
}

impl fmt::Display for PuzzleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for PuzzleDate {
    type Err = SelectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SelectError::InvalidDate(s.to_string());
        let mut parts = s.trim().splitn(3, '-');
        let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        let year = y.parse().map_err(|_| invalid())?;
        let month = m.parse().map_err(|_| invalid())?;
        let day = d.parse().map_err(|_| invalid())?;
        PuzzleDate::new(year, month, day).ok_or_else(invalid)
    }
}

impl TryFrom<String> for PuzzleDate {
    type Error = SelectError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PuzzleDate> for String {
    fn from(d: PuzzleDate) -> String {
        d.to_string()
    }
}

// ── Strategies ───────────────────────────────────────────────────────────

/// How the daily puzzle is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyStrategy {
    /// Salted shuffle indexed by days since the epoch
    #[default]
    SeededShuffle,
    /// Calendar seed modulo list length
    Calendar,
}

/// Index of the calendar-seeded puzzle in a list of `len` items.
pub fn calendar_index(date: PuzzleDate, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(date.calendar_seed().rem_euclid(len as i64) as usize)
}

/// Fisher–Yates shuffle driven by Mulberry32 seeded from `salt`.
pub fn shuffle_with_seed<T: Clone>(items: &[T], salt: &str) -> Vec<T> {
    let mut rng = Mulberry32::from_salt(salt);
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = (unit(&mut rng) * (i + 1) as f64) as usize;
        out.swap(i, j);
    }
    out
}

/// The `day_index`-th element of the salted shuffle, wrapping around.
pub fn pick_daily<T: Clone>(items: &[T], salt: &str, day_index: i64) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    let shuffled = shuffle_with_seed(items, salt);
    let idx = day_index.rem_euclid(shuffled.len() as i64) as usize;
    shuffled.into_iter().nth(idx)
}

pub fn pick_calendar<T>(items: &[T], date: PuzzleDate) -> Option<&T> {
    calendar_index(date, items.len()).and_then(|i| items.get(i))
}

/// Uniform choice from an injected random source.
pub fn pick_random<'a, T, R: RngCore + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(index_below(rng, items.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> PuzzleDate {
        PuzzleDate::new(y, m, d).unwrap()
    }

    // ── PuzzleDate ───────────────────────────────────────────────────

    #[test]
    fn test_civil_day_counts() {
        assert_eq!(date(1970, 1, 1).days(), 0);
        assert_eq!(date(2025, 1, 1).days(), 20_089);
        assert_eq!(date(1969, 12, 31).days(), -1);
        assert_eq!(PuzzleDate::from_days(20_089), date(2025, 1, 1));
        assert_eq!(PuzzleDate::from_days(-1), date(1969, 12, 31));
    }

    #[test]
    fn test_from_unix_millis() {
        // 2025-03-01T12:00:00Z
        assert_eq!(PuzzleDate::from_unix_millis(1_740_830_400_000), date(2025, 3, 1));
        assert_eq!(PuzzleDate::from_unix_millis(-1), date(1969, 12, 31));
    }

    #[test]
    fn test_day_index_follows_utc_clock() {
        // 2025-03-02T04:30:00Z, still March 1st in New York
        let today = PuzzleDate::from_unix_millis(1_740_889_800_000);
        assert_eq!(today, date(2025, 3, 2));
        assert_eq!(today.day_index(EPOCH), 60);
    }

    #[test]
    fn test_day_index_and_succ() {
        assert_eq!(EPOCH.day_index(EPOCH), 0);
        assert_eq!(date(2025, 3, 1).day_index(EPOCH), 59);
        assert_eq!(date(2024, 12, 31).day_index(EPOCH), -1);
        assert_eq!(date(2024, 2, 28).succ(), date(2024, 2, 29));
        assert_eq!(date(2025, 12, 31).succ(), date(2026, 1, 1));
    }

    #[test]
    fn test_parse_and_validate() {
        assert_eq!("2025-07-04".parse::<PuzzleDate>().unwrap(), date(2025, 7, 4));
        assert_eq!(date(2025, 7, 4).to_string(), "2025-07-04");
        assert!("2025-02-29".parse::<PuzzleDate>().is_err());
        assert!("2024-02-29".parse::<PuzzleDate>().is_ok());
        assert!("2025-13-01".parse::<PuzzleDate>().is_err());
        assert!("yesterday".parse::<PuzzleDate>().is_err());
    }

    // ── calendar seed ────────────────────────────────────────────────

    #[test]
    fn test_calendar_seed() {
        assert_eq!(date(2025, 7, 4).calendar_seed(), 20_250_704);
    }

    #[test]
    fn test_calendar_same_date_same_target() {
        let years = [1643, 1685, 1791, 1815, 1879];
        let d = date(2025, 7, 4);
        assert_eq!(pick_calendar(&years, d), pick_calendar(&years, d));
    }

    #[test]
    fn test_calendar_advances_by_day_delta() {
        let len = 7;
        let d = date(2025, 7, 4);
        let today = calendar_index(d, len).unwrap();
        for delta in 1..=5 {
            let later = PuzzleDate::new(2025, 7, 4 + delta).unwrap();
            assert_eq!(calendar_index(later, len).unwrap(), (today + delta as usize) % len);
        }
        assert_eq!(calendar_index(d, 0), None);
    }

    // ── seeded shuffle ───────────────────────────────────────────────

    #[test]
    fn test_shuffle_is_a_permutation() {
        let items: Vec<i64> = (1..=20).collect();
        let mut shuffled = shuffle_with_seed(&items, DAILY_SALT);
        assert_ne!(shuffled, items);
        shuffled.sort();
        assert_eq!(shuffled, items);
    }

    #[test]
    fn test_shuffle_reproducible() {
        let items: Vec<i64> = (1..=10).collect();
        // Order fixed by the salt, independent of call order
        let a = shuffle_with_seed(&items, DAILY_SALT);
        let _ = shuffle_with_seed(&items, "other-salt");
        let b = shuffle_with_seed(&items, DAILY_SALT);
        assert_eq!(a, b);
        assert_eq!(a, vec![10, 4, 8, 7, 1, 3, 6, 9, 5, 2]);
    }

    #[test]
    fn test_pick_daily_rotates_through_full_cycle() {
        let items: Vec<i64> = (1..=10).collect();
        let shuffled = shuffle_with_seed(&items, DAILY_SALT);
        let picks: Vec<i64> = (0..10).map(|d| pick_daily(&items, DAILY_SALT, d).unwrap()).collect();
        assert_eq!(picks, shuffled);
        assert_eq!(pick_daily(&items, DAILY_SALT, 10), pick_daily(&items, DAILY_SALT, 0));
        assert_eq!(pick_daily(&items, DAILY_SALT, -1), Some(shuffled[9]));
        assert_eq!(pick_daily::<i64>(&[], DAILY_SALT, 3), None);
    }

    #[test]
    fn test_pick_random_uses_injected_source() {
        let items = ["a", "b", "c"];
        let mut r1 = Mulberry32::new(7);
        let mut r2 = Mulberry32::new(7);
        assert_eq!(pick_random(&items, &mut r1), pick_random(&items, &mut r2));
        assert_eq!(pick_random::<&str, _>(&[], &mut r1), None);
    }
}
