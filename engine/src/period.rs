//! Static table of historical periods a puzzle can be scoped to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::roster::Roster;
use crate::select::SelectError;

// ── Year bounds ──────────────────────────────────────────────────────────

/// Inclusive range of birth years. `i64::MIN`/`i64::MAX` stand for an open end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearBounds {
    pub start: i64,
    pub end: i64,
}

impl YearBounds {
    pub const UNBOUNDED: YearBounds = YearBounds {
        start: i64::MIN,
        end: i64::MAX,
    };

    /// Bounds from two years given in either order.
    pub fn new(a: i64, b: i64) -> Self {
        YearBounds {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn contains(&self, year: i64) -> bool {
        self.start <= year && year <= self.end
    }
}

impl fmt::Display for YearBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = if self.start == i64::MIN {
            "-∞".to_string()
        } else {
            self.start.to_string()
        };
        let end = if self.end == i64::MAX {
            "∞".to_string()
        } else {
            self.end.to_string()
        };
        write!(f, "{start}–{end}")
    }
}

// ── Period ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKey {
    /// Whole data set, rotated daily
    Daily,
    Ancient,
    Medieval,
    EarlyModern,
    Nineteenth,
    Twentieth,
}

impl PeriodKey {
    /// Display order of the period buttons.
    pub const ALL: [PeriodKey; 6] = [
        Self::Daily,
        Self::Ancient,
        Self::Medieval,
        Self::EarlyModern,
        Self::Nineteenth,
        Self::Twentieth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Ancient => "ancient",
            Self::Medieval => "medieval",
            Self::EarlyModern => "early_modern",
            Self::Nineteenth => "nineteenth",
            Self::Twentieth => "twentieth",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "Daily (randomized)",
            Self::Ancient => "Ancient History (800 BCE–499 CE)",
            Self::Medieval => "Medieval (500–1499)",
            Self::EarlyModern => "Early Modern (1500–1799)",
            Self::Nineteenth => "19th Century (1800–1899)",
            Self::Twentieth => "20th Century (1900–1999)",
        }
    }

    pub fn bounds(&self) -> YearBounds {
        match self {
            Self::Daily => YearBounds::UNBOUNDED,
            Self::Ancient => YearBounds::new(-800, 499),
            Self::Medieval => YearBounds::new(500, 1499),
            Self::EarlyModern => YearBounds::new(1500, 1799),
            Self::Nineteenth => YearBounds::new(1800, 1899),
            Self::Twentieth => YearBounds::new(1900, 1999),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodKey {
    type Err = SelectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s.trim())
            .ok_or_else(|| SelectError::UnknownPeriod(s.to_string()))
    }
}

/// Periods that contain at least one birth year, with their distinct year counts.
pub fn available_periods(roster: &Roster) -> Vec<(PeriodKey, usize)> {
    PeriodKey::ALL
        .into_iter()
        .map(|p| (p, roster.years_in(p.bounds()).len()))
        .filter(|(_, n)| *n > 0)
        .collect()
}

/// A `span`-year window over the range of `years` that shifts by one year
/// per day. Data covering fewer than `span` years yields the whole range.
pub fn rolling_window(years: &[i64], day_index: i64, span: i64) -> Option<YearBounds> {
    let min = *years.iter().min()?;
    let max = *years.iter().max()?;
    // Widened so extreme sheet years cannot overflow
    let positions = (i128::from(max) - i128::from(min) + 1) - i128::from(span) + 1;
    if span < 1 || positions < 1 {
        return Some(YearBounds::new(min, max));
    }
    let start = i128::from(min) + i128::from(day_index).rem_euclid(positions);
    let start = i64::try_from(start).ok()?;
    Some(YearBounds::new(start, start + (span - 1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::PersonRecord;

    #[test]
    fn test_period_table_invariants() {
        for p in PeriodKey::ALL {
            let b = p.bounds();
            assert!(b.start <= b.end, "{p} has inverted bounds");
            assert_eq!(p.as_str().parse::<PeriodKey>().unwrap(), p);
        }
        assert!(PeriodKey::Ancient.bounds().contains(-800));
        assert!(!PeriodKey::Ancient.bounds().contains(500));
        assert!(PeriodKey::Daily.bounds().contains(i64::MIN));
    }

    #[test]
    fn test_unknown_period() {
        assert!(matches!(
            "jurassic".parse::<PeriodKey>(),
            Err(SelectError::UnknownPeriod(_))
        ));
    }

    #[test]
    fn test_bounds_display() {
        assert_eq!(YearBounds::new(1699, 1600).to_string(), "1600–1699");
        assert_eq!(YearBounds::UNBOUNDED.to_string(), "-∞–∞");
    }

    #[test]
    fn test_available_periods_hides_empty() {
        let roster = Roster::new(vec![
            PersonRecord::new("Isaac Newton", "1643"),
            PersonRecord::new("Albert Einstein", "1879"),
        ]);
        let keys: Vec<PeriodKey> = available_periods(&roster).into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            keys,
            vec![PeriodKey::Daily, PeriodKey::EarlyModern, PeriodKey::Nineteenth]
        );
    }

    #[test]
    fn test_rolling_window_wraps() {
        let years = [1600, 1700];
        // 101 years, span 50 → 52 start positions
        assert_eq!(rolling_window(&years, 0, 50), Some(YearBounds::new(1600, 1649)));
        assert_eq!(rolling_window(&years, 51, 50), Some(YearBounds::new(1651, 1700)));
        assert_eq!(rolling_window(&years, 52, 50), Some(YearBounds::new(1600, 1649)));
        assert_eq!(rolling_window(&years, -1, 50), Some(YearBounds::new(1651, 1700)));
    }

    #[test]
    fn test_rolling_window_full_i64_range() {
        let years = [i64::MIN, i64::MAX];
        assert_eq!(rolling_window(&years, 3, 50), Some(YearBounds::new(i64::MIN + 3, i64::MIN + 52)));
        assert_eq!(rolling_window(&years, -1, 50), Some(YearBounds::new(i64::MAX - 49, i64::MAX)));
    }

    #[test]
    fn test_rolling_window_narrow_data() {
        assert_eq!(rolling_window(&[1643], 7, 50), Some(YearBounds::new(1643, 1643)));
        assert_eq!(rolling_window(&[], 7, 50), None);
    }
}
