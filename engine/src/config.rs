use serde::{Deserialize, Serialize};

use crate::cache;
use crate::game::GuessLimits;
use crate::select::{DAILY_SALT, EPOCH, PuzzleDate};

/// Spreadsheet-backed people endpoint.
pub const SHEET_URL: &str = "https://opensheet.elk.sh/180LA6R_gcH-5VOgibikuolK7PiuzPtNE48sCLpvGuvc/people";

/// Tunables of a game session. Every field has a default, so a partial
/// JSON file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Name in the share text header
    pub puzzle_name: String,
    pub sheet_url: String,
    pub daily_salt: String,
    pub epoch: PuzzleDate,
    /// Single-stage guess budget
    pub max_guesses: u32,
    pub max_name_guesses: u32,
    pub max_year_guesses: u32,
    /// Width in years of the two-stage daily window
    pub window_span: i64,
    /// Bump to invalidate cached people lists
    pub cache_key: String,
    pub cache_limit_bytes: usize,
    pub suggest_limit: usize,
    pub suggest_min_chars: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        let limits = GuessLimits::default();
        GameConfig {
            puzzle_name: "Bornle".to_string(),
            sheet_url: SHEET_URL.to_string(),
            daily_salt: DAILY_SALT.to_string(),
            epoch: EPOCH,
            max_guesses: limits.single,
            max_name_guesses: limits.name,
            max_year_guesses: limits.year,
            window_span: 50,
            cache_key: format!("{}v5", cache::KEY_PREFIX),
            cache_limit_bytes: cache::DEFAULT_LIMIT_BYTES,
            suggest_limit: 15,
            suggest_min_chars: 3,
        }
    }
}

impl GameConfig {
    pub fn limits(&self) -> GuessLimits {
        GuessLimits {
            single: self.max_guesses,
            name: self.max_name_guesses,
            year: self.max_year_guesses,
        }
    }
}
