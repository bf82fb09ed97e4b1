//! Game engine for Bornle, the birth-year guessing game.
//!
//! Everything here is pure and I/O-free: callers hand in the people list,
//! the calendar date and a random source, and get back puzzle state and
//! text to show. The CLI and the web frontend share this crate.

pub mod cache;
pub mod config;
pub mod game;
pub mod matcher;
pub mod normalize;
pub mod period;
pub mod person;
pub mod reveal;
pub mod rng;
pub mod roster;
pub mod select;
pub mod session;
pub mod share;
pub mod titles;

pub use config::GameConfig;
pub use game::{Direction, GuessError, GuessLimits, GuessOutcome, PuzzleState, Stage, Turn, Variant};
pub use period::{PeriodKey, YearBounds};
pub use person::{LoadError, PersonRecord};
pub use roster::Roster;
pub use select::{DailyStrategy, PuzzleDate, SelectError};
pub use session::{Session, SessionSlot};
