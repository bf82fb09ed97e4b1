//! Terminal game loop.

use std::io::{self, BufRead, Write};

use bornle_engine::{Session, Turn};
use rand::RngCore;

/// Lines starting with this ask for name suggestions instead of guessing.
const SUGGEST_PREFIX: char = '?';

/// Play until the puzzle ends or input runs out. Returns whether the game
/// reached its end.
pub fn play<I: BufRead, O: Write, R: RngCore + ?Sized>(
    session: &mut Session,
    input: I,
    out: &mut O,
    rng: &mut R,
) -> io::Result<bool> {
    writeln!(out, "{}  ({} left)", session.puzzle().prompt(), session.puzzle().remaining())?;

    for line in input.lines() {
        let line = line?;
        if let Some(query) = line.trim().strip_prefix(SUGGEST_PREFIX) {
            let names: Vec<&str> = session.suggest(query).into_iter().map(|p| p.name.as_str()).collect();
            if names.is_empty() {
                writeln!(out, "  (no suggestions)")?;
            }
            for name in names {
                writeln!(out, "  {name}")?;
            }
            continue;
        }

        match session.guess(&line, rng) {
            Ok(Turn::Missed(outcome)) => writeln!(out, "{outcome}")?,
            Ok(Turn::Identified { person, bounds }) => {
                writeln!(out, "✅ {} — born between {} and {}.", person.name, bounds.start, bounds.end)?
            }
            Ok(Turn::Won { .. } | Turn::Exhausted { .. }) => {
                if let Some(outcome) = session.puzzle().history().last() {
                    writeln!(out, "{outcome}")?;
                }
            }
            Err(e) => writeln!(out, "  {e}")?,
        }

        let puzzle = session.puzzle();
        if puzzle.is_over() {
            writeln!(out, "{}", puzzle.prompt())?;
            return Ok(true);
        }
        writeln!(out, "{}  ({} left)", puzzle.prompt(), puzzle.remaining())?;
    }
    Ok(false)
}
