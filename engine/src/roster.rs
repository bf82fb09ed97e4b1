use std::collections::BTreeMap;

use crate::matcher::NameKey;
use crate::period::YearBounds;
use crate::person::PersonRecord;

/// The loaded people list with per-person name keys and a birth-year index.
///
/// People are addressed by their position in the list. Those whose birth
/// year does not coerce to a number are kept for matching but appear in no
/// year index.
#[derive(Debug, Clone)]
pub struct Roster {
    people: Vec<PersonRecord>,
    keys: Vec<NameKey>,
    by_year: BTreeMap<i64, Vec<usize>>,
}

impl Roster {
    pub fn new(people: Vec<PersonRecord>) -> Self {
        let keys = people.iter().map(NameKey::new).collect();
        let mut by_year: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (idx, person) in people.iter().enumerate() {
            if let Some(year) = person.year() {
                by_year.entry(year).or_default().push(idx);
            }
        }
        Roster {
            people,
            keys,
            by_year,
        }
    }

    pub fn people(&self) -> &[PersonRecord] {
        &self.people
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&PersonRecord> {
        self.people.get(idx)
    }

    pub fn key(&self, idx: usize) -> Option<&NameKey> {
        self.keys.get(idx)
    }

    /// Distinct birth years, ascending.
    pub fn years(&self) -> Vec<i64> {
        self.by_year.keys().copied().collect()
    }

    /// Distinct birth years inside `bounds`, ascending.
    pub fn years_in(&self, bounds: YearBounds) -> Vec<i64> {
        self.by_year
            .keys()
            .copied()
            .filter(|y| bounds.contains(*y))
            .collect()
    }

    pub fn born_in(&self, year: i64) -> &[usize] {
        self.by_year.get(&year).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every person, in list order.
    pub fn all(&self) -> Vec<usize> {
        (0..self.people.len()).collect()
    }

    /// People born inside `bounds`, in list order.
    pub fn within(&self, bounds: YearBounds) -> Vec<usize> {
        self.people
            .iter()
            .enumerate()
            .filter(|(_, p)| p.year().is_some_and(|y| bounds.contains(y)))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// First person in `pool` whose name accepts the normalized guess.
    pub fn find_match(&self, pool: &[usize], guess: &str) -> Option<usize> {
        pool.iter()
            .copied()
            .find(|&idx| self.keys.get(idx).is_some_and(|k| k.accepts(guess)))
    }

    /// First person with a numeric birth year whose name accepts the guess.
    pub fn find_dated_match(&self, guess: &str) -> Option<(usize, i64)> {
        self.keys.iter().enumerate().find_map(|(idx, key)| {
            let year = self.people[idx].year()?;
            key.accepts(guess).then_some((idx, year))
        })
    }
}
