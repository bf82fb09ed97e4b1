use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::normalize::normalize;

// ── Person record ────────────────────────────────────────────────────────

/// One row of the people sheet, trimmed to the columns the game uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub name: String,
    /// Birth year as written in the sheet, e.g. "1643", "-384", "c. 1500"
    pub birthyear: String,
    /// Comma-separated alternative names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wikiurl: Option<String>,
}

impl PersonRecord {
    pub fn new(name: &str, birthyear: &str) -> Self {
        Self {
            name: name.to_string(),
            birthyear: birthyear.to_string(),
            aliases: None,
            wikiurl: None,
        }
    }

    pub fn with_aliases(mut self, aliases: &str) -> Self {
        self.aliases = Some(aliases.to_string());
        self
    }

    pub fn with_wikiurl(mut self, url: &str) -> Self {
        self.wikiurl = Some(url.to_string());
        self
    }

    /// Numeric birth year, if the sheet value coerces to one.
    pub fn year(&self) -> Option<i64> {
        parse_year(&self.birthyear)
    }

    /// Normalized, non-empty aliases.
    pub fn alias_list(&self) -> Vec<String> {
        self.aliases
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(normalize)
            .filter(|a| !a.is_empty())
            .collect()
    }
}

// ── Year coercion ────────────────────────────────────────────────────────

static NON_YEAR_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\d-]").expect("year digits regex"));
static LEADING_MINUSES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-+").expect("leading minus regex"));

/// Coerce a sheet birth year to an integer.
///
/// Drops everything except ASCII digits and `-`, collapses a leading run of
/// `-` to one, then parses. "1,643" → 1643, "--384" → -384. Values that
/// are empty or still not an integer after stripping ("1500-1600") are `None`.
pub fn parse_year(raw: &str) -> Option<i64> {
    let digits = NON_YEAR_CHARS.replace_all(raw, "");
    let signed = LEADING_MINUSES.replace(&digits, "-");
    signed.parse().ok()
}

// ── Sheet rows ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("people data is not a JSON array of rows: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no usable rows in people data")]
    Empty,
}

/// A raw sheet row. Every column may be missing, null, a string or a number.
#[derive(Debug, Deserialize)]
struct SheetRow {
    #[serde(default)]
    name: Value,
    #[serde(default)]
    birthyear: Value,
    #[serde(default)]
    aliases: Value,
    #[serde(default)]
    wikiurl: Value,
}

/// Text content of a sheet cell; empty strings and nulls are absent.
fn cell_text(value: Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Keep rows that have both a name and a birth year, trimmed to the used columns.
pub fn clean_rows(rows: Vec<Value>) -> Vec<PersonRecord> {
    rows.into_iter()
        .filter_map(|row| serde_json::from_value::<SheetRow>(row).ok())
        .filter_map(|row| {
            let name = cell_text(row.name)?;
            let birthyear = cell_text(row.birthyear)?;
            Some(PersonRecord {
                name,
                birthyear,
                aliases: cell_text(row.aliases),
                wikiurl: cell_text(row.wikiurl),
            })
        })
        .collect()
}

/// Parse the body of the people endpoint.
pub fn parse_people(json: &str) -> Result<Vec<PersonRecord>, LoadError> {
    let rows: Vec<Value> = serde_json::from_str(json)?;
    let total = rows.len();
    let people = clean_rows(rows);
    tracing::debug!(total, kept = people.len(), "cleaned people rows");
    if people.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(people)
}
