//! Where the people list comes from: a local file, the session cache, or
//! the spreadsheet endpoint, in that order.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bornle_engine::cache::{CacheWrite, read_cached, write_cached};
use bornle_engine::person::{LoadError, PersonRecord, parse_people};
use bornle_engine::reveal::{WikiSummary, summary_url};
use bornle_engine::GameConfig;
use thiserror::Error;

use crate::store::DirStore;

const TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        source: Box<ureq::Error>,
    },
    #[error("cannot read response from {url}: {source}")]
    Body { url: String, source: std::io::Error },
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("no cached people list and --offline was given")]
    Offline,
}

/// How to obtain the people list.
pub struct Source<'a> {
    pub data: Option<&'a Path>,
    pub offline: bool,
    pub config: &'a GameConfig,
}

impl Source<'_> {
    pub fn load(&self, store: &mut DirStore) -> Result<Vec<PersonRecord>, FetchError> {
        if let Some(path) = self.data {
            let json = std::fs::read_to_string(path).map_err(|source| FetchError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let people = parse_people(&json)?;
            tracing::info!(path = %path.display(), people = people.len(), "loaded data file");
            return Ok(people);
        }

        if let Some(people) = read_cached(store, &self.config.cache_key) {
            tracing::info!(key = %self.config.cache_key, people = people.len(), "cache hit");
            return Ok(people);
        }
        if self.offline {
            return Err(FetchError::Offline);
        }

        let people = fetch_people(&self.config.sheet_url)?;
        match write_cached(store, &self.config.cache_key, &people, self.config.cache_limit_bytes) {
            CacheWrite::Stored => tracing::debug!(key = %self.config.cache_key, "cached people list"),
            CacheWrite::TooLarge(bytes) => tracing::info!(bytes, "people list not cached: too large"),
            CacheWrite::Rejected(reason) => tracing::info!(%reason, "people list not cached"),
        }
        Ok(people)
    }
}

fn agent() -> ureq::Agent {
    ureq::AgentBuilder::new().timeout(TIMEOUT).build()
}

fn get_text(url: &str) -> Result<String, FetchError> {
    let resp = agent().get(url).call().map_err(|e| FetchError::Http {
        url: url.to_string(),
        source: Box::new(e),
    })?;
    resp.into_string().map_err(|source| FetchError::Body {
        url: url.to_string(),
        source,
    })
}

/// Download and clean the sheet.
pub fn fetch_people(url: &str) -> Result<Vec<PersonRecord>, FetchError> {
    tracing::info!(%url, "fetching people list");
    let body = get_text(url)?;
    let people = parse_people(&body)?;
    tracing::info!(people = people.len(), "fetched people list");
    Ok(people)
}

/// Wikipedia summary for the reveal. Cosmetic: every failure is `None`.
pub fn fetch_summary(person: &PersonRecord) -> Option<WikiSummary> {
    let url = summary_url(person)?;
    let resp = match agent().get(&url).call() {
        Ok(resp) => resp,
        Err(e) => {
            tracing::debug!(%url, error = %e, "summary lookup failed");
            return None;
        }
    };
    resp.into_json()
        .map_err(|e| tracing::debug!(%url, error = %e, "unreadable summary"))
        .ok()
}

#[cfg(test)]
mod tests {
    use bornle_engine::cache::SessionStore;

    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("bornle-source-test-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(&root).unwrap();
        root
    }

    /// Config whose sheet URL cannot be reached, so any fetch fails fast.
    fn unreachable() -> GameConfig {
        GameConfig {
            sheet_url: "http://127.0.0.1:9/people".to_string(),
            ..GameConfig::default()
        }
    }

    const SHEET: &str = r#"[
        {"name": "Isaac Newton", "birthyear": "1643", "wikiurl": "https://en.wikipedia.org/wiki/Isaac_Newton"},
        {"name": "", "birthyear": "1700"},
        {"name": "Ada Lovelace", "birthyear": 1815}
    ]"#;

    #[test]
    fn test_data_file_wins_over_cache() {
        let root = scratch("data");
        let path = root.join("people.json");
        std::fs::write(&path, SHEET).unwrap();
        let config = unreachable();
        let mut store = DirStore::new(root.join("cache"));
        store.set(&config.cache_key, r#"[{"name": "Cached", "birthyear": "1"}]"#).unwrap();

        let source = Source {
            data: Some(path.as_path()),
            offline: true,
            config: &config,
        };
        let people = source.load(&mut store).unwrap();
        let names: Vec<&str> = people.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Isaac Newton", "Ada Lovelace"]);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_cache_hit_skips_fetch() {
        let root = scratch("cache");
        let config = unreachable();
        let mut store = DirStore::new(&root);
        let cached = vec![PersonRecord::new("Marie Curie", "1867")];
        assert_eq!(
            write_cached(&mut store, &config.cache_key, &cached, config.cache_limit_bytes),
            CacheWrite::Stored
        );

        let source = Source {
            data: None,
            offline: false,
            config: &config,
        };
        assert_eq!(source.load(&mut store).unwrap(), cached);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_offline_with_empty_cache() {
        let root = scratch("offline");
        let config = unreachable();
        let mut store = DirStore::new(&root);
        let source = Source {
            data: None,
            offline: true,
            config: &config,
        };
        assert!(matches!(source.load(&mut store), Err(FetchError::Offline)));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_bad_data_files() {
        let root = scratch("bad");
        let config = unreachable();
        let mut store = DirStore::new(root.join("cache"));

        let empty = root.join("empty.json");
        std::fs::write(&empty, "[]").unwrap();
        let source = Source {
            data: Some(empty.as_path()),
            offline: true,
            config: &config,
        };
        assert!(matches!(source.load(&mut store), Err(FetchError::Load(LoadError::Empty))));

        let garbled = root.join("garbled.json");
        std::fs::write(&garbled, "{not json").unwrap();
        let source = Source {
            data: Some(garbled.as_path()),
            ..source
        };
        assert!(matches!(source.load(&mut store), Err(FetchError::Load(LoadError::Parse(_)))));

        let missing = root.join("missing.json");
        let source = Source {
            data: Some(missing.as_path()),
            ..source
        };
        assert!(matches!(source.load(&mut store), Err(FetchError::Io { .. })));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_unreachable_sheet_is_an_http_error() {
        let root = scratch("http");
        let config = unreachable();
        let mut store = DirStore::new(&root);
        let source = Source {
            data: None,
            offline: false,
            config: &config,
        };
        assert!(matches!(source.load(&mut store), Err(FetchError::Http { .. })));
        assert!(store.keys().is_empty());
        let _ = std::fs::remove_dir_all(&root);
    }
}
