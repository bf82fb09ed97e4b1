use serde::Deserialize;

use crate::person::PersonRecord;

const SUMMARY_ENDPOINT: &str = "https://en.wikipedia.org/api/rest_v1/page/summary/";

/// Page title from a Wikipedia article URL: everything after `/wiki/`.
pub fn wiki_title(wikiurl: &str) -> Option<&str> {
    let (_, title) = wikiurl.split_once("/wiki/")?;
    let title = title.split(['#', '?']).next().unwrap_or(title);
    (!title.is_empty()).then_some(title)
}

/// REST summary endpoint for a person, if they have a Wikipedia link.
pub fn summary_url(person: &PersonRecord) -> Option<String> {
    let title = wiki_title(person.wikiurl.as_deref()?)?;
    Some(format!("{SUMMARY_ENDPOINT}{title}"))
}

/// The subset of the page summary shown on reveal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WikiSummary {
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
    #[serde(default)]
    pub extract: Option<String>,
    #[serde(default)]
    pub extract_html: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Thumbnail {
    pub source: String,
}

impl WikiSummary {
    pub fn portrait(&self) -> Option<&str> {
        self.thumbnail.as_ref().map(|t| t.source.as_str())
    }

    /// Plain-text biography.
    pub fn bio(&self) -> Option<&str> {
        self.extract.as_deref().filter(|s| !s.is_empty())
    }
}
