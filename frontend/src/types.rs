use bornle_engine::cache::{CacheWrite, SessionStore, read_cached, write_cached};
use bornle_engine::person::parse_people;
use bornle_engine::reveal::{WikiSummary, summary_url};
use bornle_engine::rng::Mulberry32;
use bornle_engine::{GameConfig, PersonRecord, PuzzleDate};
use leptos::logging;
use wasm_bindgen_futures::JsFuture;

// ── sessionStorage ───────────────────────────────────────────────────────────

/// `window.sessionStorage`, when the browser allows it.
pub struct BrowserStore(web_sys::Storage);

impl BrowserStore {
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.session_storage().ok()??;
        Some(BrowserStore(storage))
    }
}

impl SessionStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.0.set_item(key, value).map_err(|e| format!("{e:?}"))
    }

    fn keys(&self) -> Vec<String> {
        let len = self.0.length().unwrap_or(0);
        (0..len).filter_map(|i| self.0.key(i).ok().flatten()).collect()
    }

    fn remove(&mut self, key: &str) {
        let _ = self.0.remove_item(key);
    }
}

// ── people list ──────────────────────────────────────────────────────────────

async fn fetch_text(url: &str) -> Result<String, String> {
    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(format!("{url}: HTTP {}", resp.status()));
    }
    resp.text().await.map_err(|e| e.to_string())
}

/// Cached list if this tab already has one, else the sheet.
pub async fn load_people(config: &GameConfig) -> Result<Vec<PersonRecord>, String> {
    let mut store = BrowserStore::open();
    if let Some(people) = store.as_ref().and_then(|s| read_cached(s, &config.cache_key)) {
        return Ok(people);
    }

    let body = fetch_text(&config.sheet_url).await?;
    let people = parse_people(&body).map_err(|e| e.to_string())?;

    if let Some(store) = store.as_mut() {
        match write_cached(store, &config.cache_key, &people, config.cache_limit_bytes) {
            CacheWrite::Stored => {}
            CacheWrite::TooLarge(bytes) => logging::log!("people list not cached ({bytes} bytes)"),
            CacheWrite::Rejected(reason) => logging::warn!("skipping cache: {reason}"),
        }
    }
    Ok(people)
}

// ── reveal ───────────────────────────────────────────────────────────────────

/// Portrait and bio; `None` on any failure.
pub async fn fetch_summary(person: PersonRecord) -> Option<WikiSummary> {
    let url = summary_url(&person)?;
    let body = fetch_text(&url).await.ok()?;
    serde_json::from_str(&body).ok()
}

// ── browser helpers ──────────────────────────────────────────────────────────

/// Today's UTC date, so every player shares the same puzzle day.
pub fn utc_today() -> PuzzleDate {
    PuzzleDate::from_unix_millis(js_sys::Date::now() as i64)
}

/// Fresh random source for period picks and reveals.
pub fn fresh_rng() -> Mulberry32 {
    Mulberry32::new((js_sys::Math::random() * 4_294_967_296.0) as u32)
}

pub fn page_url() -> Option<String> {
    web_sys::window()?.location().href().ok()
}

pub async fn copy_to_clipboard(text: String) -> Result<(), String> {
    let window = web_sys::window().ok_or("no window")?;
    let promise = window.navigator().clipboard().write_text(&text);
    JsFuture::from(promise).await.map(|_| ()).map_err(|e| format!("{e:?}"))
}
