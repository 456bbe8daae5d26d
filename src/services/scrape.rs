//! Chapter and page-URL discovery for tapas.io comics.
//!
//! The HTML parsing is split into pure `parse_*` functions so discovery
//! is testable without a network; [`TapasClient`] wires them to a
//! blocking HTTP client.

use regex::Regex;
use scraper::{Html, Selector};
use std::time::Duration;

use dominant_color::PixelBuffer;

use crate::error::{FetchError, ScrapeError};
use crate::services::fetch::decode_page;

const BASE_URL: &str = "https://tapas.io";
const USER_AGENT: &str = "Magic Browser";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// The orchestrator's seam to the outside world: chapter discovery,
/// page-URL discovery and page download+decode.
///
/// `fetch_page` returns `Ok(None)` for pages that decode to a non-color
/// image; those are dropped silently by the pipeline.
pub trait PageProvider: Sync {
    /// Ordered chapter identifiers for the configured comic.
    fn chapters(&self) -> Result<Vec<String>, ScrapeError>;

    /// Ordered page image URLs for one chapter.
    fn page_urls(&self, chapter: &str) -> Result<Vec<String>, ScrapeError>;

    /// Download and decode one page image.
    fn fetch_page(&self, url: &str) -> Result<Option<PixelBuffer>, FetchError>;
}

/// Extract chapter ids from an episode page.
///
/// Chapter ids live in an inline `<script>` containing the
/// `episodeList` JSON blob; each entry carries an `"id":<digits>` pair.
/// Returns `None` when no such script exists on the page.
pub fn parse_chapter_ids(html: &str) -> Option<Vec<String>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script").unwrap();
    let id_regex = Regex::new(r#""id":(\d+)"#).unwrap();

    for script in document.select(&selector) {
        let text: String = script.text().collect();
        if !text.contains("episodeList") {
            continue;
        }
        let ids = id_regex
            .captures_iter(&text)
            .map(|c| c[1].to_string())
            .collect();
        return Some(ids);
    }
    None
}

/// Extract page image URLs from a chapter page: the `src` attribute of
/// every `img.art-image`, in document order.
pub fn parse_page_urls(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("img.art-image").unwrap();

    document
        .select(&selector)
        .filter_map(|img| img.value().attr("src"))
        .map(|src| src.to_string())
        .collect()
}

/// Blocking tapas.io client implementing [`PageProvider`].
pub struct TapasClient {
    client: reqwest::blocking::Client,
    initial_id: String,
}

impl TapasClient {
    /// Create a client for the comic whose first episode has `initial_id`.
    pub fn new(initial_id: impl Into<String>) -> Result<Self, ScrapeError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            initial_id: initial_id.into(),
        })
    }

    fn episode_html(&self, chapter: &str) -> Result<String, reqwest::Error> {
        let url = format!("{BASE_URL}/episode/{chapter}");
        tracing::debug!(url = %url, "fetching episode page");
        self.client.get(&url).send()?.error_for_status()?.text()
    }
}

impl PageProvider for TapasClient {
    fn chapters(&self) -> Result<Vec<String>, ScrapeError> {
        let html = self.episode_html(&self.initial_id)?;
        let ids = parse_chapter_ids(&html)
            .ok_or_else(|| ScrapeError::EpisodeListMissing(self.initial_id.clone()))?;
        if ids.is_empty() {
            return Err(ScrapeError::NoChapters(self.initial_id.clone()));
        }
        Ok(ids)
    }

    fn page_urls(&self, chapter: &str) -> Result<Vec<String>, ScrapeError> {
        let html = self.episode_html(chapter)?;
        Ok(parse_page_urls(&html))
    }

    fn fetch_page(&self, url: &str) -> Result<Option<PixelBuffer>, FetchError> {
        tracing::debug!(url = %url, "downloading page image");
        let bytes = self.client.get(url).send()?.error_for_status()?.bytes()?;
        Ok(decode_page(&bytes))
    }
}
