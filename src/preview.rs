//! Best-effort metadata previewer
//!
//! Fetches a page over plain HTTP (no browser) to pull a
//! human-readable title and a favicon URL for display while a capture
//! runs. Independent of the capture pipeline, entirely optional, and
//! failure-tolerant: any error yields an empty preview.

use reqwest::header::ACCEPT;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Crawler-style user agent used for preview fetches
pub const ARCHIVER_USER_AGENT: &str =
    "Mozilla/5.0 AppleWebKit/537.36 (KHTML, like Gecko; compatible; Googlebot/2.1; +http://www.google.com/bot.html) Chrome/139.0.7258.123 Safari/537.36";

/// Budget for the page fetch
pub const PAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(4);

/// Budget for the fallback favicon HEAD check
pub const ICON_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Title and favicon hints for a page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PagePreview {
    /// Best page title, if any was found
    pub title: Option<String>,
    /// Absolute favicon URL, if any was found
    pub favicon: Option<String>,
}

/// Metadata preview fetcher
pub struct MetadataPreviewer;

impl MetadataPreviewer {
    /// Fetch a preview for `url`. Never fails; errors degrade to an
    /// empty preview.
    #[instrument]
    pub async fn preview(url: &str) -> PagePreview {
        match Self::try_preview(url).await {
            Ok(preview) => preview,
            Err(e) => {
                debug!("Preview fetch failed: {}", e);
                PagePreview::default()
            }
        }
    }

    async fn try_preview(url: &str) -> anyhow::Result<PagePreview> {
        let client = reqwest::Client::builder()
            .timeout(PAGE_FETCH_TIMEOUT)
            .user_agent(ARCHIVER_USER_AGENT)
            .build()?;

        let res = client.get(url).header(ACCEPT, "text/html,*/*").send().await?;
        if !res.status().is_success() {
            anyhow::bail!("preview fetch returned {}", res.status());
        }
        let final_url = res.url().clone();
        let html = res.text().await?;

        let (title, icon_href) = extract_hints(&html);

        let favicon = match icon_href {
            Some(href) => final_url.join(&href).ok().map(String::from),
            None => Self::probe_default_icon(&client, &final_url).await,
        };

        Ok(PagePreview { title, favicon })
    }

    /// HEAD check against `/favicon.ico` when the markup names no icon
    async fn probe_default_icon(client: &reqwest::Client, base: &Url) -> Option<String> {
        let candidate = base.join("/favicon.ico").ok()?;
        let res = client
            .head(candidate.clone())
            .timeout(ICON_CHECK_TIMEOUT)
            .send()
            .await
            .ok()?;
        if res.status().is_success() {
            Some(candidate.into())
        } else {
            None
        }
    }
}

/// Pull title and best icon href out of markup. Sync so the parsed
/// document never crosses an await point.
fn extract_hints(html: &str) -> (Option<String>, Option<String>) {
    let doc = Html::parse_document(html);
    (best_title(&doc), best_icon_href(&doc))
}

/// Title preference order: `<title>`, then `og:title`, then
/// `twitter:title`.
fn best_title(doc: &Html) -> Option<String> {
    let title_sel = Selector::parse("title").ok()?;
    if let Some(el) = doc.select(&title_sel).next() {
        let text = el.text().collect::<String>().trim().to_string();
        if !text.is_empty() {
            return Some(text);
        }
    }

    for selector in [
        "meta[property=\"og:title\"]",
        "meta[name=\"twitter:title\"]",
    ] {
        let sel = Selector::parse(selector).ok()?;
        if let Some(content) = doc
            .select(&sel)
            .next()
            .and_then(|el| el.value().attr("content"))
        {
            let text = content.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }

    None
}

/// Highest-scoring icon link, document order breaking ties
fn best_icon_href(doc: &Html) -> Option<String> {
    let link_sel = Selector::parse("link").ok()?;
    let mut candidates: Vec<(String, i32)> = Vec::new();

    for el in doc.select(&link_sel) {
        let rel = el.value().attr("rel").unwrap_or("").to_lowercase();
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        if !rel.contains("icon") {
            continue;
        }
        let score = score_icon_link(
            &rel,
            el.value().attr("type").unwrap_or(""),
            el.value().attr("sizes").unwrap_or(""),
        );
        candidates.push((href.to_string(), score));
    }

    candidates.sort_by(|a, b| b.1.cmp(&a.1));
    candidates.into_iter().next().map(|(href, _)| href)
}

/// Score an icon link by shortcut/apple/png/size hints
fn score_icon_link(rel: &str, icon_type: &str, sizes: &str) -> i32 {
    let mut score = 0;
    if rel.contains("shortcut") {
        score += 2;
    }
    if rel.contains("apple") {
        score += 1;
    }
    if icon_type.contains("png") {
        score += 2;
    }
    if sizes.contains("32x32") {
        score += 2;
    }
    if sizes.contains("16x16") {
        score += 1;
    }
    score
}
