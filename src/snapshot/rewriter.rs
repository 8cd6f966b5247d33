//! Snapshot rewrite engine
//!
//! Turns raw rendered markup plus the originating URL into a safe,
//! scrollable, self-navigating static document. The transforms run in
//! a fixed order; if any step cannot proceed the whole rewrite falls
//! back to the unmodified input, since a viewable-but-unsanitized
//! artifact beats no artifact. Script and handler removal, when the
//! rewrite does run, is a hard invariant rather than best-effort.

use crate::snapshot::assets;
use regex::Regex;
use tracing::{debug, instrument};
use url::Url;

/// Rewrites extracted markup into the final document snapshot
pub struct SnapshotRewriter;

impl SnapshotRewriter {
    /// Apply the full transform sequence to `original_markup`.
    ///
    /// Returns the rewritten snapshot, or the input unchanged when any
    /// step fails (malformed original URL included).
    #[instrument(skip(original_markup))]
    pub fn rewrite(original_markup: &str, original_url: &str) -> String {
        match Self::try_rewrite(original_markup, original_url) {
            Some(html) => html,
            None => {
                debug!("Snapshot rewrite failed, returning original markup");
                original_markup.to_string()
            }
        }
    }

    /// Compute the base reference for a capture: the URL's containing
    /// directory (`https://example.com/a/b.html` -> `https://example.com/a/`).
    pub fn base_href(original_url: &str) -> Option<String> {
        let url = Url::parse(original_url).ok()?;
        Some(url.join("./").ok()?.to_string())
    }

    fn try_rewrite(original_markup: &str, original_url: &str) -> Option<String> {
        let base_href = Self::base_href(original_url)?;
        let mut html = original_markup.to_string();

        // CSP directives would let the origin dictate what the snapshot's
        // hosting context may load.
        let csp_re =
            Regex::new(r#"(?i)<meta[^>]*http-equiv=["']content-security-policy["'][^>]*>"#).ok()?;
        html = csp_re.replace_all(&html, "").into_owned();

        // Zero origin-sourced executable script after these two.
        let script_re = Regex::new(r"(?is)<script[^>]*>.*?</script>").ok()?;
        html = script_re.replace_all(&html, "").into_owned();
        let handler_re = Regex::new(r#"(?i)\son[a-z-]+=("[^"]*"|'[^']*')"#).ok()?;
        html = handler_re.replace_all(&html, "").into_owned();

        let head_open_re = Regex::new(r"(?i)<head[^>]*>").ok()?;
        let head_capture_re = Regex::new(r"(?i)<head(.*?)>").ok()?;
        let head_close_re = Regex::new(r"(?i)</head>").ok()?;
        let head_block_re = Regex::new(r"(?is)<head[^>]*>.*?</head>").ok()?;
        let body_open_re = Regex::new(r"(?i)<body[^>]*>").ok()?;
        let body_capture_re = Regex::new(r"(?i)<body(.*?)>").ok()?;
        let body_close_re = Regex::new(r"(?i)</body>").ok()?;
        let body_block_re = Regex::new(r"(?is)<body[^>]*>.*?</body>").ok()?;
        let base_re = Regex::new(r"(?i)<base\b").ok()?;

        // Fragments without a head get a minimal skeleton wrapping
        // whatever body content can be recovered.
        if !head_open_re.is_match(&html) {
            let body_content = match body_block_re.find(&html) {
                Some(m) => m.as_str().to_string(),
                None => format!("<body>{}</body>", html),
            };
            html = format!(
                "<!doctype html><html><head><meta charset=\"utf-8\"></head>{}</html>",
                body_content
            );
        }

        // Base reference as early as possible in head, unless the
        // document already declares one.
        if !base_re.is_match(&html) {
            html = head_capture_re
                .replace(&html, |caps: &regex::Captures| {
                    format!("<head{}><base href=\"{}\">", &caps[1], base_href)
                })
                .into_owned();
        }

        // Appended (not prepended) so these rules win cascade order.
        if head_close_re.is_match(&html) {
            html = head_close_re
                .replace(&html, |_: &regex::Captures| {
                    format!("{}</head>", assets::SCROLL_UNLOCK_STYLE)
                })
                .into_owned();
        } else {
            html = head_capture_re
                .replace(&html, |caps: &regex::Captures| {
                    format!("<head{}>{}", &caps[1], assets::SCROLL_UNLOCK_STYLE)
                })
                .into_owned();
        }

        let banner = assets::attribution_banner(original_url);
        if body_open_re.is_match(&html) {
            html = body_capture_re
                .replace(&html, |caps: &regex::Captures| {
                    format!("<body{}>{}", &caps[1], banner)
                })
                .into_owned();
        } else {
            html = head_block_re
                .replace(&html, |caps: &regex::Captures| {
                    format!("{}<body>{}</body>", &caps[0], banner)
                })
                .into_owned();
        }

        // The one script the snapshot may carry.
        if body_close_re.is_match(&html) {
            html = body_close_re
                .replace(&html, |_: &regex::Captures| {
                    format!("\n{}\n</body>", assets::CONTROL_SCRIPT)
                })
                .into_owned();
        } else {
            html.push('\n');
            html.push_str(assets::CONTROL_SCRIPT);
            html.push('\n');
        }

        Some(html)
    }
}
