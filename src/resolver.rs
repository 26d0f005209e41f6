use crate::config::Config;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use thiserror::Error;

/// Where the article text comes from: pasted directly, or fetched from a URL
/// through the CORS relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    Text,
    Url,
}

#[derive(Debug, Clone)]
pub struct SourceInput {
    pub mode: SourceMode,
    pub value: String,
}

/// Every variant carries the message shown to the user as-is.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("請輸入文章內容。")]
    EmptyText,
    #[error("請輸入網址。")]
    EmptyUrl,
    #[error("無法取得網址內容，請確認網址正確且可公開存取。")]
    Fetch,
    #[error("無法解析該網址內容或內容過短。")]
    ContentTooShort,
    #[error("文章內容過長，請精簡後再試。")]
    ContentTooLong,
}

/// Turn raw user input into the plain text to analyze.
///
/// Text mode is trim-and-pass-through. URL mode fetches the page through the
/// relay and keeps only the human-visible body text. Both modes enforce the
/// configured length cap so the provider payload stays bounded.
pub async fn resolve(
    client: &Client,
    config: &Config,
    input: &SourceInput,
) -> Result<String, ResolveError> {
    let value = input.value.trim();
    let text = match input.mode {
        SourceMode::Text => {
            if value.is_empty() {
                return Err(ResolveError::EmptyText);
            }
            value.to_string()
        }
        SourceMode::Url => {
            if value.is_empty() {
                return Err(ResolveError::EmptyUrl);
            }
            let html = fetch_via_relay(client, config, value).await?;
            let text = visible_text(&html);
            if text.chars().count() < config.min_url_content_chars {
                return Err(ResolveError::ContentTooShort);
            }
            text
        }
    };
    if text.chars().count() > config.max_content_chars {
        return Err(ResolveError::ContentTooLong);
    }
    Ok(text)
}

/// Relay wire shape: `{ "contents": "<html>" }`.
#[derive(Deserialize)]
struct RelayBody {
    contents: Option<String>,
}

async fn fetch_via_relay(
    client: &Client,
    config: &Config,
    target: &str,
) -> Result<String, ResolveError> {
    let endpoint = format!("{}/get", config.relay_base.trim_end_matches('/'));
    let res = client
        .get(&endpoint)
        .query(&[("url", target)])
        .send()
        .await
        .map_err(|e| {
            tracing::warn!("relay request failed: {e}");
            ResolveError::Fetch
        })?;

    if !res.status().is_success() {
        tracing::warn!("relay returned status {}", res.status());
        return Err(ResolveError::Fetch);
    }

    // A 200 with a body we can't make sense of is handled like an empty page:
    // extraction yields nothing and the too-short check reports it.
    let body = res.json::<RelayBody>().await.unwrap_or_else(|e| {
        tracing::warn!("relay body was not the expected shape: {e}");
        RelayBody { contents: None }
    });
    Ok(body.contents.unwrap_or_default())
}

/// Extract the human-visible text of the document body, with script, style
/// and noscript content removed and whitespace collapsed.
fn visible_text(html: &str) -> String {
    let mut cleaned = html.to_string();
    for tag in ["script", "style", "noscript"] {
        cleaned = strip_tag_blocks(&cleaned, tag);
    }
    let doc = Html::parse_document(&cleaned);
    let Ok(selector) = Selector::parse("body") else {
        return String::new();
    };
    let Some(body) = doc.select(&selector).next() else {
        return String::new();
    };
    let joined = body.text().collect::<Vec<_>>().join(" ");
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove `<tag ...>...</tag>` blocks before parsing, ASCII-case-insensitive.
/// Only strips when a close tag exists; a dangling open tag ends the scan.
fn strip_tag_blocks(html: &str, tag: &str) -> String {
    let open_pat = format!("<{tag}");
    let close_pat = format!("</{tag}>");
    let lower = html.to_ascii_lowercase();

    let mut out = String::new();
    let mut i = 0usize;
    while let Some(rel_start) = lower[i..].find(&open_pat) {
        let start = i + rel_start;
        let after_open = start + open_pat.len();
        if let Some(rel_end) = lower[after_open..].find(&close_pat) {
            out.push_str(&html[i..start]);
            i = after_open + rel_end + close_pat.len();
        } else {
            break;
        }
    }
    out.push_str(&html[i..]);
    out
}
