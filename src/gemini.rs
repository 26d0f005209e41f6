use crate::catalog;
use crate::config::Config;
use crate::reply::{AnalysisResult, ReplyParser};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Google AI Studio keys start with this prefix.
pub const API_KEY_PREFIX: &str = "AIza";
pub const MIN_API_KEY_LEN: usize = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error("請先於設定頁輸入有效的 API Key。")]
    InvalidApiKey,
    /// Provider sent an explicit error payload; its message is shown as-is.
    #[error("{0}")]
    Provider(String),
    #[error("API 回應異常，請檢查金鑰或稍後再試。")]
    MalformedResponse,
    #[error("分析失敗，請稍後再試。")]
    Transport,
}

/// Key shape check. Must run before any outbound call so a bad key never
/// costs a network round trip.
pub fn validate_api_key(api_key: &str) -> Result<(), AnalyzeError> {
    let key = api_key.trim();
    if key.len() < MIN_API_KEY_LEN || !key.starts_with(API_KEY_PREFIX) {
        return Err(AnalyzeError::InvalidApiKey);
    }
    Ok(())
}

fn build_prompt(text: &str) -> String {
    format!(
        "請閱讀以下文章，並分別完成：\n1. 總結重點（簡短概述核心內容）\n2. 感想生成（針對內容給出評論或感想）\n\n文章：{}",
        text
    )
}

/// Send resolved text to the provider and parse the reply into
/// summary/comment fields.
pub async fn analyze(
    client: &Client,
    config: &Config,
    parser: &dyn ReplyParser,
    text: &str,
    api_key: &str,
    model_id: &str,
) -> Result<AnalysisResult, AnalyzeError> {
    validate_api_key(api_key)?;

    let endpoint = catalog::endpoint_for(model_id);
    let url = format!(
        "{}/v1beta/models/{}:generateContent",
        config.gemini_base.trim_end_matches('/'),
        endpoint
    );
    let body = json!({
        "contents": [{ "parts": [{ "text": build_prompt(text) }] }]
    });

    tracing::info!(model = endpoint, chars = text.chars().count(), "requesting analysis");
    let res = client
        .post(&url)
        .query(&[("key", api_key.trim())])
        .json(&body)
        .send()
        .await
        .map_err(|e| {
            tracing::warn!("provider request failed: {e}");
            AnalyzeError::Transport
        })?;

    // Error payloads arrive with non-2xx statuses; decode the body either way
    // so the provider's own message can be surfaced.
    let parsed: GenerateResponse = res.json().await.map_err(|e| {
        tracing::warn!("provider response was not json: {e}");
        AnalyzeError::MalformedResponse
    })?;

    if let Some(err) = parsed.error {
        tracing::warn!("provider error: {}", err.message);
        return Err(AnalyzeError::Provider(err.message));
    }

    let raw = parsed
        .candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content)
        .and_then(|c| c.parts)
        .and_then(|p| p.into_iter().next())
        .and_then(|p| p.text)
        .filter(|t| !t.is_empty())
        .ok_or(AnalyzeError::MalformedResponse)?;

    Ok(parser.parse(&raw))
}

// Success shape: { candidates: [{ content: { parts: [{ text }] } }] }.
// Error shape:   { error: { message } }.
// Every level is optional so a surprise payload degrades to
// MalformedResponse instead of a decode failure.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ProviderErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ReplyPart>>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}
