use std::env;
use std::time::Duration;

/// Runtime configuration, read once at startup. The content cap has drifted
/// between 80k and 160k over the app's history; it is a tunable here, with
/// 160k as the shipped default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the CORS-relay service used to fetch article pages.
    pub relay_base: String,
    /// Base URL of the generative-language provider.
    pub gemini_base: String,
    /// Upper bound on resolved article length, in characters.
    pub max_content_chars: usize,
    /// Minimum extracted length for URL mode before the page counts as unparseable.
    pub min_url_content_chars: usize,
    /// Timeout applied to every outbound request.
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            relay_base: "https://api.allorigins.win".to_string(),
            gemini_base: "https://generativelanguage.googleapis.com".to_string(),
            max_content_chars: 160_000,
            min_url_content_chars: 30,
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            relay_base: env::var("RELAY_BASE_URL").unwrap_or(defaults.relay_base),
            gemini_base: env::var("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base),
            max_content_chars: env::var("MAX_CONTENT_CHARS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_content_chars),
            min_url_content_chars: defaults.min_url_content_chars,
            http_timeout: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
        }
    }
}
