//! Static table of the Gemini models the app lets users pick from.

/// One selectable model. `endpoint` is the path segment of the provider's
/// `generateContent` endpoint, which for Gemini matches the public model id.
#[derive(Debug, Clone, Copy)]
pub struct ModelEntry {
    pub id: &'static str,
    pub display_name: &'static str,
    pub endpoint: &'static str,
}

pub const DEFAULT_MODEL_ID: &str = "gemini-2.0-flash";

/// Default model first; the settings page renders these in order.
pub static CATALOG: &[ModelEntry] = &[
    ModelEntry {
        id: "gemini-2.0-flash",
        display_name: "Gemini 2.0 Flash",
        endpoint: "gemini-2.0-flash",
    },
    ModelEntry {
        id: "gemini-2.0-flash-lite",
        display_name: "Gemini 2.0 Flash-Lite",
        endpoint: "gemini-2.0-flash-lite",
    },
    ModelEntry {
        id: "gemini-1.5-flash",
        display_name: "Gemini 1.5 Flash",
        endpoint: "gemini-1.5-flash",
    },
    ModelEntry {
        id: "gemini-1.5-pro",
        display_name: "Gemini 1.5 Pro",
        endpoint: "gemini-1.5-pro",
    },
];

/// Resolve a user-facing model id to its endpoint segment. Unknown ids fall
/// back to the default model instead of failing.
pub fn endpoint_for(model_id: &str) -> &'static str {
    CATALOG
        .iter()
        .find(|m| m.id == model_id)
        .unwrap_or(&CATALOG[0])
        .endpoint
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_model_resolves_to_its_endpoint() {
        assert_eq!(endpoint_for("gemini-1.5-pro"), "gemini-1.5-pro");
    }

    #[test]
    fn unknown_model_falls_back_to_default() {
        assert_eq!(endpoint_for("gemini-99-ultra"), DEFAULT_MODEL_ID);
        assert_eq!(endpoint_for(""), DEFAULT_MODEL_ID);
    }

    #[test]
    fn default_model_is_listed_first() {
        assert_eq!(CATALOG[0].id, DEFAULT_MODEL_ID);
    }
}
