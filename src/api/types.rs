use serde::{Deserialize, Serialize};
use ts_rs::TS;

// Wire types for the handwriting generation service. The service reports
// failures in-body (`success: false` + message) rather than via HTTP status,
// so every field that only appears on one branch is optional.

#[derive(Debug, Clone, Deserialize)]
pub struct LanguagesResponse {
    pub success: bool,
    #[serde(default)]
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StylesResponse {
    pub success: bool,
    #[serde(default)]
    pub styles: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    /// Relative preview path (e.g. `/api/preview/{sample_id}`); present on success.
    pub preview_url: Option<String>,
    pub sample_id: Option<String>,
    /// Server-supplied message; present on failure.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Contact form payload. Field names follow the service's JSON contract.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessageInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub agree_to_privacy: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_success() {
        let json = r#"{
            "success": true,
            "sample_id": "7e6a2f",
            "preview_url": "/api/preview/7e6a2f"
        }"#;
        let resp: GenerateResponse = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        assert_eq!(resp.sample_id.as_deref(), Some("7e6a2f"));
        assert_eq!(resp.preview_url.as_deref(), Some("/api/preview/7e6a2f"));
        assert!(resp.error.is_none());
    }

    #[test]
    fn test_parse_generate_failure() {
        let json = r#"{"success": false, "error": "No text provided"}"#;
        let resp: GenerateResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("No text provided"));
        assert!(resp.preview_url.is_none());
    }

    #[test]
    fn test_parse_languages_and_styles() {
        let langs: LanguagesResponse =
            serde_json::from_str(r#"{"success": true, "languages": ["english", "hindi"]}"#)
                .unwrap();
        assert_eq!(langs.languages, vec!["english", "hindi"]);

        let styles: StylesResponse =
            serde_json::from_str(r#"{"success": true, "styles": ["casual", "formal"]}"#).unwrap();
        assert_eq!(styles.styles, vec!["casual", "formal"]);
    }

    #[test]
    fn test_contact_input_uses_camel_case_on_the_wire() {
        let input = ContactMessageInput {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            subject: "Hello".into(),
            message: "Love the demo".into(),
            agree_to_privacy: true,
        };
        let json = serde_json::to_string(&input).unwrap();
        assert!(json.contains("\"firstName\":\"Ada\""));
        assert!(json.contains("\"agreeToPrivacy\":true"));
    }
}
