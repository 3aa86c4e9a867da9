use reqwest::multipart::Form;
use serde::de::DeserializeOwned;

use crate::api::types::{
    ContactMessageInput, ContactResponse, GenerateResponse, LanguagesResponse, StylesResponse,
};
use crate::error::AppError;

/// Convert any displayable transport error into `AppError::Network`.
fn net_err(e: impl std::fmt::Display) -> AppError {
    AppError::Network(e.to_string())
}

/// HTTP client that wraps all handwriting-service endpoints.
///
/// The service signals failure in the response body (`success: false`), so
/// responses are parsed regardless of HTTP status instead of going through
/// `error_for_status`.
pub struct HandwritingClient {
    http: reqwest::Client,
    base_url: String,
}

impl HandwritingClient {
    /// Create a new `HandwritingClient` against the given base origin.
    ///
    /// The underlying `reqwest::Client` is configured with a 30-second timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build reqwest client");

        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Rewrite a service-relative path (e.g. `/api/preview/{id}`) to an
    /// absolute URL. Already-absolute URLs pass through untouched.
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Deterministic download URL for a previously generated sample.
    pub fn download_url(&self, sample_id: &str) -> String {
        format!("{}/api/download/{}", self.base_url, sample_id)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        self.http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .map_err(net_err)?
            .json()
            .await
            .map_err(net_err)
    }

    /// `GET /api/languages` -- supported languages.
    pub async fn list_languages(&self) -> Result<Vec<String>, AppError> {
        let resp: LanguagesResponse = self.get_json("/api/languages").await?;
        if !resp.success {
            return Err(AppError::Server("Language list unavailable".into()));
        }
        Ok(resp.languages)
    }

    /// `GET /api/styles/{language}` -- styles valid for a language.
    pub async fn list_styles(&self, language: &str) -> Result<Vec<String>, AppError> {
        let resp: StylesResponse = self.get_json(&format!("/api/styles/{language}")).await?;
        if !resp.success {
            return Err(AppError::Server(format!(
                "Style list unavailable for {language}"
            )));
        }
        Ok(resp.styles)
    }

    /// `POST /api/generate` -- submit a multipart generation request.
    ///
    /// Returns the parsed response without interpreting the `success` flag;
    /// the request lifecycle controller decides the resulting state.
    pub async fn generate(&self, payload: Form) -> Result<GenerateResponse, AppError> {
        self.http
            .post(format!("{}/api/generate", self.base_url))
            .multipart(payload)
            .send()
            .await
            .map_err(net_err)?
            .json()
            .await
            .map_err(net_err)
    }

    /// `POST /api/contact/send` -- contact form relay.
    pub async fn send_contact(&self, input: &ContactMessageInput) -> Result<ContactResponse, AppError> {
        self.http
            .post(format!("{}/api/contact/send", self.base_url))
            .json(input)
            .send()
            .await
            .map_err(net_err)?
            .json()
            .await
            .map_err(net_err)
    }
}
