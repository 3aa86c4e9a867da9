use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::api::client::HandwritingClient;
use crate::db::repos::settings;
use crate::db::{settings_keys, DbPool};
use crate::error::AppError;
use crate::generator::form::{FormState, HandwritingSize, DEFAULT_INK_COLOR};
use crate::generator::submission;

pub const SUCCESS_MESSAGE: &str = "Handwriting generated successfully!";
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Connection error. Please make sure the generation service is running.";
pub const GENERATE_FAILED_MESSAGE: &str = "Failed to generate handwriting.";
pub const ASSET_LOAD_MESSAGE: &str = "Failed to load generated image. Please try again.";
pub const NOT_READY_MESSAGE: &str = "Please generate handwriting first before downloading.";
pub const DOWNLOAD_STARTED_MESSAGE: &str = "Download started! Check your downloads folder.";
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Download failed. Please try again.";

/// Request lifecycle. Exactly one value is active; the machine is cyclic
/// (Failed/Succeeded re-enter Pending on the next submit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum RequestStatus {
    Idle,
    Pending,
    Succeeded,
    Failed(String),
}

/// Metadata of the last successful generation. Superseded wholesale by the
/// next success, cleared by the clear action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GenerationResult {
    /// Absolute preview URL on the generation service.
    pub preview_url: String,
    /// `preview_url` with a cache-busting query parameter; what the UI
    /// actually renders, so a regenerated image at the same path is not
    /// served from the browser cache.
    pub display_url: String,
    pub sample_id: String,
    pub text: String,
    pub language: String,
    pub style: String,
    pub size: HandwritingSize,
    pub ink_color: String,
}

/// Full generator state, shared behind `AppState` and returned to the UI
/// as a snapshot after every command.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct GeneratorState {
    pub form: FormState,
    pub status: RequestStatus,
    pub result: Option<GenerationResult>,
    /// Informational banner (success / download started). Errors travel in
    /// `status` instead.
    pub notice: Option<String>,
    pub languages: Vec<String>,
    pub styles: Vec<String>,
}

impl Default for GeneratorState {
    fn default() -> Self {
        Self {
            form: FormState::default(),
            status: RequestStatus::Idle,
            result: None,
            notice: None,
            languages: Vec::new(),
            styles: Vec::new(),
        }
    }
}

impl GeneratorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a freshly loaded language list. The selected language is kept
    /// when still listed, otherwise coerced to the list's first entry.
    pub fn apply_languages(&mut self, languages: Vec<String>) {
        if !languages.is_empty() && !languages.contains(&self.form.language) {
            tracing::debug!(
                from = %self.form.language,
                to = %languages[0],
                "selected language no longer offered, coercing"
            );
            self.form.language = languages[0].clone();
        }
        self.languages = languages;
    }

    /// Apply a freshly loaded style list for the current language. An
    /// invalidated selection silently coerces to the list's first entry so
    /// an invalid style can never reach submission.
    pub fn apply_styles(&mut self, styles: Vec<String>) {
        if !styles.is_empty() && !styles.contains(&self.form.style) {
            tracing::debug!(
                from = %self.form.style,
                to = %styles[0],
                language = %self.form.language,
                "selected style not offered for language, coercing"
            );
            self.form.style = styles[0].clone();
        }
        self.styles = styles;
    }

    /// Validate and enter Pending, optimistically discarding the previous
    /// result and messages before the network call starts.
    ///
    /// Returns `Ok(false)` when a request is already in flight -- the
    /// duplicate submit is ignored rather than racing the first one.
    /// Validation failure leaves the state untouched (never Pending).
    pub fn begin_submit(&mut self) -> Result<bool, AppError> {
        if self.status == RequestStatus::Pending {
            return Ok(false);
        }
        submission::ensure_has_content(&self.form)?;

        self.status = RequestStatus::Pending;
        self.result = None;
        self.notice = None;
        Ok(true)
    }

    /// Record a successful generation: store the result, persist the sample
    /// id under the durable key, and stamp the display URL so the UI
    /// re-renders the image even when the preview path is unchanged.
    pub fn complete_success(
        &mut self,
        pool: &DbPool,
        preview_url: String,
        sample_id: String,
        now_ms: i64,
    ) -> Result<(), AppError> {
        settings::set(pool, settings_keys::CURRENT_SAMPLE_ID, &sample_id)?;

        self.result = Some(GenerationResult {
            display_url: cache_busted(&preview_url, now_ms),
            preview_url,
            sample_id,
            text: self.form.text.clone(),
            language: self.form.language.clone(),
            style: self.form.style.clone(),
            size: self.form.size,
            ink_color: self.form.ink_color.clone(),
        });
        self.status = RequestStatus::Succeeded;
        self.notice = Some(SUCCESS_MESSAGE.into());
        Ok(())
    }

    /// Record a failed generation; the message is shown to the user.
    pub fn complete_failure(&mut self, err: &AppError) {
        self.status = RequestStatus::Failed(err.to_string());
        self.result = None;
        self.notice = None;
    }

    /// The UI reported that the preview image did not load even though the
    /// service claimed success.
    pub fn preview_load_failed(&mut self) {
        if self.status == RequestStatus::Succeeded {
            self.complete_failure(&AppError::AssetLoad(ASSET_LOAD_MESSAGE.into()));
        }
    }

    /// Reset to Idle from any state: discard the preview, the uploaded
    /// file, the entered text, all messages, and the durable sample id.
    /// Dropdown selections (language / style / size) survive.
    pub fn clear(&mut self, pool: &DbPool) -> Result<(), AppError> {
        self.form.text.clear();
        self.form.uploaded_file = None;
        self.form.ink_color = DEFAULT_INK_COLOR.into();
        self.status = RequestStatus::Idle;
        self.result = None;
        self.notice = None;
        settings::delete(pool, settings_keys::CURRENT_SAMPLE_ID)?;
        Ok(())
    }
}

/// Download URL for the most recent successful generation, or `NotReady`
/// when none has been persisted in this session.
pub fn stored_download_url(pool: &DbPool, api: &HandwritingClient) -> Result<String, AppError> {
    match settings::get(pool, settings_keys::CURRENT_SAMPLE_ID)? {
        Some(id) if !id.is_empty() => Ok(api.download_url(&id)),
        _ => Err(AppError::NotReady(NOT_READY_MESSAGE.into())),
    }
}

/// Append a timestamp query parameter so the browser bypasses any cached
/// image at the same URL.
pub fn cache_busted(url: &str, now_ms: i64) -> String {
    format!("{url}?t={now_ms}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_test_db;

    fn state_with_text(text: &str) -> GeneratorState {
        let mut state = GeneratorState::new();
        state.form.set_text(text.into());
        state
    }

    #[test]
    fn test_empty_submit_fails_validation_and_stays_idle() {
        let mut state = state_with_text("   ");
        let err = state.begin_submit().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(state.status, RequestStatus::Idle);
        assert!(state.result.is_none());
    }

    #[test]
    fn test_begin_submit_enters_pending_and_resets_previous_outcome() {
        let pool = init_test_db().unwrap();
        let mut state = state_with_text("hello");
        assert!(state.begin_submit().unwrap());
        state
            .complete_success(&pool, "http://api/preview/1".into(), "1".into(), 10)
            .unwrap();
        assert_eq!(state.status, RequestStatus::Succeeded);
        assert!(state.notice.is_some());

        // Re-entrant: Succeeded -> Pending, discarding the old result.
        assert!(state.begin_submit().unwrap());
        assert_eq!(state.status, RequestStatus::Pending);
        assert!(state.result.is_none());
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_duplicate_submit_while_pending_is_ignored() {
        let mut state = state_with_text("hello");
        assert!(state.begin_submit().unwrap());
        assert!(!state.begin_submit().unwrap());
        assert_eq!(state.status, RequestStatus::Pending);
    }

    #[test]
    fn test_success_persists_sample_id_and_round_trips_fields() {
        let pool = init_test_db().unwrap();
        let mut state = state_with_text("hello world");
        state.form.style = "cursive".into();
        state.form.ink_color = "#112233".into();
        state.begin_submit().unwrap();

        state
            .complete_success(
                &pool,
                "http://localhost:8000/api/preview/abc".into(),
                "abc".into(),
                1234,
            )
            .unwrap();

        assert_eq!(
            settings::get(&pool, settings_keys::CURRENT_SAMPLE_ID).unwrap(),
            Some("abc".into())
        );

        let result = state.result.as_ref().unwrap();
        assert_eq!(result.sample_id, "abc");
        assert_eq!(result.preview_url, "http://localhost:8000/api/preview/abc");
        assert_eq!(
            result.display_url,
            "http://localhost:8000/api/preview/abc?t=1234"
        );
        assert_eq!(result.text, "hello world");
        assert_eq!(result.language, "english");
        assert_eq!(result.style, "cursive");
        assert_eq!(result.ink_color, "#112233");
        assert_eq!(state.status, RequestStatus::Succeeded);
    }

    #[test]
    fn test_consecutive_successes_are_last_write_wins() {
        let pool = init_test_db().unwrap();
        let mut state = state_with_text("same text");

        state.begin_submit().unwrap();
        state
            .complete_success(&pool, "http://api/preview/s1".into(), "s1".into(), 1000)
            .unwrap();
        let first_display = state.result.as_ref().unwrap().display_url.clone();

        state.begin_submit().unwrap();
        state
            .complete_success(&pool, "http://api/preview/s1".into(), "s2".into(), 2000)
            .unwrap();

        let result = state.result.as_ref().unwrap();
        assert_eq!(result.sample_id, "s2");
        assert_eq!(
            settings::get(&pool, settings_keys::CURRENT_SAMPLE_ID).unwrap(),
            Some("s2".into())
        );
        // Same preview path, different display URL: the cache buster moved.
        assert_ne!(result.display_url, first_display);
    }

    #[test]
    fn test_failure_carries_message() {
        let mut state = state_with_text("hello");
        state.begin_submit().unwrap();
        state.complete_failure(&AppError::Server("No text provided".into()));
        assert_eq!(state.status, RequestStatus::Failed("No text provided".into()));
        assert!(state.result.is_none());
    }

    #[test]
    fn test_language_change_coerces_invalid_style() {
        let mut state = GeneratorState::new();
        state.apply_languages(vec!["english".into(), "hindi".into()]);
        state.apply_styles(vec!["casual".into(), "cursive".into()]);
        state.form.style = "cursive".into();

        // Switch to hindi, whose styles do not include cursive.
        state.form.language = "hindi".into();
        state.apply_styles(vec!["casual".into(), "formal".into()]);
        assert_eq!(state.form.style, "casual");

        // A still-valid selection is left alone.
        state.form.style = "formal".into();
        state.apply_styles(vec!["casual".into(), "formal".into(), "traditional".into()]);
        assert_eq!(state.form.style, "formal");
    }

    #[test]
    fn test_unlisted_language_is_coerced_on_load() {
        let mut state = GeneratorState::new();
        state.form.language = "klingon".into();
        state.apply_languages(vec!["english".into(), "hindi".into()]);
        assert_eq!(state.form.language, "english");
    }

    #[test]
    fn test_failed_option_load_leaves_previous_list() {
        let mut state = GeneratorState::new();
        state.apply_styles(vec!["casual".into(), "formal".into()]);
        // A fetch failure never reaches apply_styles; the lists stay as-is.
        assert_eq!(state.styles.len(), 2);
    }

    #[test]
    fn test_clear_from_succeeded_resets_everything_durable() {
        let pool = init_test_db().unwrap();
        let mut state = state_with_text("hello");
        state.form.uploaded_file = Some("notes.txt".into());
        state.form.ink_color = "#ff0000".into();
        state.form.language = "hindi".into();
        state.begin_submit().unwrap();
        state
            .complete_success(&pool, "http://api/preview/abc".into(), "abc".into(), 1)
            .unwrap();

        state.clear(&pool).unwrap();

        assert_eq!(state.status, RequestStatus::Idle);
        assert!(state.result.is_none());
        assert!(state.notice.is_none());
        assert!(state.form.text.is_empty());
        assert!(state.form.uploaded_file.is_none());
        assert_eq!(state.form.ink_color, DEFAULT_INK_COLOR);
        // Dropdown selections survive a clear.
        assert_eq!(state.form.language, "hindi");
        // The durable key is gone.
        assert_eq!(
            settings::get(&pool, settings_keys::CURRENT_SAMPLE_ID).unwrap(),
            None
        );
    }

    #[test]
    fn test_download_before_any_success_is_not_ready() {
        let pool = init_test_db().unwrap();
        let api = HandwritingClient::new("http://localhost:8000");
        let err = stored_download_url(&pool, &api).unwrap_err();
        assert!(matches!(err, AppError::NotReady(_)));
        assert_eq!(err.to_string(), NOT_READY_MESSAGE);
    }

    #[test]
    fn test_download_url_uses_persisted_id() {
        let pool = init_test_db().unwrap();
        let api = HandwritingClient::new("http://localhost:8000");
        settings::set(&pool, settings_keys::CURRENT_SAMPLE_ID, "abc").unwrap();
        assert_eq!(
            stored_download_url(&pool, &api).unwrap(),
            "http://localhost:8000/api/download/abc"
        );
    }

    #[test]
    fn test_download_survives_controller_restart() {
        // The durable key outlives the in-memory state: a fresh controller
        // (new page view) can still resolve the download.
        let pool = init_test_db().unwrap();
        let api = HandwritingClient::new("http://localhost:8000");

        let mut state = state_with_text("hello");
        state.begin_submit().unwrap();
        state
            .complete_success(&pool, "http://api/preview/xyz".into(), "xyz".into(), 1)
            .unwrap();
        drop(state);

        assert_eq!(
            stored_download_url(&pool, &api).unwrap(),
            "http://localhost:8000/api/download/xyz"
        );
    }

    #[test]
    fn test_preview_load_failure_converts_success_to_failed() {
        let pool = init_test_db().unwrap();
        let mut state = state_with_text("hello");
        state.begin_submit().unwrap();
        state
            .complete_success(&pool, "http://api/preview/abc".into(), "abc".into(), 1)
            .unwrap();

        state.preview_load_failed();
        assert_eq!(
            state.status,
            RequestStatus::Failed(ASSET_LOAD_MESSAGE.into())
        );

        // Only meaningful after a success; a no-op from Idle.
        let mut idle = GeneratorState::new();
        idle.preview_load_failed();
        assert_eq!(idle.status, RequestStatus::Idle);
    }
}
