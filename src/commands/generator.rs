use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use tauri::State;
use ts_rs::TS;

use crate::error::AppError;
use crate::generator::controller::{self, GeneratorState, RequestStatus};
use crate::generator::form::{self, FormCatalog, HandwritingSize};
use crate::generator::submission;
use crate::validation;
use crate::AppState;

/// Partial form update; only supplied fields change.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export)]
pub struct UpdateGeneratorFormInput {
    pub text: Option<String>,
    pub style: Option<String>,
    pub size: Option<HandwritingSize>,
    pub ink_color: Option<String>,
}

#[tauri::command]
pub fn get_generator_state(state: State<'_, Arc<AppState>>) -> Result<GeneratorState, AppError> {
    Ok(state.generator.lock().unwrap().clone())
}

#[tauri::command]
pub fn get_form_catalog() -> FormCatalog {
    form::catalog()
}

/// Fetch the language list, then the style list for the (possibly coerced)
/// selection. Both loads are non-critical: failures are logged and the
/// previous lists stay in place, never blocking generate or download.
pub(crate) async fn refresh_options(state: &AppState) {
    match state.api.list_languages().await {
        Ok(languages) => state.generator.lock().unwrap().apply_languages(languages),
        Err(e) => tracing::warn!(error = %e, "language list load failed"),
    }

    let language = state.generator.lock().unwrap().form.language.clone();
    match state.api.list_styles(&language).await {
        Ok(styles) => state.generator.lock().unwrap().apply_styles(styles),
        Err(e) => tracing::warn!(error = %e, language = %language, "style list load failed"),
    }
}

#[tauri::command]
pub async fn load_generator_options(
    state: State<'_, Arc<AppState>>,
) -> Result<GeneratorState, AppError> {
    refresh_options(state.inner()).await;
    Ok(state.generator.lock().unwrap().clone())
}

/// Change the language and reload its styles. The style selection coerces
/// to the new list's first entry when no longer valid.
#[tauri::command]
pub async fn set_language(
    state: State<'_, Arc<AppState>>,
    language: String,
) -> Result<GeneratorState, AppError> {
    {
        let mut gen = state.generator.lock().unwrap();
        if !gen.languages.is_empty() && !gen.languages.contains(&language) {
            return Err(AppError::Validation(format!(
                "Unsupported language: {language}"
            )));
        }
        gen.form.language = language.clone();
    }

    match state.api.list_styles(&language).await {
        Ok(styles) => state.generator.lock().unwrap().apply_styles(styles),
        Err(e) => tracing::warn!(error = %e, language = %language, "style list load failed"),
    }

    Ok(state.generator.lock().unwrap().clone())
}

#[tauri::command]
pub fn update_generator_form(
    state: State<'_, Arc<AppState>>,
    input: UpdateGeneratorFormInput,
) -> Result<GeneratorState, AppError> {
    let mut gen = state.generator.lock().unwrap();

    if let Some(text) = input.text {
        gen.form.set_text(text);
    }
    if let Some(style) = input.style {
        if !gen.styles.is_empty() && !gen.styles.contains(&style) {
            return Err(AppError::Validation(format!("Unknown style: {style}")));
        }
        gen.form.style = style;
    }
    if let Some(size) = input.size {
        gen.form.size = size;
    }
    if let Some(ink_color) = input.ink_color {
        validation::require_hex_color(&ink_color)?;
        gen.form.ink_color = ink_color;
    }

    Ok(gen.clone())
}

/// Attach a `.txt`/`.pdf` file picked through the dialog plugin.
#[tauri::command]
pub fn attach_generator_file(
    state: State<'_, Arc<AppState>>,
    path: String,
) -> Result<GeneratorState, AppError> {
    let path = PathBuf::from(path);
    submission::supported_mime(&path)?;

    let mut gen = state.generator.lock().unwrap();
    gen.form.uploaded_file = Some(path);
    // Picking a file clears stale messages, like editing the form does.
    gen.notice = None;
    if matches!(gen.status, RequestStatus::Failed(_)) {
        gen.status = RequestStatus::Idle;
    }
    Ok(gen.clone())
}

#[tauri::command]
pub fn remove_generator_file(state: State<'_, Arc<AppState>>) -> Result<GeneratorState, AppError> {
    let mut gen = state.generator.lock().unwrap();
    gen.form.uploaded_file = None;
    Ok(gen.clone())
}

/// Submit the current form. Validation failures surface as errors and leave
/// the state Idle; everything after Pending is reported through the
/// returned snapshot's status.
#[tauri::command]
pub async fn generate_handwriting(
    state: State<'_, Arc<AppState>>,
) -> Result<GeneratorState, AppError> {
    let form = {
        let mut gen = state.generator.lock().unwrap();
        if !gen.begin_submit()? {
            tracing::debug!("submit ignored: a generation is already pending");
            return Ok(gen.clone());
        }
        gen.form.clone()
    };

    let payload = match submission::build(&form).and_then(|s| s.into_multipart()) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "submission build failed");
            let mut gen = state.generator.lock().unwrap();
            gen.complete_failure(&e);
            return Ok(gen.clone());
        }
    };

    tracing::info!(
        language = %form.language,
        style = %form.style,
        size = form.size.as_str(),
        has_file = form.uploaded_file.is_some(),
        "submitting generation request"
    );

    match state.api.generate(payload).await {
        Ok(resp) if resp.success => match (resp.preview_url, resp.sample_id) {
            (Some(path), Some(sample_id)) => {
                let preview_url = state.api.absolute_url(&path);
                let now_ms = chrono::Utc::now().timestamp_millis();
                let mut gen = state.generator.lock().unwrap();
                if let Err(e) = gen.complete_success(&state.db, preview_url, sample_id, now_ms) {
                    tracing::error!(error = %e, "failed to record generation result");
                    gen.complete_failure(&e);
                }
            }
            _ => {
                tracing::error!("generation response missing preview_url or sample_id");
                let mut gen = state.generator.lock().unwrap();
                gen.complete_failure(&AppError::Server(
                    controller::GENERATE_FAILED_MESSAGE.into(),
                ));
            }
        },
        Ok(resp) => {
            let message = resp
                .error
                .unwrap_or_else(|| controller::GENERATE_FAILED_MESSAGE.into());
            tracing::warn!(message = %message, "generation rejected by service");
            let mut gen = state.generator.lock().unwrap();
            gen.complete_failure(&AppError::Server(message));
        }
        Err(e) => {
            tracing::error!(error = %e, "generation request failed");
            let mut gen = state.generator.lock().unwrap();
            gen.complete_failure(&AppError::Network(
                controller::CONNECTION_ERROR_MESSAGE.into(),
            ));
        }
    }

    Ok(state.generator.lock().unwrap().clone())
}

#[tauri::command]
pub fn clear_generator(state: State<'_, Arc<AppState>>) -> Result<GeneratorState, AppError> {
    let mut gen = state.generator.lock().unwrap();
    gen.clear(&state.db)?;
    Ok(gen.clone())
}

/// Open the last successful generation's download in the system browser.
#[tauri::command]
pub async fn download_handwriting(
    state: State<'_, Arc<AppState>>,
) -> Result<GeneratorState, AppError> {
    let url = controller::stored_download_url(&state.db, &state.api)?;
    tracing::info!(url = %url, "opening download in system browser");

    if let Err(e) = open::that(&url) {
        tracing::error!(error = %e, "failed to open download URL");
        return Err(AppError::Internal(
            controller::DOWNLOAD_FAILED_MESSAGE.into(),
        ));
    }

    let mut gen = state.generator.lock().unwrap();
    gen.notice = Some(controller::DOWNLOAD_STARTED_MESSAGE.into());
    Ok(gen.clone())
}

/// The webview reports a preview image that failed to load after a
/// successful generation.
#[tauri::command]
pub fn report_preview_failure(state: State<'_, Arc<AppState>>) -> Result<GeneratorState, AppError> {
    let mut gen = state.generator.lock().unwrap();
    gen.preview_load_failed();
    Ok(gen.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_input_is_partial() {
        let input: UpdateGeneratorFormInput =
            serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert_eq!(input.text.as_deref(), Some("hello"));
        assert!(input.style.is_none());
        assert!(input.size.is_none());
        assert!(input.ink_color.is_none());

        let input: UpdateGeneratorFormInput =
            serde_json::from_str(r#"{"size": "large", "ink_color": "#123456"}"#).unwrap();
        assert_eq!(input.size, Some(HandwritingSize::Large));
        assert_eq!(input.ink_color.as_deref(), Some("#123456"));
    }
}
