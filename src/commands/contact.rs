use std::sync::Arc;
use tauri::State;

use crate::api::types::ContactMessageInput;
use crate::error::AppError;
use crate::validation;
use crate::AppState;

pub const PRIVACY_MESSAGE: &str = "Please agree to the Privacy Policy";
pub const SEND_FAILED_MESSAGE: &str = "Failed to send message. Please try again.";

/// Validate and relay a contact form message.
///
/// The privacy acknowledgment is this form's rule alone; the generator form
/// has no such check and the two must not be conflated.
#[tauri::command]
pub async fn send_contact_message(
    state: State<'_, Arc<AppState>>,
    input: ContactMessageInput,
) -> Result<String, AppError> {
    ensure_privacy_acknowledged(&input)?;
    validation::require_non_empty("Email", &input.email)?;
    validation::require_non_empty("Message", &input.message)?;

    let resp = match state.api.send_contact(&input).await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!(error = %e, "contact message send failed");
            return Err(AppError::Network(SEND_FAILED_MESSAGE.into()));
        }
    };

    if resp.success {
        Ok(resp.message)
    } else {
        Err(AppError::Server(if resp.message.is_empty() {
            SEND_FAILED_MESSAGE.into()
        } else {
            resp.message
        }))
    }
}

pub(crate) fn ensure_privacy_acknowledged(input: &ContactMessageInput) -> Result<(), AppError> {
    if !input.agree_to_privacy {
        return Err(AppError::Validation(PRIVACY_MESSAGE.into()));
    }
    Ok(())
}
