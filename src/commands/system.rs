use crate::error::AppError;

/// Open a link from the webview (footer links, privacy policy, etc.) in the
/// system browser.
#[tauri::command]
pub async fn open_external_url(url: String) -> Result<(), AppError> {
    let trimmed = url.trim();
    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        return Err(AppError::Validation(
            "Only http/https URLs are allowed".into(),
        ));
    }

    tracing::info!(url = %trimmed, "open_external_url requested");

    open::that(trimmed).map_err(|e| AppError::Internal(format!("Failed to open URL: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_non_http_urls_are_rejected() {
        let err = open_external_url("file:///etc/passwd".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = open_external_url("javascript:alert(1)".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
