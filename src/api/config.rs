use crate::db::repos::settings;
use crate::db::{settings_keys, DbPool};

/// Origin used when neither the environment nor settings provide one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment override, checked before the stored setting.
pub const BASE_URL_ENV: &str = "HANDWRITING_API_URL";

/// Resolve the generation-service origin: env var, then the `api_base_url`
/// setting, then the default. Invalid values are logged and skipped.
pub fn resolve_base_url(pool: &DbPool) -> String {
    if let Ok(raw) = std::env::var(BASE_URL_ENV) {
        if let Some(origin) = normalize_origin(&raw) {
            return origin;
        }
    }

    match settings::get(pool, settings_keys::API_BASE_URL) {
        Ok(Some(raw)) => {
            if let Some(origin) = normalize_origin(&raw) {
                return origin;
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "failed to read API origin setting"),
    }

    DEFAULT_BASE_URL.to_string()
}

/// Validate an http(s) origin and strip any trailing slash.
fn normalize_origin(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    match url::Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(trimmed.to_string()),
        _ => {
            tracing::warn!(value = %raw, "ignoring invalid API origin");
            None
        }
    }
}
