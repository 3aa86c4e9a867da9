/// Canonical settings key constants for the `app_settings` table.
///
/// Use these instead of raw string literals to prevent typo-based key mismatches.

/// Sample id of the most recent successful generation. Written on every
/// success, removed by the clear action; the download command reads it.
pub const CURRENT_SAMPLE_ID: &str = "current_sample_id";

/// Base origin of the handwriting generation service
/// (e.g. `http://localhost:8000`). Optional; see `api::config`.
pub const API_BASE_URL: &str = "api_base_url";
