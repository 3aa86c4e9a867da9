use serde::Serialize;

/// App-wide error type. Every fallible function returns `Result<T, AppError>`.
/// Serializes cleanly for Tauri IPC so the frontend gets structured error messages.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Rejected input. The message is shown to the user verbatim.
    #[error("{0}")]
    Validation(String),

    /// Transport-level failure: the request never produced a parseable response.
    #[error("{0}")]
    Network(String),

    /// The service answered but reported `success: false`. Carries the
    /// server-supplied message.
    #[error("{0}")]
    Server(String),

    /// An action was requested before its prerequisite completed
    /// (e.g. download before any successful generation).
    #[error("{0}")]
    NotReady(String),

    /// The preview image could not be loaded after a successful generation.
    #[error("{0}")]
    AssetLoad(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Internal(String),
}

/// Tauri requires `Serialize` on command return errors.
/// We serialize as `{ error: "...", kind: "..." }` for frontend consumption.
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("AppError", 2)?;
        s.serialize_field("error", &self.to_string())?;
        s.serialize_field(
            "kind",
            match self {
                AppError::Database(_) => "database",
                AppError::Pool(_) => "pool",
                AppError::Validation(_) => "validation",
                AppError::Network(_) => "network",
                AppError::Server(_) => "server",
                AppError::NotReady(_) => "not_ready",
                AppError::AssetLoad(_) => "asset_load",
                AppError::Io(_) => "io",
                AppError::Internal(_) => "internal",
            },
        )?;
        s.end()
    }
}
