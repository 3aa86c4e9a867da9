mod api;
mod commands;
mod db;
mod error;
mod generator;
mod logging;
mod validation;

use std::sync::{Arc, Mutex};

use tauri::Manager;

use api::client::HandwritingClient;
use db::DbPool;
use generator::controller::GeneratorState;

/// Shared application state accessible from all Tauri commands.
pub struct AppState {
    pub db: DbPool,
    /// HTTP client for the handwriting generation service.
    pub api: Arc<HandwritingClient>,
    /// Generator workflow state: form, request lifecycle, loaded options.
    pub generator: Mutex<GeneratorState>,
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    logging::init();

    tracing::info!(
        "Starting HandwritingBot Desktop v{}",
        env!("CARGO_PKG_VERSION")
    );

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let app_data_dir = app
                .path()
                .app_data_dir()
                .expect("Failed to resolve app data directory");

            let pool = db::init_db(&app_data_dir)?;

            let client = Arc::new(HandwritingClient::new(api::config::resolve_base_url(&pool)));
            tracing::info!(origin = %client.base_url(), "Generation service origin resolved");

            let state_arc = Arc::new(AppState {
                db: pool,
                api: client,
                generator: Mutex::new(GeneratorState::new()),
            });
            app.manage(state_arc.clone());

            // Load languages and styles for the default selection as soon
            // as the app is up; the webview picks the lists up with its
            // first snapshot. Failures here are non-critical.
            tauri::async_runtime::spawn(async move {
                commands::generator::refresh_options(&state_arc).await;
            });

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Generator workflow
            commands::generator::get_generator_state,
            commands::generator::get_form_catalog,
            commands::generator::load_generator_options,
            commands::generator::set_language,
            commands::generator::update_generator_form,
            commands::generator::attach_generator_file,
            commands::generator::remove_generator_file,
            commands::generator::generate_handwriting,
            commands::generator::clear_generator,
            commands::generator::download_handwriting,
            commands::generator::report_preview_failure,
            // Contact
            commands::contact::send_contact_message,
            // Settings
            commands::settings::get_app_setting,
            commands::settings::set_app_setting,
            commands::settings::delete_app_setting,
            // System
            commands::system::open_external_url,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
