pub mod api;
pub mod commands;
pub mod parcel;
pub mod render;
pub mod store;
pub mod types;

use std::collections::HashSet;

use tokio::sync::Mutex;

use crate::types::QuestionRow;

/// All runtime state shared across Tauri commands.
pub struct AppState {
    /// Shared HTTP client for the Stack Exchange API.
    pub http: reqwest::Client,
    /// The current result batch, in display order. Replaced wholesale when a
    /// search completes; individual rows are replaced (never mutated) when
    /// they are visited.
    pub results: Vec<QuestionRow>,
    /// Question ids the user has opened. Seeds each row's tri-state visited
    /// flag at construction and persists across sessions.
    pub visited: HashSet<i64>,
}

impl AppState {
    fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            results: Vec::new(),
            visited: HashSet::new(),
        }
    }
}

/// Type alias used in Tauri command signatures.
pub type AppMutex = Mutex<AppState>;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Full logs in debug builds, WARN and above in production
    #[cfg(debug_assertions)]
    tracing_subscriber::fmt::init();
    #[cfg(not(debug_assertions))]
    tracing_subscriber::fmt().with_max_level(tracing::Level::WARN).init();

    let http = api::http_client().expect("failed to build http client");

    tauri::Builder::default()
        .manage(AppMutex::new(AppState::new(http)))
        .invoke_handler(tauri::generate_handler![
            commands::search_questions,
            commands::open_question,
            commands::restore_last_search,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
