//! Command handlers for the helpdesk CLI.
//!
//! This module organizes all CLI commands into separate submodules, plus the
//! wiring they share (store, session, JSON output).

pub mod ask;
pub mod faq;
pub mod feedback;
pub mod import;
pub mod stats;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use faq::FaqCommand;
pub use feedback::FeedbackCommand;
pub use import::ImportCommand;
pub use stats::StatsCommand;

use helpdesk_core::{config::AppConfig, AppError, AppResult};
use helpdesk_faq::{
    FaqService, LocalIdentityProvider, SessionContext, SessionManager, SqliteStore, UserIdentity,
};
use serde::Serialize;
use std::sync::Arc;

/// Open the workspace document store.
pub(crate) fn open_service(config: &AppConfig) -> AppResult<FaqService> {
    let store = SqliteStore::open(&config.store_path())?;
    Ok(FaqService::new(Arc::new(store)))
}

/// Resolve the session for the configured `--user`.
pub(crate) async fn resolve_session(
    config: &AppConfig,
    service: &FaqService,
) -> SessionContext {
    let provider = Arc::new(LocalIdentityProvider::new());
    if let Some(ref uid) = config.user {
        provider.sign_in(UserIdentity::new(uid.clone()));
    }

    SessionManager::new(service.clone(), provider).sync().await
}

/// Pretty-print a value as JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Serialization(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

/// First `max` characters of `text`, with an ellipsis when cut.
pub(crate) fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut)
}
