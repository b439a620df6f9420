//! Student handbook helpdesk.
//!
//! Answers questions from a curated FAQ collection: relevant entries are
//! found by keyword overlap, handed to a completion API as grounding
//! context, and every interaction is recorded for analytics.

pub mod analytics;
pub mod ask;
pub mod compose;
pub mod import;
pub mod keywords;
pub mod search;
pub mod service;
pub mod session;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use analytics::{compute_stats, AnalyticsReport};
pub use ask::{ask, AskOutcome};
pub use compose::{build_context, AnswerComposer, NO_CONTENT_PLACEHOLDER};
pub use import::{import_faqs, ImportEvent, ImportReport, SeedFile};
pub use keywords::extract_keywords;
pub use search::{rank_matches, MAX_RELATED_FAQS};
pub use service::FaqService;
pub use session::{
    require_admin, AuthState, IdentityProvider, LocalIdentityProvider, SessionContext,
    SessionManager, UserIdentity,
};
pub use store::{DocumentStore, MemoryStore, SqliteStore};
pub use types::{
    AdminRecord, FaqEntry, FaqUpdate, NewFaq, QueryLogEntry, DEFAULT_CATEGORY, KNOWN_CATEGORIES,
};
