//! Flatwiki - a minimal personal wiki stored as flat text files
//!
//! Pages live in a content directory as one `<title>.txt` per page. Requests are
//! matched against a small typed route table and dispatched to view, edit, save,
//! create and list operations on the page store.

pub mod components;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod logger;
pub mod router;
pub mod services;
pub mod types;
pub mod utils;

use axum::Router;

pub use components::{PageRenderer, Templates};
pub use config::Config;
pub use errors::WikiError;
pub use services::PageStore;
pub use types::{AppState, Page};

/// Build the HTTP application. Every path goes through the page router.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .fallback(handlers::handle_request)
        .with_state(state)
}
