//! Path routing and dispatch to page operations.

pub mod dispatch;
pub mod pattern;

pub use dispatch::{dispatch, handle_request, FailureKind, Outcome, PageForm};
pub use pattern::{match_path, Action, Route};
