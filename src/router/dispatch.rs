use axum::http::Method;
use log::{debug, error, info, warn};
use serde::Deserialize;

use super::pattern::{match_path, Action, Route};
use crate::errors::WikiError;
use crate::services::PageStore;
use crate::types::Page;

/// Fields submitted by the edit and create forms
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidTitle,
    /// Submitted form could not be decoded
    InvalidForm,
    MethodNotAllowed,
    Internal,
}

/// What the transport should do with a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    RenderView(Page),
    RenderEdit(Page),
    RenderList(Vec<String>),
    RenderCreate,
    Redirect { action: Action, title: String },
    Fail { kind: FailureKind, detail: String },
    NotFound,
}

impl Outcome {
    /// Redirect target as a path, e.g. `/edit/Home`
    pub fn redirect_location(action: Action, title: &str) -> String {
        format!("/{}/{}", action.verb(), title)
    }

    fn fail(err: WikiError) -> Self {
        let kind = match err {
            WikiError::InvalidTitle(_) => FailureKind::InvalidTitle,
            _ => FailureKind::Internal,
        };
        Outcome::Fail { kind, detail: err.to_string() }
    }
}

/// Route a request path and run the bound operation against `store`.
///
/// `form` is the decoded request form, or the reason it could not be decoded.
/// Only the save actions read it, and they refuse to write without it.
pub fn handle_request(store: &PageStore, method: &Method, path: &str, form: Result<&PageForm, &str>) -> Outcome {
    let Some(route) = match_path(path) else {
        debug!("No route for path: '{}'", path);
        return Outcome::NotFound;
    };
    if !route.action.allows(method) {
        warn!("{} not allowed on '{}'", method, path);
        return Outcome::Fail {
            kind: FailureKind::MethodNotAllowed,
            detail: format!("{} is not allowed on {}", method, path),
        };
    }
    dispatch(store, &route, form)
}

/// Run the operation for an already matched route
pub fn dispatch(store: &PageStore, route: &Route, form: Result<&PageForm, &str>) -> Outcome {
    match route.action {
        Action::View => view(store, &route.title),
        Action::Edit => edit(store, &route.title),
        Action::Save | Action::SaveNew => {
            let form = match form {
                Ok(form) => form,
                Err(detail) => {
                    warn!("Refusing to save '{}': unreadable form: {}", route.title, detail);
                    return Outcome::Fail {
                        kind: FailureKind::InvalidForm,
                        detail: format!("unreadable form: {}", detail),
                    };
                }
            };
            let title = if route.action == Action::Save { &route.title } else { &form.title };
            save(store, title, &form.body)
        }
        Action::Create => Outcome::RenderCreate,
        Action::List => list(store),
    }
}

fn view(store: &PageStore, title: &str) -> Outcome {
    match store.load(title) {
        Ok(page) => Outcome::RenderView(page),
        Err(WikiError::NotFound(_)) => {
            info!("Page '{}' missing, redirecting to editor", title);
            Outcome::Redirect { action: Action::Edit, title: title.to_string() }
        }
        Err(e) => Outcome::fail(e),
    }
}

fn edit(store: &PageStore, title: &str) -> Outcome {
    match store.load(title) {
        Ok(page) => Outcome::RenderEdit(page),
        Err(WikiError::NotFound(_)) => Outcome::RenderEdit(Page::empty(title)),
        Err(e) => Outcome::fail(e),
    }
}

fn save(store: &PageStore, title: &str, body: &str) -> Outcome {
    let page = Page::new(title, body);
    match store.save(&page) {
        Ok(()) => Outcome::Redirect { action: Action::View, title: page.title },
        Err(e) => Outcome::fail(e),
    }
}

fn list(store: &PageStore) -> Outcome {
    match store.list_titles() {
        Ok(mut titles) => {
            titles.sort();
            Outcome::RenderList(titles)
        }
        Err(e) => {
            error!("Listing pages failed: {}", e);
            Outcome::fail(e)
        }
    }
}
