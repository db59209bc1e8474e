use axum::{
    extract::{rejection::FormRejection, Form, State},
    http::{header, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use log::{debug, error, info};

use crate::components::PageRenderer;
use crate::router::{self, FailureKind, Outcome, PageForm};
use crate::types::AppState;

/// Entry point for every request: route the path, run the page operation, render the outcome
pub async fn handle_request(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    form: Result<Form<PageForm>, FormRejection>,
) -> Response {
    let path = uri.path().to_string();
    info!("{} '{}'", method, path);

    let form = form.map(|Form(form)| form).map_err(|rejection| {
        debug!("Form not decoded for '{}': {}", path, rejection);
        rejection.body_text()
    });
    let store = state.store.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        router::handle_request(&store, &method, &path, form.as_ref().map_err(String::as_str))
    })
    .await;

    match outcome {
        Ok(outcome) => respond(outcome, state.renderer.as_ref()),
        Err(e) => {
            error!("Page operation did not complete: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}

/// Turn a dispatch outcome into an HTTP response
pub fn respond(outcome: Outcome, renderer: &dyn PageRenderer) -> Response {
    let rendered = match outcome {
        Outcome::RenderView(page) => renderer.render_view(&page),
        Outcome::RenderEdit(page) => renderer.render_edit(&page),
        Outcome::RenderList(titles) => renderer.render_list(&titles),
        Outcome::RenderCreate => renderer.render_create(),
        Outcome::Redirect { action, title } => {
            let location = Outcome::redirect_location(action, &title);
            return (StatusCode::FOUND, [(header::LOCATION, location)]).into_response();
        }
        Outcome::Fail { kind, detail } => {
            let status = match kind {
                FailureKind::InvalidTitle | FailureKind::InvalidForm => StatusCode::BAD_REQUEST,
                FailureKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
                FailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            };
            return (status, detail).into_response();
        }
        Outcome::NotFound => return (StatusCode::NOT_FOUND, "404 page not found").into_response(),
    };

    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Rendering failed: {}", e);
            e.into_response()
        }
    }
}
