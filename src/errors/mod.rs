use std::{fmt, io};
use axum::{http::StatusCode, response::{IntoResponse, Response}};

/// Error types for page storage and rendering
#[derive(Debug)]
pub enum WikiError {
    /// Title rejected before any filesystem access
    InvalidTitle(String),
    /// No page is stored under this title
    NotFound(String),
    Io(io::Error),
    TemplateError(String),
}

impl WikiError {
    pub fn status(&self) -> StatusCode {
        match self {
            WikiError::InvalidTitle(_) => StatusCode::BAD_REQUEST,
            WikiError::NotFound(_) => StatusCode::NOT_FOUND,
            WikiError::Io(_) | WikiError::TemplateError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for WikiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WikiError::InvalidTitle(title) => write!(f, "invalid page title: {:?}", title),
            WikiError::NotFound(title) => write!(f, "page not found: {}", title),
            WikiError::Io(e) => write!(f, "I/O error: {}", e),
            WikiError::TemplateError(e) => write!(f, "Template error: {}", e),
        }
    }
}

impl std::error::Error for WikiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WikiError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for WikiError {
    fn from(err: io::Error) -> Self {
        WikiError::Io(err)
    }
}

impl IntoResponse for WikiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
