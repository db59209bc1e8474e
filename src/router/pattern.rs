//! Typed route table.
//!
//! Each rule is a verb literal plus an optional title segment. Rules are tried
//! in order and the first match wins; a path no rule accepts has no route.

use axum::http::Method;

use crate::services::is_valid_title;

/// Operation a request path is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Edit,
    /// Save a page whose title is in the path
    Save,
    /// Save a page whose title comes from the submitted form
    SaveNew,
    Create,
    List,
}

impl Action {
    /// Canonical path verb, used to build redirect targets
    pub fn verb(self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Edit => "edit",
            Action::Save | Action::SaveNew => "save",
            Action::Create => "create",
            Action::List => "list",
        }
    }

    /// Request methods the action accepts
    pub fn allows(self, method: &Method) -> bool {
        match self {
            Action::View | Action::Create | Action::List => *method == Method::GET || *method == Method::HEAD,
            Action::Edit => *method == Method::GET || *method == Method::HEAD || *method == Method::POST,
            Action::Save | Action::SaveNew => *method == Method::POST,
        }
    }
}

/// A matched request: the bound action and the title captured from the path.
///
/// `title` is empty for actions that take no path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub action: Action,
    pub title: String,
}

#[derive(Debug, Clone, Copy)]
enum Segment {
    /// `/<verb>` or `/<verb>/`
    Bare,
    /// `/<verb>/<title>`
    Title,
}

struct Rule {
    verb: &'static str,
    segment: Segment,
    action: Action,
}

const RULES: &[Rule] = &[
    Rule { verb: "", segment: Segment::Bare, action: Action::List },
    Rule { verb: "list", segment: Segment::Bare, action: Action::List },
    Rule { verb: "create", segment: Segment::Bare, action: Action::Create },
    Rule { verb: "view", segment: Segment::Title, action: Action::View },
    Rule { verb: "edit", segment: Segment::Title, action: Action::Edit },
    Rule { verb: "save", segment: Segment::Title, action: Action::Save },
    Rule { verb: "saveedit", segment: Segment::Title, action: Action::Save },
    Rule { verb: "save", segment: Segment::Bare, action: Action::SaveNew },
    Rule { verb: "savenew", segment: Segment::Bare, action: Action::SaveNew },
];

impl Rule {
    fn matches(&self, verb: &str, rest: Option<&str>) -> Option<Route> {
        if verb != self.verb {
            return None;
        }
        match (self.segment, rest) {
            (Segment::Bare, None | Some("")) => Some(Route { action: self.action, title: String::new() }),
            (Segment::Title, Some(title)) if is_valid_title(title) => {
                Some(Route { action: self.action, title: title.to_string() })
            }
            _ => None,
        }
    }
}

/// Match a raw request path (no query string) against the route table
pub fn match_path(path: &str) -> Option<Route> {
    let trimmed = path.strip_prefix('/')?;
    let (verb, rest) = match trimmed.split_once('/') {
        Some((verb, rest)) => (verb, Some(rest)),
        None => (trimmed, None),
    };
    RULES.iter().find_map(|rule| rule.matches(verb, rest))
}
