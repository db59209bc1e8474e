use std::fs;
use std::io;
use std::path::Path;

use log::{debug, info};

use crate::errors::WikiError;
use crate::types::Page;
use crate::utils::escape_html;

/// Rendering collaborator the HTTP layer hands finished values to
pub trait PageRenderer: Send + Sync {
    fn render_view(&self, page: &Page) -> Result<String, WikiError>;
    fn render_edit(&self, page: &Page) -> Result<String, WikiError>;
    fn render_list(&self, titles: &[String]) -> Result<String, WikiError>;
    fn render_create(&self) -> Result<String, WikiError>;
}

const VIEW_HTML: &str = "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>{{TITLE}}</title></head><body><h1>{{TITLE}}</h1><p>[<a href=\"/edit/{{TITLE}}\">edit</a>] [<a href=\"/list\">all pages</a>]</p><div><pre>{{BODY}}</pre></div></body></html>";
const EDIT_HTML: &str = "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>Editing {{TITLE}}</title></head><body><h1>Editing {{TITLE}}</h1><form action=\"/save/{{TITLE}}\" method=\"POST\"><div><textarea name=\"body\" rows=\"20\" cols=\"80\">{{BODY}}</textarea></div><div><input type=\"submit\" value=\"Save\"></div></form></body></html>";
const LIST_HTML: &str = "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>All pages</title></head><body><h1>All pages</h1><p>[<a href=\"/create\">new page</a>]</p><ul>{{ITEMS}}</ul></body></html>";
const CREATE_HTML: &str = "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>New page</title></head><body><h1>New page</h1><form action=\"/save\" method=\"POST\"><div><input type=\"text\" name=\"title\" pattern=\"[A-Za-z0-9]+\" required></div><div><textarea name=\"body\" rows=\"20\" cols=\"80\"></textarea></div><div><input type=\"submit\" value=\"Save\"></div></form></body></html>";

/// HTML templates, loaded once at startup and immutable afterwards
#[derive(Debug, Clone)]
pub struct Templates {
    view: String,
    edit: String,
    list: String,
    create: String,
}

impl Templates {
    /// Built-in templates only
    pub fn builtin() -> Self {
        Self {
            view: VIEW_HTML.to_string(),
            edit: EDIT_HTML.to_string(),
            list: LIST_HTML.to_string(),
            create: CREATE_HTML.to_string(),
        }
    }

    /// Load `view.html`, `edit.html`, `list.html` and `create.html` from `dir`.
    /// A file that does not exist falls back to its built-in version.
    pub fn load(dir: &Path) -> Result<Self, WikiError> {
        let templates = Self {
            view: load_or(dir, "view.html", VIEW_HTML)?,
            edit: load_or(dir, "edit.html", EDIT_HTML)?,
            list: load_or(dir, "list.html", LIST_HTML)?,
            create: load_or(dir, "create.html", CREATE_HTML)?,
        };
        info!("Templates ready (views directory: {:?})", dir);
        Ok(templates)
    }

    fn fill_page(template: &str, page: &Page) -> String {
        template
            .replace("{{TITLE}}", &escape_html(&page.title))
            .replace("{{BODY}}", &escape_html(&page.body_text()))
    }
}

fn load_or(dir: &Path, name: &str, fallback: &str) -> Result<String, WikiError> {
    let path = dir.join(name);
    match fs::read_to_string(&path) {
        Ok(template) => {
            debug!("Loaded template {:?}", path);
            Ok(template)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No template at {:?}, using built-in {}", path, name);
            Ok(fallback.to_string())
        }
        Err(e) => Err(WikiError::TemplateError(format!("{}: {}", path.display(), e))),
    }
}

impl PageRenderer for Templates {
    fn render_view(&self, page: &Page) -> Result<String, WikiError> {
        Ok(Self::fill_page(&self.view, page))
    }

    fn render_edit(&self, page: &Page) -> Result<String, WikiError> {
        Ok(Self::fill_page(&self.edit, page))
    }

    fn render_list(&self, titles: &[String]) -> Result<String, WikiError> {
        let items: String = titles
            .iter()
            .map(|title| {
                let title = escape_html(title);
                format!("<li><a href=\"/view/{}\">{}</a></li>", title, title)
            })
            .collect();
        Ok(self.list.replace("{{ITEMS}}", &items))
    }

    fn render_create(&self) -> Result<String, WikiError> {
        Ok(self.create.clone())
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_escapes_body() {
        let html = Templates::builtin()
            .render_view(&Page::new("Home", "<script>alert(1)</script>"))
            .unwrap();

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("/edit/Home"));
    }

    #[test]
    fn edit_form_posts_to_save() {
        let html = Templates::builtin().render_edit(&Page::empty("Fresh")).unwrap();

        assert!(html.contains("action=\"/save/Fresh\""));
    }

    #[test]
    fn list_links_every_title() {
        let titles = vec!["A".to_string(), "B".to_string()];
        let html = Templates::builtin().render_list(&titles).unwrap();

        assert!(html.contains("<a href=\"/view/A\">A</a>"));
        assert!(html.contains("<a href=\"/view/B\">B</a>"));
    }

    #[test]
    fn views_directory_overrides_builtins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("view.html"), "custom {{TITLE}}: {{BODY}}").unwrap();

        let templates = Templates::load(dir.path()).unwrap();

        assert_eq!(templates.render_view(&Page::new("X", "y")).unwrap(), "custom X: y");
        assert!(templates.render_create().unwrap().contains("action=\"/save\""));
    }
}
