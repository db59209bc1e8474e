use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::errors::WikiError;
use crate::types::Page;

/// Extension of every page file in the content directory
pub const PAGE_EXTENSION: &str = ".txt";

/// Title grammar `^[A-Za-z0-9]+$`. Anything else could escape the content directory.
pub fn is_valid_title(title: &str) -> bool {
    !title.is_empty() && title.bytes().all(|b| b.is_ascii_alphanumeric())
}

fn check_title(title: &str) -> Result<(), WikiError> {
    if is_valid_title(title) {
        Ok(())
    } else {
        warn!("Rejected page title: {:?}", title);
        Err(WikiError::InvalidTitle(title.to_string()))
    }
}

/// Flat-file page storage: one `<title>.txt` per page inside a single directory.
///
/// Every call blocks on the filesystem. Saves are atomic (temp file + rename),
/// so a concurrent load sees either the previous or the new body in full.
/// Two concurrent saves to the same title are not ordered; the last rename wins.
#[derive(Debug, Clone)]
pub struct PageStore {
    dir: PathBuf,
}

impl PageStore {
    /// Bind a store to `dir` without touching the filesystem
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        debug!("Creating PageStore with content directory: {:?}", dir);
        Self { dir }
    }

    /// Bind a store to `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, WikiError> {
        let store = Self::new(dir);
        fs::create_dir_all(&store.dir).map_err(|e| {
            error!("Failed to create content directory {:?}: {}", store.dir, e);
            WikiError::Io(e)
        })?;
        Ok(store)
    }

    fn page_path(&self, title: &str) -> PathBuf {
        self.dir.join(format!("{}{}", title, PAGE_EXTENSION))
    }

    /// Read the page stored under `title`
    pub fn load(&self, title: &str) -> Result<Page, WikiError> {
        check_title(title)?;
        let path = self.page_path(title);
        match fs::read(&path) {
            Ok(body) => {
                debug!("Loaded page '{}' ({} bytes)", title, body.len());
                Ok(Page { title: title.to_string(), body })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Page '{}' does not exist", title);
                Err(WikiError::NotFound(title.to_string()))
            }
            Err(e) => {
                error!("Failed to read page {:?}: {}", path, e);
                Err(WikiError::Io(e))
            }
        }
    }

    /// Create or fully replace the file for `page.title`
    pub fn save(&self, page: &Page) -> Result<(), WikiError> {
        check_title(&page.title)?;
        let path = self.page_path(&page.title);
        self.write_atomic(&path, &page.body).map_err(|e| {
            error!("Failed to save page {:?}: {}", path, e);
            WikiError::Io(e)
        })?;
        info!("Saved page '{}' ({} bytes)", page.title, page.body.len());
        Ok(())
    }

    // The temp file must live in the same directory so the rename never crosses filesystems.
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut tmp = tempfile::Builder::new()
            .prefix(".page-")
            .suffix(".tmp")
            .tempfile_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        if let Err(e) = File::open(&self.dir).and_then(|dir| dir.sync_all()) {
            warn!("Failed to sync content directory {:?}: {}", self.dir, e);
        }
        Ok(())
    }

    /// Titles of all stored pages, in directory enumeration order.
    ///
    /// Entries that are not regular `<title>.txt` files are skipped.
    /// The order is unspecified; sort before display.
    pub fn list_titles(&self) -> Result<Vec<String>, WikiError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            error!("Failed to read content directory {:?}: {}", self.dir, e);
            WikiError::Io(e)
        })?;

        let mut titles = Vec::new();
        for entry in entries {
            let file_type = entry.and_then(|entry| Ok((entry.file_type()?, entry)));
            let (file_type, entry) = file_type.map_err(|e| {
                error!("Failed to read entry in {:?}: {}", self.dir, e);
                WikiError::Io(e)
            })?;
            if !file_type.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            match name.strip_suffix(PAGE_EXTENSION) {
                Some(title) if is_valid_title(title) => titles.push(title.to_string()),
                _ => debug!("Skipping non-page entry: {:?}", name),
            }
        }

        debug!("Listed {} pages in {:?}", titles.len(), self.dir);
        Ok(titles)
    }
}
