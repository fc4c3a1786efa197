//! The persisted shelf document and the store that reads and writes it.
//!
//! The shelf is one JSON file:
//!
//! ```json
//! {
//!     "destination-folder": "/home/me/Books",
//!     "last-update": "2024-05-01",
//!     "stories": [
//!         {
//!             "file": "/home/me/Books/some_story.epub",
//!             "reddit": "https://www.reddit.com/r/HFY/comments/abc/some_story/",
//!             "title": "Some Story"
//!         }
//!     ]
//! }
//! ```
//!
//! Keys are always written sorted with four-space indentation so the file
//! diffs cleanly between edits.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, ShelfError};
use crate::story::{Identifier, StoryRecord};

/// File name of the shelf inside the config directory
pub const SHELF_FILE: &str = "redditshelf.json";

const INDENT: &[u8] = b"    ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shelf {
    #[serde(rename = "destination-folder")]
    pub destination_folder: PathBuf,
    #[serde(rename = "last-update")]
    pub last_update: NaiveDate,
    #[serde(default)]
    pub stories: Vec<StoryRecord>,
}

impl Shelf {
    /// An empty shelf writing into `destination_folder`
    pub fn new(destination_folder: impl Into<PathBuf>, last_update: NaiveDate) -> Self {
        Self {
            destination_folder: destination_folder.into(),
            last_update,
            stories: Vec::new(),
        }
    }

    /// Position of the story `id` refers to, if any.
    /// Title lookup is exact and the first match wins.
    pub fn position(&self, id: &Identifier) -> Option<usize> {
        match id {
            Identifier::Index(index) => (*index < self.stories.len()).then_some(*index),
            Identifier::Title(title) => self.stories.iter().position(|s| &s.title == title),
        }
    }

    /// Point the shelf at `folder`, rewriting the file path of every story
    /// that lived directly in the previous destination folder.
    /// Returns the number of stories that were repointed.
    pub fn repoint(&mut self, folder: &Path) -> usize {
        let previous = std::mem::replace(&mut self.destination_folder, folder.to_path_buf());
        let mut repointed = 0;

        for story in &mut self.stories {
            if story.file_path.parent() != Some(previous.as_path()) {
                continue;
            }
            if let Some(name) = story.file_path.file_name() {
                story.file_path = folder.join(name);
                repointed += 1;
            }
        }

        repointed
    }

    /// Serialize with sorted keys and fixed indentation
    pub fn to_json(&self) -> Result<String> {
        // serde_json::Value keeps object keys in a BTreeMap, which sorts them
        let value = serde_json::to_value(self)?;
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut serializer)?;
        buf.push(b'\n');

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Handle on the shelf file. Every command loads, mutates and saves through it.
#[derive(Debug, Clone)]
pub struct ShelfStore {
    path: PathBuf,
}

impl ShelfStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the whole shelf
    pub fn load(&self) -> Result<Shelf> {
        debug!(path = %self.path.display(), "loading shelf");

        let content = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ShelfError::ConfigNotFound(self.path.clone()),
            _ => ShelfError::io(&self.path, e),
        })?;

        serde_json::from_str(&content).map_err(|source| ShelfError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the shelf file with `shelf`.
    ///
    /// The document is written to a temporary file next to the target and
    /// renamed over it, so readers never observe a half-written shelf.
    pub fn save(&self, shelf: &Shelf) -> Result<()> {
        let content = shelf.to_json()?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        fs::create_dir_all(&dir).map_err(|e| ShelfError::io(&dir, e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| ShelfError::io(&dir, e))?;
        tmp.write_all(content.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| ShelfError::io(tmp.path(), e))?;

        // Temp files start out private; keep whatever mode the shelf already had
        if let Ok(meta) = fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| ShelfError::io(tmp.path(), e))?;
        }
        tmp.persist(&self.path)
            .map_err(|e| ShelfError::io(&self.path, e.error))?;

        debug!(path = %self.path.display(), stories = shelf.stories.len(), "saved shelf");
        Ok(())
    }

    /// Write `template` as a fresh shelf. Refuses to touch an existing file
    /// unless `force` is set.
    pub fn initialize(&self, force: bool, template: &Shelf) -> Result<()> {
        if self.path.exists() && !force {
            return Err(ShelfError::AlreadyInitialized(self.path.clone()));
        }
        self.save(template)
    }
}
