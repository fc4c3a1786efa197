//! Operations on the shelf.
//!
//! Every operation is a full load → mutate → save cycle against the
//! [`ShelfStore`]; nothing is cached between calls. Operations that produce an
//! ebook go through [`generate_with_retry`], so each attempt is time-bounded
//! and network failures get retried before they are reported.

use chrono::{Local, NaiveDate};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{Result, ShelfError};
use crate::generator::{generate_with_retry, Artifact, EbookGenerator, GenerationError, RetryPolicy};
use crate::shelf::{Shelf, ShelfStore};
use crate::story::{default_output, default_title, Identifier, StoryRecord};

/// Result of `set_destination_folder`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderChange {
    pub previous: PathBuf,
    pub current: PathBuf,
    pub repointed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedStory {
    pub index: usize,
    pub record: StoryRecord,
    pub artifact: Artifact,
}

/// Field changes requested by `edit`; `None` leaves the field alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryEdit {
    pub title: Option<String>,
    pub dest: Option<PathBuf>,
    pub link: Option<String>,
}

impl StoryEdit {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.dest.is_none() && self.link.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// No fields were supplied; the shelf was not touched
    Unchanged,
    Updated {
        index: usize,
        record: StoryRecord,
        artifact: Artifact,
        /// Ebook removed from the old location when the destination changed
        removed: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedStory {
    pub index: usize,
    pub record: StoryRecord,
    /// Whether an ebook was actually removed from disk
    pub artifact_removed: bool,
}

#[derive(Debug)]
pub struct UpdateFailure {
    pub index: usize,
    pub title: String,
    pub error: GenerationError,
}

/// Outcome of regenerating every story
#[derive(Debug)]
pub struct UpdateReport {
    pub total: usize,
    pub refreshed: Vec<String>,
    pub failures: Vec<UpdateFailure>,
    /// Last-update date after the pass; unchanged if anything failed
    pub last_update: NaiveDate,
}

impl UpdateReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct StoryService<G> {
    store: ShelfStore,
    generator: G,
    policy: RetryPolicy,
}

impl<G: EbookGenerator> StoryService<G> {
    pub fn new(store: ShelfStore, generator: G, policy: RetryPolicy) -> Self {
        Self {
            store,
            generator,
            policy,
        }
    }

    pub fn store(&self) -> &ShelfStore {
        &self.store
    }

    /// The shelf as stored; read-only
    pub fn list(&self) -> Result<Shelf> {
        self.store.load()
    }

    /// Regenerate every story's ebook and stamp today as the last update
    pub async fn update_all(&self) -> Result<UpdateReport> {
        self.update_all_as_of(Local::now().date_naive()).await
    }

    /// Regenerate every story's ebook in place.
    ///
    /// A failing story does not stop the pass. `last-update` only moves to
    /// `today` when every story succeeded.
    pub async fn update_all_as_of(&self, today: NaiveDate) -> Result<UpdateReport> {
        let mut shelf = self.store.load()?;
        let total = shelf.stories.len();
        let mut refreshed = Vec::new();
        let mut failures = Vec::new();

        for (index, story) in shelf.stories.iter().enumerate() {
            info!(index, total, title = %story.title, "updating story");

            match self.generate(&story.source_link, &story.title, &story.file_path).await {
                Ok(_) => refreshed.push(story.title.clone()),
                Err(error) => {
                    warn!(title = %story.title, %error, "failed to update story");
                    failures.push(UpdateFailure {
                        index,
                        title: story.title.clone(),
                        error,
                    });
                }
            }
        }

        if failures.is_empty() {
            shelf.last_update = today;
            self.store.save(&shelf)?;
        }

        Ok(UpdateReport {
            total,
            refreshed,
            failures,
            last_update: shelf.last_update,
        })
    }

    /// Make `folder` the destination for new ebooks and repoint every story
    /// that lived in the previous destination. Files on disk are not moved.
    pub fn set_destination_folder(&self, folder: &Path) -> Result<FolderChange> {
        if !folder.is_dir() {
            return Err(ShelfError::InvalidFolder(folder.to_path_buf()));
        }
        let folder = folder
            .canonicalize()
            .map_err(|e| ShelfError::io(folder, e))?;

        let mut shelf = self.store.load()?;
        let previous = shelf.destination_folder.clone();
        let repointed = shelf.repoint(&folder);
        self.store.save(&shelf)?;

        info!(from = %previous.display(), to = %folder.display(), repointed, "destination folder changed");

        Ok(FolderChange {
            previous,
            current: folder,
            repointed,
        })
    }

    /// Track a new story and generate its ebook.
    ///
    /// The title defaults to one derived from the link and the output to a
    /// file named after the title in the destination folder. The story is only
    /// recorded once its ebook was generated.
    pub async fn add(
        &self,
        link: &str,
        title: Option<&str>,
        output: Option<&Path>,
    ) -> Result<AddedStory> {
        let mut shelf = self.store.load()?;

        let title = title.map_or_else(|| default_title(link), str::to_string);
        let output = output.map_or_else(
            || default_output(&shelf.destination_folder, &title),
            Path::to_path_buf,
        );

        let artifact = self
            .generate(link, &title, &output)
            .await
            .map_err(|source| ShelfError::Generation {
                title: title.clone(),
                source,
            })?;

        let record = StoryRecord::new(title, link, output);
        shelf.stories.push(record.clone());
        self.store.save(&shelf)?;

        Ok(AddedStory {
            index: shelf.stories.len() - 1,
            record,
            artifact,
        })
    }

    /// Change a story's title, ebook location or link and regenerate it.
    ///
    /// When the location changes, the ebook at the old location is removed
    /// after the new one was generated.
    pub async fn edit(&self, id: &Identifier, changes: StoryEdit) -> Result<EditOutcome> {
        let mut shelf = self.store.load()?;
        let index = resolve(&shelf, id)?;

        if changes.is_empty() {
            return Ok(EditOutcome::Unchanged);
        }

        let previous = shelf.stories[index].clone();
        let mut record = previous.clone();
        if let Some(title) = changes.title {
            record.title = title;
        }
        if let Some(dest) = changes.dest {
            record.file_path = dest;
        }
        if let Some(link) = changes.link {
            record.source_link = link;
        }

        let artifact = self
            .generate(&record.source_link, &record.title, &record.file_path)
            .await
            .map_err(|source| ShelfError::Generation {
                title: record.title.clone(),
                source,
            })?;

        let mut removed = None;
        if !same_file(&record.file_path, &previous.file_path)
            && remove_artifact(&previous.file_path)
        {
            removed = Some(previous.file_path);
        }

        shelf.stories[index] = record.clone();
        self.store.save(&shelf)?;

        Ok(EditOutcome::Updated {
            index,
            record,
            artifact,
            removed,
        })
    }

    /// Stop tracking a story and remove its ebook
    pub fn delete(&self, id: &Identifier) -> Result<DeletedStory> {
        let mut shelf = self.store.load()?;
        let index = resolve(&shelf, id)?;

        let record = shelf.stories.remove(index);
        let artifact_removed = remove_artifact(&record.file_path);
        self.store.save(&shelf)?;

        Ok(DeletedStory {
            index,
            record,
            artifact_removed,
        })
    }

    async fn generate(
        &self,
        link: &str,
        title: &str,
        output: &Path,
    ) -> std::result::Result<Artifact, GenerationError> {
        generate_with_retry(&self.generator, &self.policy, link, title, output).await
    }
}

fn resolve(shelf: &Shelf, id: &Identifier) -> Result<usize> {
    shelf
        .position(id)
        .ok_or_else(|| ShelfError::StoryNotFound(id.to_string()))
}

/// Whether both paths name the same file, however they are spelled.
/// Paths that cannot be resolved are compared as written.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Best-effort removal. A file that is already gone is fine; anything else
/// is logged and otherwise ignored. Returns whether a file was removed.
fn remove_artifact(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not remove ebook");
            false
        }
    }
}
