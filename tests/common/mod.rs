//! Shared fixtures for the integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

use redditshelf::generator::{artifact_at, Artifact, EbookGenerator, GenerationError, RetryPolicy};
use redditshelf::service::StoryService;
use redditshelf::shelf::{Shelf, ShelfStore};
use redditshelf::story::StoryRecord;

/// One recorded call to the fake generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub link: String,
    pub title: String,
    pub output: PathBuf,
}

/// Writes a small file instead of fetching anything. Links in `failing`
/// always fail with a retryable error.
#[derive(Default)]
pub struct FakeGenerator {
    pub calls: Mutex<Vec<Call>>,
    pub failing: HashSet<String>,
}

impl FakeGenerator {
    pub fn failing_on(links: &[&str]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: links.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl EbookGenerator for FakeGenerator {
    async fn generate(
        &self,
        link: &str,
        title: &str,
        output: &Path,
    ) -> Result<Artifact, GenerationError> {
        self.calls.lock().unwrap().push(Call {
            link: link.to_string(),
            title: title.to_string(),
            output: output.to_path_buf(),
        });

        if self.failing.contains(link) {
            return Err(GenerationError::Failed {
                program: "fake".to_string(),
                code: Some(1),
            });
        }

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(output, format!("epub of {}", title)).unwrap();
        artifact_at(output).await
    }
}

/// Single attempt, no waiting
pub fn no_retry() -> RetryPolicy {
    RetryPolicy {
        attempts: 1,
        backoff: Duration::ZERO,
        timeout: Duration::from_secs(5),
    }
}

pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

/// A temporary config dir plus a books folder to write ebooks into
pub struct Fixture {
    pub dir: TempDir,
    pub books: PathBuf,
    pub store: ShelfStore,
}

impl Fixture {
    /// Shelf with one story per title, each with an ebook on disk
    pub fn with_stories(titles: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        let books = dir.path().join("books");
        fs::create_dir_all(&books).unwrap();
        let books = books.canonicalize().unwrap();

        let mut shelf = Shelf::new(books.clone(), date());
        for title in titles {
            let file = books.join(format!("{}.epub", title.to_lowercase()));
            fs::write(&file, "old epub").unwrap();
            shelf.stories.push(StoryRecord::new(
                *title,
                format!("https://x/r/{}", title.to_lowercase()),
                file,
            ));
        }

        let store = ShelfStore::new(dir.path().join("config/redditshelf.json"));
        store.save(&shelf).unwrap();

        Self { dir, books, store }
    }

    pub fn service<'a>(&self, generator: &'a FakeGenerator) -> StoryService<&'a FakeGenerator> {
        StoryService::new(self.store.clone(), generator, no_retry())
    }

    pub fn shelf(&self) -> Shelf {
        self.store.load().unwrap()
    }

    pub fn raw(&self) -> String {
        fs::read_to_string(self.store.path()).unwrap()
    }

    pub fn titles(&self) -> Vec<String> {
        self.shelf().stories.into_iter().map(|s| s.title).collect()
    }
}
