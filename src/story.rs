use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// File extension of generated ebooks
pub const EBOOK_EXTENSION: &str = "epub";

/// A tracked story: where to fetch it from and where its ebook lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRecord {
    pub title: String,
    #[serde(rename = "reddit")]
    pub source_link: String,
    #[serde(rename = "file")]
    pub file_path: PathBuf,
}

impl StoryRecord {
    pub fn new(
        title: impl Into<String>,
        source_link: impl Into<String>,
        file_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            title: title.into(),
            source_link: source_link.into(),
            file_path: file_path.into(),
        }
    }
}

/// How a command refers to a story: by position or by exact title
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Index(usize),
    Title(String),
}

impl Identifier {
    /// Parse user input. All-digit input is always an index, even if it does
    /// not fit a `usize`, in which case it can never match.
    pub fn parse(input: &str) -> Self {
        if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
            Identifier::Index(input.parse().unwrap_or(usize::MAX))
        } else {
            Identifier::Title(input.to_string())
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Index(index) => write!(f, "{}", index),
            Identifier::Title(title) => write!(f, "{}", title),
        }
    }
}

/// Derive a display title from a story link.
///
/// Takes the last path segment, drops any extension, turns underscores into
/// spaces and capitalizes every word: `.../some_story_title/` becomes
/// `Some Story Title`.
pub fn default_title(link: &str) -> String {
    let without_query = link.split(['?', '#']).next().unwrap_or(link);
    let segment = without_query
        .rsplit('/')
        .find(|s| !s.is_empty())
        .unwrap_or(without_query);

    let stem = Path::new(segment)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| segment.to_string());

    capitalize_words(&stem.replace('_', " "))
}

fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn forbidden_chars() -> &'static Regex {
    static FORBIDDEN: OnceLock<Regex> = OnceLock::new();
    FORBIDDEN.get_or_init(|| Regex::new(r#"[;:|/\\!?,%*<>"']"#).expect("static pattern"))
}

/// Turn a title into a file-name stem: spaces become underscores, everything
/// is lower-cased and punctuation that breaks file names is removed.
pub fn sanitize(title: &str) -> String {
    let lowered = title.replace(' ', "_").to_lowercase();
    forbidden_chars().replace_all(&lowered, "").into_owned()
}

/// Default ebook location for a title inside `folder`
pub fn default_output(folder: &Path, title: &str) -> PathBuf {
    folder.join(format!("{}.{}", sanitize(title), EBOOK_EXTENSION))
}
