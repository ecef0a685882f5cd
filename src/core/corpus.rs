//! Purpose: Load the shared document corpus from a manifest-driven data directory.
//! Exports: `Corpus`, `CorpusEntry`, `MANIFEST_NAME`.
//! Role: Read-only input shared by verification and benchmarking for the whole run.
//! Invariants: Entry order is manifest order; nothing re-sorts it.
//! Invariants: A missing listed file is skipped with a warning; a missing manifest fails the path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::error::{Error, ErrorKind};

pub const MANIFEST_NAME: &str = "data.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    name: String,
    content: Box<[u8]>,
}

impl CorpusEntry {
    pub fn new(name: impl Into<String>, content: impl Into<Box<[u8]>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    entries: Vec<CorpusEntry>,
    source_dir: Option<PathBuf>,
    skipped: Vec<String>,
}

impl Corpus {
    pub fn new(entries: Vec<CorpusEntry>) -> Self {
        Self {
            entries,
            source_dir: None,
            skipped: Vec::new(),
        }
    }

    /// Tries each directory in order and loads the first one with a readable manifest.
    ///
    /// An unreadable manifest falls through like a missing one; it is returned only when
    /// no later path works.
    pub fn load(search_paths: &[PathBuf]) -> Result<Self, Error> {
        let mut unreadable = None;
        for dir in search_paths {
            match Self::load_dir(dir) {
                Ok(corpus) => return Ok(corpus),
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    info!(dir = %dir.display(), "no corpus manifest; trying next path");
                }
                Err(err) => {
                    warn!(dir = %dir.display(), error = %err, "unreadable corpus manifest; trying next path");
                    unreadable = Some(err);
                }
            }
        }
        if let Some(err) = unreadable {
            return Err(err.with_hint("Check permissions on data.txt or pass another --data-dir."));
        }
        let tried = search_paths
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Err(Error::new(ErrorKind::NotFound)
            .with_message(format!("no {MANIFEST_NAME} found in: {tried}"))
            .with_hint("Pass --data-dir pointing at a directory with a data.txt manifest."))
    }

    /// Loads one data directory; `NotFound` when the manifest itself is absent.
    pub fn load_dir(dir: &Path) -> Result<Self, Error> {
        let manifest_path = dir.join(MANIFEST_NAME);
        let manifest = fs::read_to_string(&manifest_path).map_err(|err| {
            let kind = if err.kind() == io::ErrorKind::NotFound {
                ErrorKind::NotFound
            } else {
                ErrorKind::Io
            };
            Error::new(kind)
                .with_message("cannot read corpus manifest")
                .with_path(&manifest_path)
                .with_source(err)
        })?;

        let mut entries = Vec::new();
        let mut skipped = Vec::new();
        for name in manifest.split_whitespace() {
            let path = dir.join(name);
            match fs::read(&path) {
                Ok(content) => {
                    info!(entry = name, bytes = content.len(), "read corpus entry");
                    entries.push(CorpusEntry::new(name, content));
                }
                Err(err) => {
                    warn!(entry = name, path = %path.display(), error = %err, "cannot read corpus entry; skipping");
                    skipped.push(name.to_string());
                }
            }
        }

        Ok(Self {
            entries,
            source_dir: Some(dir.to_path_buf()),
            skipped,
        })
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CorpusEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn source_dir(&self) -> Option<&Path> {
        self.source_dir.as_deref()
    }

    /// Manifest names that could not be read.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn total_bytes(&self) -> usize {
        self.entries.iter().map(CorpusEntry::len).sum()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a CorpusEntry;
    type IntoIter = std::slice::Iter<'a, CorpusEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
