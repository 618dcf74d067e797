//! Testing utilities for songbook
//!
//! This module provides a `TestLibrary` fixture laying out a base folder the
//! way the command line tool expects it, a tiny PDF writer, and merge sinks
//! that record or reject plans.
//!
//! Only available when compiled with `cfg(test)`.

use crate::merge::{MergeError, MergeSink};
use lopdf::{Dictionary, Document, Object};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary base folder with a `Band` project, an `Original` generic folder
/// and a `playlists` folder
///
/// Everything is removed when the fixture is dropped.
pub struct TestLibrary {
    dir: TempDir,
}

impl TestLibrary {
    /// # Panics
    /// Panics if the temporary folders cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        for sub in ["Band", "Original", "playlists"] {
            fs::create_dir_all(dir.path().join(sub)).expect("Failed to create test folder");
        }
        Self { dir }
    }

    #[must_use]
    pub fn base(&self) -> &Path {
        self.dir.path()
    }

    #[must_use]
    pub fn project_dir(&self) -> PathBuf {
        self.base().join("Band")
    }

    #[must_use]
    pub fn generic_dir(&self) -> PathBuf {
        self.base().join("Original")
    }

    /// Create placeholder files in the project folder
    pub fn project_files(&self, names: &[&str]) {
        touch_all(&self.project_dir(), names);
    }

    /// Create placeholder files in the generic folder
    pub fn generic_files(&self, names: &[&str]) {
        touch_all(&self.generic_dir(), names);
    }

    /// Write a playlist and return its path
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn playlist(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.base().join("playlists").join(name);
        fs::write(&path, contents).expect("Failed to write playlist");
        path
    }
}

impl Default for TestLibrary {
    fn default() -> Self {
        Self::new()
    }
}

fn touch_all(dir: &Path, names: &[&str]) {
    for name in names {
        fs::write(dir.join(name), b"test content").expect("Failed to create test file");
    }
}

/// Write a minimal PDF with `pages` blank pages
///
/// The media box lives on the page tree node only, so pages inherit it.
///
/// # Errors
/// Returns an `io::Error` if the document cannot be saved.
pub fn write_test_pdf(path: &Path, pages: usize) -> std::io::Result<()> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::with_capacity(pages);
    for _ in 0..pages {
        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let mut tree = Dictionary::new();
    tree.set("Type", Object::Name(b"Pages".to_vec()));
    tree.set("Count", Object::Integer(i64::try_from(pages).unwrap_or(0)));
    tree.set("Kids", Object::Array(kids));
    tree.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(595),
            Object::Integer(842),
        ]),
    );
    doc.objects.insert(pages_id, Object::Dictionary(tree));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc.save(path).map(drop).map_err(|e| std::io::Error::other(e.to_string()))
}

/// Sink that records every plan it receives
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: RefCell<Vec<(Vec<PathBuf>, PathBuf)>>,
}

impl RecordingSink {
    #[must_use]
    pub fn calls(&self) -> Vec<(Vec<PathBuf>, PathBuf)> {
        self.calls.borrow().clone()
    }
}

impl MergeSink for RecordingSink {
    fn merge(&self, sources: &[PathBuf], destination: &Path) -> Result<(), MergeError> {
        self.calls.borrow_mut().push((sources.to_vec(), destination.to_path_buf()));
        Ok(())
    }
}

/// Sink that rejects every plan
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingSink;

impl MergeSink for FailingSink {
    fn merge(&self, _sources: &[PathBuf], destination: &Path) -> Result<(), MergeError> {
        Err(MergeError::Write {
            path: destination.to_path_buf(),
            reason: "disk full".to_string(),
        })
    }
}
