//! Merging the planned files into one document
//!
//! The engine hands its finished [`AssemblyPlan`](crate::resolve::AssemblyPlan)
//! to a [`MergeSink`] exactly once per run. [`PdfMerger`] is the sink used by
//! the command line tool; tests substitute their own.

use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in damaged files
const MAX_TREE_DEPTH: usize = 64;

/// Errors produced while merging
#[derive(Debug, Error)]
pub enum MergeError {
    /// A source document could not be loaded
    #[error("Cannot load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },
    /// A source document has an unusable page tree
    #[error("Malformed document {}: {reason}", path.display())]
    Structure { path: PathBuf, reason: String },
    /// The merged document could not be written
    #[error("Cannot write {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },
}

/// Destination for an assembled songbook
pub trait MergeSink {
    /// Merge `sources`, in order, into a single file at `destination`
    ///
    /// An existing destination is replaced. An empty `sources` list yields an
    /// empty document.
    ///
    /// # Errors
    ///
    /// Returns `MergeError` on any read, format or write failure. No file is
    /// left at `destination` when merging fails.
    fn merge(&self, sources: &[PathBuf], destination: &Path) -> Result<(), MergeError>;
}

/// Merges PDF files page by page
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfMerger;

impl PdfMerger {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn type_name(object: &Object) -> Option<&[u8]> {
    object.as_dict().ok()?.get(b"Type").ok()?.as_name().ok()
}

/// Copy a page's dictionary with inherited attributes made explicit
fn flatten_page(doc: &Document, page_id: ObjectId, path: &Path) -> Result<Dictionary, MergeError> {
    let structure = |reason: String| MergeError::Structure {
        path: path.to_path_buf(),
        reason,
    };

    let mut page = doc
        .get_dictionary(page_id)
        .map_err(|e| structure(format!("page {page_id:?}: {e}")))?
        .clone();

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(node_id) = parent {
        depth += 1;
        if depth > MAX_TREE_DEPTH {
            return Err(structure(format!("page tree deeper than {MAX_TREE_DEPTH} levels")));
        }
        let Ok(node) = doc.get_dictionary(node_id) else {
            break;
        };
        for key in INHERITABLE {
            if !page.has(key)
                && let Ok(value) = node.get(key)
            {
                page.set(key.to_vec(), value.clone());
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    Ok(page)
}

impl PdfMerger {
    fn build(sources: &[PathBuf]) -> Result<Document, MergeError> {
        let mut merged = Document::with_version("1.5");
        let mut pages: Vec<(ObjectId, Dictionary)> = Vec::new();
        let mut next_id = 1;

        for path in sources {
            let mut doc = Document::load(path).map_err(|source| MergeError::Load {
                path: path.clone(),
                source,
            })?;
            // Fresh ids per source, so a file listed twice stays two copies
            doc.renumber_objects_with(next_id);
            next_id = doc.objects.keys().map(|&(id, _)| id).max().map_or(next_id, |max| max + 1);

            let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
            tracing::debug!(path = %path.display(), pages = page_ids.len(), "loaded source");
            for &page_id in &page_ids {
                pages.push((page_id, flatten_page(&doc, page_id, path)?));
            }

            let page_set: HashSet<ObjectId> = page_ids.into_iter().collect();
            for (id, object) in doc.objects {
                if page_set.contains(&id) {
                    continue;
                }
                let tree_node = matches!(
                    type_name(&object),
                    Some(b"Catalog" | b"Pages" | b"Outlines" | b"Outline")
                );
                if !tree_node {
                    merged.objects.insert(id, object);
                }
            }
        }

        merged.max_id = next_id.saturating_sub(1);
        let pages_id = merged.new_object_id();

        let mut kids = Vec::with_capacity(pages.len());
        for (id, mut page) in pages {
            page.set("Parent", Object::Reference(pages_id));
            merged.objects.insert(id, Object::Dictionary(page));
            kids.push(Object::Reference(id));
        }

        let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);
        let mut tree = Dictionary::new();
        tree.set("Type", Object::Name(b"Pages".to_vec()));
        tree.set("Count", Object::Integer(count));
        tree.set("Kids", Object::Array(kids));
        merged.objects.insert(pages_id, Object::Dictionary(tree));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = merged.add_object(catalog);
        merged.trailer.set("Root", Object::Reference(catalog_id));

        merged.renumber_objects();
        merged.compress();
        Ok(merged)
    }
}

impl MergeSink for PdfMerger {
    fn merge(&self, sources: &[PathBuf], destination: &Path) -> Result<(), MergeError> {
        tracing::info!(files = sources.len(), destination = %destination.display(), "merging");
        let mut document = Self::build(sources)?;

        let mut partial = destination.as_os_str().to_owned();
        partial.push(".part");
        let partial = PathBuf::from(partial);

        let write_err = |reason: String| MergeError::Write {
            path: destination.to_path_buf(),
            reason,
        };

        if let Err(e) = document.save(&partial) {
            let _ = fs::remove_file(&partial);
            return Err(write_err(e.to_string()));
        }
        if let Err(e) = fs::rename(&partial, destination) {
            let _ = fs::remove_file(&partial);
            return Err(write_err(e.to_string()));
        }

        tracing::info!(destination = %destination.display(), "songbook written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::write_test_pdf;

    fn page_count(path: &Path) -> usize {
        Document::load(path).unwrap().get_pages().len()
    }

    #[test]
    fn test_merge_keeps_page_order() {
        let dir = tempfile::tempdir().unwrap();
        let one = dir.path().join("One.pdf");
        let two = dir.path().join("Two.pdf");
        write_test_pdf(&one, 1).unwrap();
        write_test_pdf(&two, 2).unwrap();

        let out = dir.path().join("Band-Gig.pdf");
        PdfMerger::new().merge(&[two.clone(), one.clone()], &out).unwrap();

        assert_eq!(page_count(&out), 3);
        assert!(!dir.path().join("Band-Gig.pdf.part").exists());
    }

    #[test]
    fn test_repeated_source_is_copied_twice() {
        let dir = tempfile::tempdir().unwrap();
        let encore = dir.path().join("Encore.pdf");
        write_test_pdf(&encore, 1).unwrap();

        let out = dir.path().join("out.pdf");
        PdfMerger::new().merge(&[encore.clone(), encore], &out).unwrap();
        assert_eq!(page_count(&out), 2);
    }

    #[test]
    fn test_inherited_media_box_survives() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("Song.pdf");
        write_test_pdf(&src, 1).unwrap();

        let out = dir.path().join("out.pdf");
        PdfMerger::new().merge(&[src], &out).unwrap();

        let doc = Document::load(&out).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        assert!(doc.get_dictionary(page_id).unwrap().has(b"MediaBox"));
    }

    #[test]
    fn test_empty_plan_writes_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("empty.pdf");
        PdfMerger::new().merge(&[], &out).unwrap();
        assert_eq!(page_count(&out), 0);
    }

    #[test]
    fn test_unreadable_source_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("Bogus.pdf");
        fs::write(&bogus, b"not a pdf").unwrap();

        let out = dir.path().join("out.pdf");
        let err = PdfMerger::new().merge(&[bogus], &out).unwrap_err();
        assert!(matches!(err, MergeError::Load { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn test_existing_destination_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("Song.pdf");
        write_test_pdf(&src, 2).unwrap();
        let out = dir.path().join("out.pdf");
        fs::write(&out, b"stale").unwrap();

        PdfMerger::new().merge(&[src], &out).unwrap();
        assert_eq!(page_count(&out), 2);
    }
}
