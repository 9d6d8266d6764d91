use crate::error::ExtractError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Page attributes a page may inherit from its ancestors in the page tree.
pub const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

// Guards against malformed trees whose Parent links loop.
const MAX_TREE_DEPTH: usize = 64;

/// An opened source PDF, read-only for the duration of a run.
///
/// Keeps the raw bytes next to the parsed document so that rasterizers
/// which bring their own parser can load the same data.
pub struct SourceDocument {
    pub doc: Document,
    bytes: Vec<u8>,
    path: PathBuf,
    pages: BTreeMap<u32, ObjectId>,
}

impl SourceDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| ExtractError::DocumentOpen {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_bytes(path, bytes)
    }

    /// Parse a document that is already in memory; `path` only names it
    pub fn from_bytes<P: Into<PathBuf>>(path: P, bytes: Vec<u8>) -> Result<Self, ExtractError> {
        let path = path.into();
        let doc = Document::load_mem(&bytes).map_err(|e| ExtractError::DocumentOpen {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let pages = doc.get_pages();
        Ok(SourceDocument {
            doc,
            bytes,
            path,
            pages,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Object ID of a 1-indexed page
    pub fn page_id(&self, page: u32) -> Option<ObjectId> {
        self.pages.get(&page).copied()
    }

    /// Object IDs of every page, in page order
    pub fn page_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.pages.values().copied()
    }

    /// Object IDs of the page-tree nodes above the pages, root included
    pub fn tree_node_ids(&self) -> BTreeSet<ObjectId> {
        let mut nodes = BTreeSet::new();
        for page_id in self.page_ids() {
            let mut current = page_id;
            for _ in 0..MAX_TREE_DEPTH {
                let parent = self
                    .doc
                    .get_dictionary(current)
                    .ok()
                    .and_then(|dict| dict.get(b"Parent").ok())
                    .and_then(|parent| parent.as_reference().ok());
                match parent {
                    Some(parent) if nodes.insert(parent) => current = parent,
                    _ => break,
                }
            }
        }
        nodes
    }

    /// Look up `key` on the page, falling back to its page-tree ancestors
    pub fn inherited(&self, page_id: ObjectId, key: &[u8]) -> Option<&Object> {
        let mut dict = self.doc.get_dictionary(page_id).ok()?;
        for _ in 0..MAX_TREE_DEPTH {
            if let Ok(value) = dict.get(key) {
                return Some(value);
            }
            dict = parent_of(&self.doc, dict)?;
        }
        None
    }
}

fn parent_of<'a>(doc: &'a Document, dict: &Dictionary) -> Option<&'a Dictionary> {
    let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
    doc.get_dictionary(parent).ok()
}
