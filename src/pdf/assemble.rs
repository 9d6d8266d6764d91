use super::document::{SourceDocument, INHERITABLE_KEYS};
use crate::error::ExtractError;
use crate::page_range::PageSet;
use crate::render::PageRenderer;
use lopdf::{dictionary, Document, Object, ObjectId};
use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;

// Catalog entries that point into the source page tree and would keep dropped
// pages alive or dangling.
const SOURCE_TREE_KEYS: [&[u8]; 3] = [b"Outlines", b"PageLabels", b"StructTreeRoot"];

/// Builds a new PDF from whole pages of a source document.
///
/// Pages are copied structurally: the page dictionary keeps its content
/// streams, fonts and images by reference, and anything it inherited from the
/// source page tree is written onto the page itself before it is attached to a
/// fresh, flat page tree. Nothing touches the disk until [`finish`](Self::finish).
pub struct PdfAssembler<'a> {
    source: &'a SourceDocument,
    output: Document,
    dest: PathBuf,
    kids: Vec<ObjectId>,
}

impl<'a> PdfAssembler<'a> {
    pub fn new<P: Into<PathBuf>>(source: &'a SourceDocument, dest: P) -> Self {
        PdfAssembler {
            source,
            output: source.doc.clone(),
            dest: dest.into(),
            kids: Vec::new(),
        }
    }

    /// Append one 1-indexed source page to the output
    pub fn copy_page(&mut self, page: u32) -> Result<(), ExtractError> {
        let source = self.source;
        let page_id = source
            .page_id(page)
            .ok_or_else(|| ExtractError::page(page, "no such page in document"))?;
        let mut dict = source
            .doc
            .get_dictionary(page_id)
            .map_err(|e| ExtractError::page(page, e))?
            .clone();

        for key in INHERITABLE_KEYS {
            if dict.has(key) {
                continue;
            }
            if let Some(value) = source.inherited(page_id, key) {
                dict.set(key, value.clone());
            }
        }
        dict.remove(b"Parent");

        self.output.objects.insert(page_id, Object::Dictionary(dict));
        self.kids.push(page_id);
        Ok(())
    }

    /// Attach the copied pages to a new page tree and write the document
    pub fn finish(mut self) -> Result<PathBuf, ExtractError> {
        let root_id = self.output.new_object_id();
        for &kid in &self.kids {
            if let Ok(page) = self.output.get_dictionary_mut(kid) {
                page.set("Parent", root_id);
            }
        }
        let kids: Vec<Object> = self.kids.iter().map(|&id| id.into()).collect();
        self.output.objects.insert(
            root_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => kids.len() as i64,
                "Kids" => kids,
            }),
        );

        let catalog = self
            .output
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .and_then(|id| self.output.get_dictionary_mut(id))
            .map_err(|e| {
                let reason = io::Error::new(io::ErrorKind::InvalidData, e.to_string());
                ExtractError::write(&self.dest, reason)
            })?;
        catalog.set("Pages", root_id);
        for key in SOURCE_TREE_KEYS {
            catalog.remove(key);
        }
        self.unlink_source_tree();
        self.output.prune_objects();

        let mut bytes = Vec::new();
        self.output
            .save_to(&mut bytes)
            .map_err(|e| ExtractError::write(&self.dest, io::Error::other(e.to_string())))?;

        if let Some(parent) = self.dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ExtractError::write(parent, e))?;
        }
        std::fs::write(&self.dest, bytes).map_err(|e| ExtractError::write(&self.dest, e))?;

        log::info!("Wrote {} page(s) to {}", self.kids.len(), self.dest.display());
        Ok(self.dest)
    }

    /// Remove unselected pages and the old page tree, turning every reference
    /// to them into null. Destinations, actions, form fields and annotations
    /// elsewhere in the document would otherwise keep them reachable.
    fn unlink_source_tree(&mut self) {
        let kept: BTreeSet<ObjectId> = self.kids.iter().copied().collect();
        let mut stale = self.source.tree_node_ids();
        stale.extend(self.source.page_ids().filter(|id| !kept.contains(id)));

        for id in &stale {
            self.output.objects.remove(id);
        }
        for object in self.output.objects.values_mut() {
            null_references(object, &stale);
        }
        for (_, object) in self.output.trailer.iter_mut() {
            null_references(object, &stale);
        }
        log::debug!("Unlinked {} source page-tree object(s)", stale.len());
    }
}

fn null_references(object: &mut Object, stale: &BTreeSet<ObjectId>) {
    match object {
        Object::Reference(id) => {
            let id = *id;
            if stale.contains(&id) {
                *object = Object::Null;
            }
        }
        Object::Array(items) => {
            for item in items {
                null_references(item, stale);
            }
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter_mut() {
                null_references(value, stale);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter_mut() {
                null_references(value, stale);
            }
        }
        _ => {}
    }
}

impl PageRenderer for PdfAssembler<'_> {
    fn render_page(&mut self, page: u32) -> Result<(), ExtractError> {
        self.copy_page(page)
    }

    fn finish(self: Box<Self>) -> Result<Vec<PathBuf>, ExtractError> {
        PdfAssembler::finish(*self).map(|path| vec![path])
    }
}

/// Copy `pages` of `source` into a new PDF at `dest`
pub fn assemble<P: Into<PathBuf>>(
    source: &SourceDocument,
    pages: &PageSet,
    dest: P,
) -> Result<PathBuf, ExtractError> {
    let mut assembler = PdfAssembler::new(source, dest);
    for page in pages.iter() {
        assembler.copy_page(page)?;
    }
    assembler.finish()
}
