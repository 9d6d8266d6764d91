//! In-memory PDFs for tests.
//!
//! Pages hang off intermediate page-tree nodes two at a time. Resources live on
//! those nodes and the MediaBox on the root, so every page depends on inherited
//! attributes.

use super::SourceDocument;
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::path::{Path, PathBuf};

pub fn sample_document(page_count: u32) -> Document {
    let mut doc = Document::with_version("1.5");
    let root_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut groups: Vec<Object> = Vec::new();
    let pages: Vec<u32> = (1..=page_count).collect();
    for chunk in pages.chunks(2) {
        let group_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::new();
        for &n in chunk {
            let content = format!("BT /F1 24 Tf 72 700 Td (Page {}) Tj ET", n);
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => group_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }
        let group = dictionary! {
            "Type" => "Pages",
            "Parent" => root_id,
            "Count" => kids.len() as i64,
            "Kids" => kids,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        };
        doc.objects.insert(group_id, Object::Dictionary(group));
        groups.push(group_id.into());
    }

    let root = dictionary! {
        "Type" => "Pages",
        "Kids" => groups,
        "Count" => page_count as i64,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ],
    };
    doc.objects.insert(root_id, Object::Dictionary(root));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => root_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

pub fn sample_bytes(page_count: u32) -> Vec<u8> {
    let mut doc = sample_document(page_count);
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

pub fn sample_source(page_count: u32) -> SourceDocument {
    SourceDocument::from_bytes("sample.pdf", sample_bytes(page_count)).unwrap()
}

pub fn write_sample(dir: &Path, name: &str, page_count: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, sample_bytes(page_count)).unwrap();
    path
}

/// Decoded content stream of a page, as text
pub fn page_text(doc: &Document, page_id: ObjectId) -> String {
    String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
}
