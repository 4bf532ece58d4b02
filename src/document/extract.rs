//! Single-page extraction
//!
//! Copies the reference document, hangs the requested page under a fresh
//! one-page tree and catalog, and prunes every object no longer reachable.
//! Inheritable page attributes are copied down from the old tree first,
//! since the old ancestors are pruned with everything else.
//!
//! Anything on the page that can point at another page (link annotations,
//! article beads, structure tree entries) is dropped, and the other pages
//! and the old tree nodes are removed outright. A stray reference then
//! dangles instead of pulling another consumer's page back in.

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};

use super::error::{DocumentError, DocumentResult};
use super::reference::ReferenceDocument;

/// Page attributes a page may inherit from its ancestors
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Page entries that may reference other pages or the old catalog
const DETACHED: [&[u8]; 3] = [b"Annots", b"B", b"StructParents"];

/// Guard against cyclic Parent chains in malformed files
const MAX_TREE_DEPTH: usize = 64;

/// Turns one page of the reference document into a standalone PDF
pub trait PageExtractor: Send + Sync {
    fn extract(&self, document: &ReferenceDocument, index: u32) -> DocumentResult<Vec<u8>>;
}

/// [`PageExtractor`] backed by [`extract_single_page`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SinglePageExtractor;

impl PageExtractor for SinglePageExtractor {
    fn extract(&self, document: &ReferenceDocument, index: u32) -> DocumentResult<Vec<u8>> {
        extract_single_page(document, index)
    }
}

/// Build a standalone PDF containing only page `index` (1-based).
///
/// The source document is never mutated.
pub fn extract_single_page(document: &ReferenceDocument, index: u32) -> DocumentResult<Vec<u8>> {
    let page_id = document
        .get_page(index)
        .ok_or(DocumentError::PageOutOfRange {
            index: index as i64,
            page_count: document.page_count(),
        })?;

    let mut out = document.inner().clone();
    let inherited = inherited_attributes(&out, page_id)?;
    let ancestors = ancestor_ids(&out, page_id);
    let old_root = out.trailer.get(b"Root").and_then(Object::as_reference).ok();

    let pages_id = out.new_object_id();
    {
        let page = out
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(extraction_error)?;

        for (key, value) in inherited {
            page.set(key, value);
        }
        for key in DETACHED {
            page.remove(key);
        }
        page.set("Parent", pages_id);
    }

    // Other pages, the old tree and the old catalog must not survive pruning
    // even if something on the kept page still references them
    for other in document.page_ids().filter(|id| *id != page_id) {
        out.objects.remove(&other);
    }
    for node in ancestors {
        out.objects.remove(&node);
    }
    if let Some(old_root) = old_root {
        out.objects.remove(&old_root);
    }

    out.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
        }),
    );
    let catalog_id = out.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });

    let info = out.trailer.get(b"Info").ok().cloned();
    out.trailer = Dictionary::new();
    out.trailer.set("Root", catalog_id);
    if let Some(info) = info {
        out.trailer.set("Info", info);
    }

    out.prune_objects();

    let mut buffer = Vec::new();
    out.save_to(&mut buffer).map_err(extraction_error)?;
    Ok(buffer)
}

/// Page tree nodes above `page_id`, nearest first
fn ancestor_ids(doc: &Document, page_id: ObjectId) -> Vec<ObjectId> {
    let mut ancestors = Vec::new();
    let mut current = page_id;

    while ancestors.len() < MAX_TREE_DEPTH {
        let parent = doc
            .get_object(current)
            .and_then(Object::as_dict)
            .and_then(|node| node.get(b"Parent"))
            .and_then(Object::as_reference);
        match parent {
            Ok(parent) if !ancestors.contains(&parent) => {
                ancestors.push(parent);
                current = parent;
            }
            _ => break,
        }
    }

    ancestors
}

/// Collect inheritable attributes the page lacks, nearest ancestor first
fn inherited_attributes(
    doc: &Document,
    page_id: ObjectId,
) -> DocumentResult<Vec<(Vec<u8>, Object)>> {
    let page = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(extraction_error)?;

    let mut missing: Vec<&[u8]> = INHERITABLE
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    let mut found = Vec::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(node_id) = parent {
        if missing.is_empty() || depth >= MAX_TREE_DEPTH {
            break;
        }

        let Ok(node) = doc.get_object(node_id).and_then(Object::as_dict) else {
            break;
        };

        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                found.push((key.to_vec(), value.clone()));
                false
            }
            Err(_) => true,
        });

        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    Ok(found)
}

fn extraction_error<E: std::fmt::Display>(err: E) -> DocumentError {
    DocumentError::Extraction(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fixtures::{
        build_pdf, only_page_width, page_marker, page_width, with_page_link,
    };

    #[test]
    fn test_extracted_buffer_has_exactly_one_page() {
        let source = ReferenceDocument::from_bytes(&build_pdf(10)).unwrap();
        let buffer = extract_single_page(&source, 3).unwrap();

        let extracted = ReferenceDocument::from_bytes(&buffer).unwrap();
        assert_eq!(extracted.page_count(), 1);
    }

    #[test]
    fn test_extracted_page_matches_source_page() {
        let source = ReferenceDocument::from_bytes(&build_pdf(10)).unwrap();
        let buffer = extract_single_page(&source, 7).unwrap();
        let extracted = ReferenceDocument::from_bytes(&buffer).unwrap();

        assert_eq!(
            extracted.page_content(1).unwrap(),
            source.page_content(7).unwrap()
        );
        assert_eq!(only_page_width(extracted.inner()), page_width(7));
    }

    #[test]
    fn test_other_pages_are_pruned() {
        let source = ReferenceDocument::from_bytes(&build_pdf(5)).unwrap();
        let buffer = extract_single_page(&source, 2).unwrap();
        let text = String::from_utf8_lossy(&buffer);

        assert!(text.contains(&page_marker(2)));
        for other in [1, 3, 4, 5] {
            assert!(!text.contains(&page_marker(other)));
        }
    }

    #[test]
    fn test_link_to_another_page_does_not_pull_it_in() {
        let linked = with_page_link(&build_pdf(5), 3, 5);
        let source = ReferenceDocument::from_bytes(&linked).unwrap();
        let buffer = extract_single_page(&source, 3).unwrap();
        let text = String::from_utf8_lossy(&buffer);

        assert!(text.contains(&page_marker(3)));
        let leaked: Vec<u32> = [1, 2, 4, 5]
            .into_iter()
            .filter(|other| text.contains(&page_marker(*other)))
            .collect();
        assert!(leaked.is_empty(), "other pages leaked: {:?}", leaked);

        let extracted = ReferenceDocument::from_bytes(&buffer).unwrap();
        assert_eq!(extracted.page_count(), 1);
        assert_eq!(only_page_width(extracted.inner()), page_width(3));
    }

    #[test]
    fn test_old_page_tree_is_dropped() {
        let source = ReferenceDocument::from_bytes(&build_pdf(4)).unwrap();
        let buffer = extract_single_page(&source, 2).unwrap();
        let extracted = ReferenceDocument::from_bytes(&buffer).unwrap();

        let page_nodes = extracted
            .inner()
            .objects
            .values()
            .filter_map(|object| object.as_dict().ok())
            .filter(|dict| {
                matches!(
                    dict.get(b"Type").and_then(Object::as_name),
                    Ok(b"Page") | Ok(b"Pages")
                )
            })
            .count();
        assert_eq!(page_nodes, 2);
    }

    #[test]
    fn test_inherited_resources_are_copied_onto_page() {
        let source = ReferenceDocument::from_bytes(&build_pdf(3)).unwrap();
        let buffer = extract_single_page(&source, 1).unwrap();
        let extracted = ReferenceDocument::from_bytes(&buffer).unwrap();

        let page_id = extracted.get_page(1).unwrap();
        let page = extracted
            .inner()
            .get_object(page_id)
            .and_then(Object::as_dict)
            .unwrap();
        assert!(page.has(b"Resources"));
    }

    #[test]
    fn test_source_document_is_untouched() {
        let source = ReferenceDocument::from_bytes(&build_pdf(4)).unwrap();
        let before = source.inner().objects.len();

        extract_single_page(&source, 2).unwrap();

        assert_eq!(source.page_count(), 4);
        assert_eq!(source.inner().objects.len(), before);
    }

    #[test]
    fn test_first_and_last_pages() {
        let source = ReferenceDocument::from_bytes(&build_pdf(6)).unwrap();

        for index in [1, 6] {
            let buffer = extract_single_page(&source, index).unwrap();
            let extracted = ReferenceDocument::from_bytes(&buffer).unwrap();
            assert_eq!(only_page_width(extracted.inner()), page_width(index));
        }
    }

    #[test]
    fn test_out_of_range_page_is_rejected() {
        let source = ReferenceDocument::from_bytes(&build_pdf(2)).unwrap();

        assert!(matches!(
            extract_single_page(&source, 0),
            Err(DocumentError::PageOutOfRange { index: 0, page_count: 2 })
        ));
        assert!(matches!(
            extract_single_page(&source, 3),
            Err(DocumentError::PageOutOfRange { index: 3, page_count: 2 })
        ));
    }
}
