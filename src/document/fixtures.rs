//! In-memory PDF fixtures for tests

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Text drawn on page `n`
pub fn page_marker(n: u32) -> String {
    format!("PAGE-{:03}", n)
}

/// MediaBox width of page `n`, so pages differ in geometry too
pub fn page_width(n: u32) -> i64 {
    500 + n as i64
}

/// Build an `n`-page PDF whose pages carry distinct markers.
///
/// Resources live on the root Pages node so extraction has to
/// pull inherited attributes down onto the copied page.
pub fn build_pdf(n: u32) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::new();
    for page in 1..=n {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), Object::Integer(24)]),
                Operation::new("Td", vec![Object::Integer(72), Object::Integer(720)]),
                Operation::new("Tj", vec![Object::string_literal(page_marker(page))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(page_width(page)),
                Object::Integer(792),
            ],
        });
        kids.push(Object::Reference(page_id));
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(n as i64),
        "Resources" => resources_id,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// MediaBox width of the first page in `doc`
pub fn only_page_width(doc: &Document) -> i64 {
    let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
    let page = doc.get_object(page_id).and_then(Object::as_dict).unwrap();
    let media_box = page.get(b"MediaBox").and_then(Object::as_array).unwrap();
    media_box[2].as_i64().unwrap()
}

/// Add a link annotation on page `from` that jumps to page `to`
pub fn with_page_link(pdf: &[u8], from: u32, to: u32) -> Vec<u8> {
    let mut doc = Document::load_mem(pdf).unwrap();
    let pages = doc.get_pages();
    let from_id = pages[&from];
    let to_id = pages[&to];

    let link_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => vec![
            Object::Integer(72),
            Object::Integer(700),
            Object::Integer(200),
            Object::Integer(720),
        ],
        "P" => from_id,
        "Dest" => vec![Object::Reference(to_id), "Fit".into()],
    });
    doc.get_object_mut(from_id)
        .and_then(Object::as_dict_mut)
        .unwrap()
        .set("Annots", vec![Object::Reference(link_id)]);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}
