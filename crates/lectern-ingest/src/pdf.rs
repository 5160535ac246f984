//! Page-aware PDF text extraction.

use std::path::Path;

use lectern_core::{Error, Result};
use lopdf::Document;
use tracing::debug;

/// Text of a single page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageText {
    /// Zero-based page index.
    pub page: u32,
    pub text: String,
}

/// Extract the text of every page of the PDF at `path`, in page order.
pub fn extract_pages(path: &Path) -> Result<Vec<PageText>> {
    let doc = Document::load(path)
        .map_err(|e| Error::Extraction(format!("{}: {}", path.display(), e)))?;
    pages_of(&doc)
}

fn pages_of(doc: &Document) -> Result<Vec<PageText>> {
    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    if page_numbers.is_empty() {
        return Err(Error::Extraction("document has no pages".into()));
    }

    let mut pages = Vec::with_capacity(page_numbers.len());
    for (index, number) in page_numbers.into_iter().enumerate() {
        let text = doc
            .extract_text(&[number])
            .map_err(|e| Error::Extraction(format!("page {}: {}", number, e)))?;
        pages.push(PageText {
            page: index as u32,
            text,
        });
    }

    debug!("Extracted {} pages", pages.len());
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn pdf_with_pages(texts: &[&str]) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in texts {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn spool(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[test]
    fn test_pages_are_zero_indexed_in_order() {
        let file = spool(&pdf_with_pages(&["Cells divide by mitosis.", "Meiosis makes gametes."]));
        let pages = extract_pages(file.path()).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page, 0);
        assert!(pages[0].text.contains("Cells divide by mitosis."));
        assert_eq!(pages[1].page, 1);
        assert!(pages[1].text.contains("Meiosis makes gametes."));
    }

    #[test]
    fn test_not_a_pdf() {
        let file = spool(b"just some plain text, definitely not a PDF");
        let result = extract_pages(file.path());
        assert!(matches!(result, Err(Error::Extraction(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = extract_pages(Path::new("/nonexistent/lectern/missing.pdf"));
        assert!(matches!(result, Err(Error::Extraction(_))));
    }

    #[test]
    fn test_garbage_bytes() {
        let file = spool(b"%PDF-1.5 truncated");
        assert!(matches!(extract_pages(file.path()), Err(Error::Extraction(_))));
    }
}
