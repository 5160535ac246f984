//! End-to-end ingestion into an in-memory store with the hashing embedder.

use std::io::Write;

use lectern_core::Error;
use lectern_infer::{EmbedderBackend, HashingEmbedder};
use lectern_ingest::{Ingester, PageText, RecursiveSplitter};
use lectern_store::SegmentStore;

fn page(page: u32, text: &str) -> PageText {
    PageText {
        page,
        text: text.to_string(),
    }
}

fn long_page(topic: &str, sentences: usize) -> String {
    (0..sentences)
        .map(|i| format!("Fact {} about {} for the exam.", i, topic))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_every_segment_is_tagged_with_display_name() {
    let store = SegmentStore::new(384);
    let embedder = HashingEmbedder::new(384);
    let ingester = Ingester::new(&store, &embedder);

    let pages = vec![
        page(0, &long_page("mitochondria", 60)),
        page(1, "Short page on ribosomes."),
        page(2, "   "),
    ];
    let summary = ingester.ingest_pages(&pages, "Biology 101.pdf").unwrap();

    assert_eq!(summary.pages, 3);
    assert!(summary.segment_ids.len() >= 2);
    assert_eq!(store.len(), summary.segment_ids.len());

    let mut seen_pages = Vec::new();
    for id in &summary.segment_ids {
        let segment = store.get(id).unwrap();
        assert_eq!(segment.filename, "Biology 101.pdf");
        seen_pages.push(segment.page);
    }
    assert!(seen_pages.contains(&0));
    assert!(seen_pages.contains(&1));
    assert!(!seen_pages.contains(&2));
}

#[test]
fn test_ingested_segments_are_retrievable() {
    let store = SegmentStore::new(384);
    let embedder = HashingEmbedder::new(384);
    let ingester = Ingester::new(&store, &embedder).with_splitter(RecursiveSplitter::new(200, 40));

    ingester
        .ingest_pages(
            &[
                page(0, "The French Revolution began in 1789 with the storming of the Bastille."),
                page(1, "Photosynthesis turns sunlight, water and carbon dioxide into glucose."),
            ],
            "mixed.pdf",
        )
        .unwrap();

    let query = embedder.embed("what does photosynthesis turn sunlight into").unwrap();
    let hits = store.search(&query.embedding, 1).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].segment.page_no(), 2);
}

#[test]
fn test_blank_document_is_rejected() {
    let store = SegmentStore::new(384);
    let embedder = HashingEmbedder::new(384);
    let ingester = Ingester::new(&store, &embedder);

    let result = ingester.ingest_pages(&[page(0, ""), page(1, "\n\n")], "blank.pdf");
    assert!(matches!(result, Err(Error::Ingest(_))));
    assert!(store.is_empty());
}

#[test]
fn test_earlier_documents_survive_a_failed_ingest() {
    let store = SegmentStore::new(384);
    let embedder = HashingEmbedder::new(384);
    let ingester = Ingester::new(&store, &embedder);

    ingester.ingest_pages(&[page(0, "Kept content.")], "kept.pdf").unwrap();

    let mut bogus = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    bogus.write_all(b"not a pdf").unwrap();
    let result = ingester.ingest_file(bogus.path(), "bogus.pdf");

    assert!(matches!(result, Err(Error::Extraction(_))));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_embedder_dimension_mismatch_surfaces_as_store_error() {
    let store = SegmentStore::new(384);
    let embedder = HashingEmbedder::new(16);
    let ingester = Ingester::new(&store, &embedder);

    let result = ingester.ingest_pages(&[page(0, "Some text.")], "dims.pdf");
    assert!(matches!(result, Err(Error::Store(_))));
}
