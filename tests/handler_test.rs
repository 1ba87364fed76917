//! Integration tests for the storage-triggered handler.

mod common;

use std::fs;
use std::sync::{Arc, Mutex};

use common::{docx, encrypted_pdf, pdf, text_row, xlsx, Cell};
use tempfile::TempDir;
use undoc::render::SECTION_DELIMITER;
use undoc::{
    ConversionHandler, DocumentFormat, Error, ErrorKind, ErrorReporter, HandlerConfig,
    HandlerVariant, LocalStore, MemoryStore, NoopReporter, ObjectLocation, ObjectStore,
    StorageEvent,
};

#[derive(Default, Clone)]
struct Collector(Arc<Mutex<Vec<String>>>);

impl ErrorReporter for Collector {
    fn report(&self, location: &ObjectLocation, error: &Error) {
        self.0
            .lock()
            .unwrap()
            .push(format!("{location}: {:?}", error.kind()));
    }
}

fn quarterly_report() -> Vec<u8> {
    xlsx(&[
        (
            "Summary",
            vec![
                text_row(&["Region", "Total"]),
                vec![Cell::Text("North"), Cell::Number(10.0)],
            ],
        ),
        ("Detail", vec![text_row(&["Region", "Month", "Amount"])]),
    ])
}

#[test]
fn test_quarterly_report_event() {
    let source = ObjectLocation::new("uploads", "reports/q1.xlsx");
    let store = MemoryStore::new().with_object(source.clone(), quarterly_report());
    let handler = ConversionHandler::new(HandlerVariant::ContentExtraction.config(), &store)
        .unwrap()
        .with_reporter(Box::new(NoopReporter));

    let event = StorageEvent::from_json_str(
        r#"{"Records": [{"s3": {"bucket": {"name": "uploads"}, "object": {"key": "reports/q1.xlsx"}}}]}"#,
    )
    .unwrap();
    let outcomes = handler.handle_event(&event).unwrap();

    assert_eq!(outcomes.len(), 1);
    let outcome = &outcomes[0];
    assert_eq!(outcome.source, source);
    assert_eq!(outcome.target.key, "reports/q1.xlsx.extracted");
    assert_eq!(outcome.format, DocumentFormat::Spreadsheet);

    let body = String::from_utf8(store.get(&outcome.target).unwrap()).unwrap();
    assert_eq!(outcome.bytes_written, body.len());
    assert_eq!(
        body,
        format!(
            "{d}\nMETA:{{\"sheetTitle\": \"Summary\"}}\nRegion,Total\r\nNorth,10\r\n\
             {d}\nMETA:{{\"sheetTitle\": \"Detail\"}}\nRegion,Month,Amount\r\n",
            d = SECTION_DELIMITER
        )
    );
}

#[test]
fn test_unsupported_upload_leaves_no_artifact() {
    let source = ObjectLocation::new("uploads", "notes.txt");
    let store = MemoryStore::new().with_object(source.clone(), "plain text");
    let collector = Collector::default();
    let handler = ConversionHandler::new(HandlerConfig::default(), &store)
        .unwrap()
        .with_reporter(Box::new(collector.clone()));

    let err = handler.convert_object(&source).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    assert_eq!(store.locations(), vec![source]);
    assert_eq!(
        collector.0.lock().unwrap().as_slice(),
        &["uploads/notes.txt: UnsupportedFormat".to_string()]
    );
}

#[test]
fn test_missing_source_is_not_found() {
    let store = MemoryStore::new();
    let handler = ConversionHandler::new(HandlerConfig::default(), &store)
        .unwrap()
        .with_reporter(Box::new(NoopReporter));

    let err = handler
        .convert_object(&ObjectLocation::new("uploads", "missing.docx"))
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { ref key, .. } if key == "missing.docx"));
    assert!(store.is_empty());
}

#[test]
fn test_event_stops_at_first_failure() {
    let store = MemoryStore::new()
        .with_object(ObjectLocation::new("b", "one.docx"), docx(&["one"]))
        .with_object(ObjectLocation::new("b", "three.docx"), docx(&["three"]));
    let handler = ConversionHandler::new(HandlerConfig::default(), &store)
        .unwrap()
        .with_reporter(Box::new(NoopReporter));

    let event = StorageEvent::for_locations([
        ObjectLocation::new("b", "one.docx"),
        ObjectLocation::new("b", "two.pdf"),
        ObjectLocation::new("b", "three.docx"),
    ]);
    let err = handler.handle_event(&event).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert!(store.contains(&ObjectLocation::new("b", "one.docx.extracted")));
    assert!(!store.contains(&ObjectLocation::new("b", "three.docx.extracted")));
}

#[test]
fn test_markdown_variant_suffix() {
    let source = ObjectLocation::new("docs", "manual.pdf");
    let store = MemoryStore::new().with_object(source.clone(), pdf(&["Chapter 1"]));
    let handler = ConversionHandler::new(HandlerVariant::Markdown.config(), &store).unwrap();

    let outcome = handler.convert_object(&source).unwrap();
    assert_eq!(outcome.target, ObjectLocation::new("docs", "manual.pdf.md"));
    let body = String::from_utf8(store.get(&outcome.target).unwrap()).unwrap();
    assert!(body.contains("Chapter 1"));
}

#[test]
fn test_rerun_overwrites_artifact() {
    let source = ObjectLocation::new("b", "memo.docx");
    let store = MemoryStore::new().with_object(source.clone(), docx(&["v1"]));
    let handler = ConversionHandler::new(HandlerConfig::default(), &store).unwrap();

    handler.convert_object(&source).unwrap();
    store.put(&source, &docx(&["v2"])).unwrap();
    handler.convert_object(&source).unwrap();

    let target = source.with_suffix(".extracted");
    assert_eq!(store.get(&target).unwrap(), b"v2\n\n");
    assert_eq!(store.len(), 2);
}

#[test]
fn test_local_store_handler() {
    let dir = TempDir::new().unwrap();
    let bucket = dir.path().join("uploads");
    fs::create_dir_all(bucket.join("minutes")).unwrap();
    fs::write(
        bucket.join("minutes/2024-01.docx"),
        docx(&["Attendees", "Decisions"]),
    )
    .unwrap();

    let handler = ConversionHandler::new(
        HandlerVariant::FullConversion.config(),
        LocalStore::new(dir.path()),
    )
    .unwrap();
    let event = StorageEvent::for_locations([ObjectLocation::new("uploads", "minutes/2024-01.docx")]);
    let outcomes = handler.handle_event(&event).unwrap();

    assert_eq!(outcomes[0].format, DocumentFormat::Word);
    let written = fs::read_to_string(bucket.join("minutes/2024-01.docx.extracted")).unwrap();
    assert_eq!(written, "Attendees\n\nDecisions\n\n");
}

#[test]
fn test_corrupt_upload_reported_and_not_written() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("uploads")).unwrap();
    fs::write(dir.path().join("uploads/bad.xlsx"), b"PK\x03\x04 truncated").unwrap();

    let collector = Collector::default();
    let handler = ConversionHandler::new(HandlerConfig::default(), LocalStore::new(dir.path()))
        .unwrap()
        .with_reporter(Box::new(collector.clone()));

    let err = handler
        .convert_object(&ObjectLocation::new("uploads", "bad.xlsx"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(!dir.path().join("uploads/bad.xlsx.extracted").exists());
    assert_eq!(collector.0.lock().unwrap().len(), 1);
}

#[test]
fn test_encrypted_pdf_reported_and_not_written() {
    let source = ObjectLocation::new("uploads", "statements/locked.pdf");
    let store = MemoryStore::new().with_object(source.clone(), encrypted_pdf(&["Balance"]));
    let collector = Collector::default();
    let handler = ConversionHandler::new(HandlerConfig::default(), &store)
        .unwrap()
        .with_reporter(Box::new(collector.clone()));

    let err = handler.convert_object(&source).unwrap_err();
    assert!(matches!(err, Error::Encrypted));
    assert_eq!(store.locations(), vec![source]);
    assert_eq!(
        collector.0.lock().unwrap().as_slice(),
        &["uploads/statements/locked.pdf: Parse".to_string()]
    );
}

#[test]
fn test_unwritable_store_is_storage_error() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("not-a-dir");
    fs::write(&root, b"occupied").unwrap();

    let source = ObjectLocation::new("uploads", "minutes.docx");
    let handler = ConversionHandler::new(HandlerConfig::default(), LocalStore::new(&root))
        .unwrap()
        .with_reporter(Box::new(NoopReporter));

    let err = handler.convert_object(&source).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
}
