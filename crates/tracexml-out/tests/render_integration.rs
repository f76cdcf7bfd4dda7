//! Integration tests for the render stage with the external XSLT adapter.
//!
//! The processor is pointed at a program that does not exist, so these
//! tests check the best-effort contract without needing xsltproc installed.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use tracexml_out::{RenderError, RenderStage, Viewer, XsltprocEngine};

/// Records every path it is asked to open and reports no display available.
#[derive(Default)]
struct HeadlessViewer {
    requested: RefCell<Vec<PathBuf>>,
}

impl Viewer for HeadlessViewer {
    fn open(&self, path: &Path) -> Result<(), RenderError> {
        self.requested.borrow_mut().push(path.to_path_buf());
        Err(RenderError::Display("headless".to_string()))
    }
}

#[test]
fn test_missing_processor_is_reported_not_raised() {
    let dir = tempfile::tempdir().unwrap();
    let xml = dir.path().join("trace-node-details.xml");
    let xsl = dir.path().join("trace.xsl");
    std::fs::write(&xml, "<nodes><node/></nodes>").unwrap();
    std::fs::write(&xsl, "<xsl:stylesheet version=\"1.0\"/>").unwrap();

    let html = dir.path().join("trace.html");
    let engine = XsltprocEngine::new("tracexml-no-such-xslt");
    let viewer = HeadlessViewer::default();
    let outcome = RenderStage::new(&engine, &viewer).render(&xml, &xsl, &html, true);

    assert!(!outcome.rendered);
    assert!(!outcome.displayed);
    assert_eq!(viewer.requested.borrow().as_slice(), [html]);

    let error = outcome.error.unwrap();
    assert!(error.contains("tracexml-no-such-xslt"));
    assert!(error.contains("headless"));
}

#[test]
fn test_missing_input_document() {
    let dir = tempfile::tempdir().unwrap();
    let xsl = dir.path().join("trace.xsl");
    std::fs::write(&xsl, "<xsl:stylesheet version=\"1.0\"/>").unwrap();

    let engine = XsltprocEngine::new("xsltproc");
    let viewer = HeadlessViewer::default();
    let outcome = RenderStage::new(&engine, &viewer).render(
        &dir.path().join("absent.xml"),
        &xsl,
        &dir.path().join("trace.html"),
        false,
    );

    assert!(!outcome.rendered);
    assert!(outcome.error.unwrap().starts_with("Render input not found"));
    assert!(!dir.path().join("trace.html").exists());
    assert!(viewer.requested.borrow().is_empty());
}
