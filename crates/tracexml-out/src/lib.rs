//! Trace-XML OUT: turns the final trace document into a viewable report
//!
//! Rendering is best-effort. The trace itself is already captured in the
//! stage files, so transform and display problems are logged and reported
//! in [`RenderOutcome`] but never fail the run.
//!
//! # Example
//!
//! ```ignore
//! use tracexml_out::{RenderStage, SystemViewer, XsltprocEngine};
//!
//! let stage = RenderStage::new(&XsltprocEngine::new("xsltproc"), &SystemViewer);
//! let outcome = stage.render(xml, xsl, html, true);
//! ```

pub mod summary;
pub mod transform;
pub mod viewer;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use summary::render_summary;
pub use transform::{TransformEngine, XsltprocEngine};
pub use viewer::{SystemViewer, Viewer};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Render input not found: {}", .0.display())]
    MissingInput(PathBuf),
    #[error("Unable to start transform engine '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Error transforming XML file: {0}")]
    Transform(String),
    #[error("Unable to load HTML file in browser: {0}")]
    Display(String),
    #[error("Summary render failed: {0}")]
    Summary(String),
}

/// What the render stage managed to do.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderOutcome {
    pub output: PathBuf,
    pub rendered: bool,
    pub displayed: bool,
    pub error: Option<String>,
}

pub struct RenderStage<'a> {
    engine: &'a dyn TransformEngine,
    viewer: &'a dyn Viewer,
}

impl<'a> RenderStage<'a> {
    pub fn new(engine: &'a dyn TransformEngine, viewer: &'a dyn Viewer) -> Self {
        Self { engine, viewer }
    }

    /// Transform `xml` with `transform` into `output`, then open `output`
    /// when `display` is set. The viewer is tried even after a failed
    /// transform, since an earlier run may have left a report behind.
    pub fn render(&self, xml: &Path, transform: &Path, output: &Path, display: bool) -> RenderOutcome {
        let mut outcome = RenderOutcome {
            output: output.to_path_buf(),
            rendered: false,
            displayed: false,
            error: None,
        };

        match self.engine.transform(xml, transform, output) {
            Ok(()) => {
                outcome.rendered = true;
                tracing::info!(output = %output.display(), "report rendered");
            }
            Err(e) => {
                tracing::warn!(output = %output.display(), "{}", e);
                outcome.error = Some(e.to_string());
            }
        }

        if display {
            match self.viewer.open(output) {
                Ok(()) => outcome.displayed = true,
                Err(e) => {
                    tracing::warn!("{}", e);
                    outcome.error = Some(match outcome.error.take() {
                        Some(first) => format!("{}; {}", first, e),
                        None => e.to_string(),
                    });
                }
            }
        }

        outcome
    }
}
