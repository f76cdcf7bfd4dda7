//! Run Context: immutable state shared by every stage of one run
use chrono::{DateTime, Utc};
use std::path::Path;

use crate::config::Config;
use crate::error::TraceError;

#[derive(Debug, Clone)]
pub struct RunContext {
    /// Identifier of the variable under trace
    pub oid: String,
    /// Suppress displaying the rendered report
    pub quiet: bool,
    /// Run the optional filter stage
    pub filter: bool,
    pub config: Config,
    pub run_id: String,
    pub started_at: DateTime<Utc>,
}

impl RunContext {
    pub fn new(oid: impl Into<String>, config: Config) -> Self {
        Self {
            oid: oid.into(),
            quiet: false,
            filter: false,
            config,
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
        }
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn filter(mut self, filter: bool) -> Self {
        self.filter = filter;
        self
    }

    /// Check everything the chain needs before any stage runs.
    pub fn validate(&self) -> Result<(), TraceError> {
        if self.oid.trim().is_empty() {
            return Err(TraceError::MissingOid);
        }
        if self.config.xml_path.is_empty() {
            return Err(TraceError::MissingXmlPath);
        }

        let graph = self.config.graph_document();
        if self.config.l3_graph.is_empty() || !Path::new(&graph).is_file() {
            return Err(TraceError::MissingGraph(graph));
        }

        if self.config.xquery_path.is_empty() {
            return Err(TraceError::MissingXqueryPath);
        }
        Ok(())
    }
}
