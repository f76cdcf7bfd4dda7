//! Unified Error Model
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Broad failure category, used by the entry point to pick an exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Configuration,
    Validation,
    EmptyResult,
    Io,
}

#[derive(Error, Debug)]
pub enum TraceError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No OID provided for this query.")]
    MissingOid,

    #[error("Error: No XML path in the configuration file.")]
    MissingXmlPath,

    #[error("Error: No XQuery path in the configuration file.")]
    MissingXqueryPath,

    #[error("Error: Missing Trace-XML graph file in configuration file or the file listed is not found: {}", .0.display())]
    MissingGraph(PathBuf),

    #[error("Unable to locate or read the XQuery file {}. {source}", path.display())]
    QueryArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    EmptyResult {
        stage: &'static str,
        message: String,
        cause: Option<String>,
    },
}

impl TraceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Config(_) | Self::MissingXmlPath | Self::MissingXqueryPath => {
                FailureKind::Configuration
            }
            Self::MissingOid | Self::MissingGraph(_) => FailureKind::Validation,
            Self::EmptyResult { .. } => FailureKind::EmptyResult,
            Self::QueryArtifact { .. } => FailureKind::Io,
        }
    }

    /// Stage that halted the run, if the failure happened inside the chain.
    pub fn stage(&self) -> Option<&'static str> {
        match self {
            Self::EmptyResult { stage, .. } => Some(stage),
            _ => None,
        }
    }
}
