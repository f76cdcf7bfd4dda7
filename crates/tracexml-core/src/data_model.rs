//! Data Model: per-stage records kept for the run summary
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageRecord {
    /// Stage ID (ex: "trace-node-oid")
    pub id: String,
    /// Query artifact file name
    pub query: String,
    /// Frontier consumed by the stage
    pub input: PathBuf,
    /// Frontier produced by the stage
    pub output: PathBuf,
    pub items: usize,
    /// blake3 of the output file, when it could be read back
    pub out_hash: Option<String>,
    pub latency_ms: u64,
    pub failure: Option<String>,
}
