use std::path::{Path, PathBuf};
use tracexml_core::{Config, QueryStage, RunContext, StageParams};

use crate::node_details::TraceDocParams;

/// Prefix added to the detail output name for the filtered copy.
pub const FILTERED_PREFIX: &str = "filtered-";

/// Drops Form and ItemGroup nodes that no traced item references.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeFilterStage;

impl QueryStage for NodeFilterStage {
    fn id(&self) -> &'static str {
        "trace-node-filters"
    }

    fn query_file(&self) -> &'static str {
        "trace-node-filters.xql"
    }

    fn output_path(&self, config: &Config) -> PathBuf {
        config.output_path(&format!("{}{}", FILTERED_PREFIX, config.trace_node_details))
    }

    fn params(&self, frontier: &Path, _ctx: &RunContext) -> Box<dyn StageParams> {
        Box::new(TraceDocParams {
            trace_doc: frontier.to_path_buf(),
        })
    }

    fn empty_message(&self, oid: &str) -> String {
        format!("Filtering removed every node from this trace for oid = {}", oid)
    }
}
