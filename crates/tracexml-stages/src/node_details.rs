use std::path::{Path, PathBuf};
use tracexml_core::{path_value, Bindings, Config, QueryStage, RunContext, StageParams};

/// Parameters shared by the queries that read only the previous trace document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceDocParams {
    pub trace_doc: PathBuf,
}

impl StageParams for TraceDocParams {
    fn bindings(&self) -> Bindings {
        let mut b = Bindings::new();
        b.insert("trace-doc-name".to_string(), path_value(&self.trace_doc));
        b
    }
}

/// Pulls the descriptive metadata for every node in the trace.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeDetailStage;

impl QueryStage for NodeDetailStage {
    fn id(&self) -> &'static str {
        "trace-node-details"
    }

    fn query_file(&self) -> &'static str {
        "trace-node-details.xql"
    }

    fn output_path(&self, config: &Config) -> PathBuf {
        config.output_path(&config.trace_node_details)
    }

    fn params(&self, frontier: &Path, _ctx: &RunContext) -> Box<dyn StageParams> {
        Box::new(TraceDocParams {
            trace_doc: frontier.to_path_buf(),
        })
    }

    fn empty_message(&self, oid: &str) -> String {
        format!("Unable to retrieve the node details for this trace for oid = {}", oid)
    }
}
