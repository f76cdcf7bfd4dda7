use std::path::{Path, PathBuf};
use tracexml_core::{path_value, Bindings, Config, QueryStage, RunContext, StageParams};

/// Parameters of the graph trace query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTraceParams {
    /// Graph document to trace through
    pub input: PathBuf,
    pub oid: String,
}

impl StageParams for NodeTraceParams {
    fn bindings(&self) -> Bindings {
        let mut b = Bindings::new();
        b.insert("input".to_string(), path_value(&self.input));
        b.insert("oid".to_string(), self.oid.clone());
        b
    }
}

/// Traces the lifecycle graph for one OID. Its frontier is the graph document.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeTraceStage;

impl QueryStage for NodeTraceStage {
    fn id(&self) -> &'static str {
        "trace-node"
    }

    fn query_file(&self) -> &'static str {
        "trace-node.xql"
    }

    fn output_path(&self, config: &Config) -> PathBuf {
        config.output_path(&config.trace_node)
    }

    fn params(&self, frontier: &Path, ctx: &RunContext) -> Box<dyn StageParams> {
        Box::new(NodeTraceParams {
            input: frontier.to_path_buf(),
            oid: ctx.oid.clone(),
        })
    }

    fn empty_message(&self, oid: &str) -> String {
        format!("No trace was found for oid = {}", oid)
    }
}
