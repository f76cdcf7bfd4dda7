use std::path::{Path, PathBuf};
use tracexml_core::{path_value, Bindings, Config, QueryStage, RunContext, StageParams};

/// Parameters of the node OID lookup query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeOidParams {
    pub trace_doc: PathBuf,
    pub graph_doc: PathBuf,
    /// Listing of the top-level XML documents
    pub l1_doc: PathBuf,
}

impl StageParams for NodeOidParams {
    fn bindings(&self) -> Bindings {
        let mut b = Bindings::new();
        b.insert("trace-doc-name".to_string(), path_value(&self.trace_doc));
        b.insert("graph-doc-name".to_string(), path_value(&self.graph_doc));
        b.insert("l1-doc-name".to_string(), path_value(&self.l1_doc));
        b
    }
}

/// Resolves each traced node to the XML file and OID it comes from.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeOidStage;

impl QueryStage for NodeOidStage {
    fn id(&self) -> &'static str {
        "trace-node-oid"
    }

    fn query_file(&self) -> &'static str {
        "trace-node-oid.xql"
    }

    fn output_path(&self, config: &Config) -> PathBuf {
        config.output_path(&config.trace_node_oid)
    }

    fn params(&self, frontier: &Path, ctx: &RunContext) -> Box<dyn StageParams> {
        Box::new(NodeOidParams {
            trace_doc: frontier.to_path_buf(),
            graph_doc: ctx.config.graph_document(),
            l1_doc: ctx.config.level1_listing(),
        })
    }

    fn empty_message(&self, oid: &str) -> String {
        format!("Unable to retrieve the node OIDs for this trace for oid = {}", oid)
    }
}
