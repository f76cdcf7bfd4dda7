//! Query stage contract: one named query, its parameters and its output file
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::context::RunContext;

/// Name → value pairs handed to the query engine.
pub type Bindings = BTreeMap<String, String>;

/// A stage's own parameter set. Converted to [`Bindings`] only when the
/// executor hands it to the engine.
pub trait StageParams: Debug {
    fn bindings(&self) -> Bindings;
}

/// Contract shared by every query stage of the trace chain.
pub trait QueryStage {
    /// Stage ID (ex: "trace-node")
    fn id(&self) -> &'static str;

    /// Query artifact file name inside the query directory
    fn query_file(&self) -> &'static str;

    /// Where the stage writes its items
    fn output_path(&self, config: &Config) -> PathBuf;

    /// Bind this stage's parameters against the current frontier
    fn params(&self, frontier: &Path, ctx: &RunContext) -> Box<dyn StageParams>;

    /// Diagnostic printed when the stage yields nothing
    fn empty_message(&self, oid: &str) -> String;

    fn describe(&self, frontier: &Path, ctx: &RunContext) -> StageDescriptor {
        StageDescriptor {
            stage: self.id(),
            query: self.query_file(),
            params: self.params(frontier, ctx),
            output: self.output_path(&ctx.config),
        }
    }
}

/// Everything needed for one stage invocation. Built fresh per call.
#[derive(Debug)]
pub struct StageDescriptor {
    pub stage: &'static str,
    pub query: &'static str,
    pub params: Box<dyn StageParams>,
    pub output: PathBuf,
}

/// What one stage produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageResult {
    /// Always written, even when no item matched
    pub output: PathBuf,
    /// Items that were not the empty-result marker
    pub items: usize,
    /// Engine or write failure reported during the stage
    pub failure: Option<String>,
}

/// Render a path as a query binding value.
pub fn path_value(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
