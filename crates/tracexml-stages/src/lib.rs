//! Trace-XML Stages: the query stages of a trace run and the orchestrator
//! that sequences them.
//!
//! # Pipeline Flow
//!
//! ```text
//! graph → trace-node → trace-node-oid → trace-node-details → [trace-node-filters] → render
//!            ↓               ↓                  ↓                      ↓               ↓
//!      traced nodes     file + OID         node metadata          filtered copy    HTML report
//! ```
//!
//! Every arrow is a file in the XML working directory. The first query stage
//! that yields no items stops the run; rendering never does.

mod node_details;
mod node_filter;
mod node_oid;
mod node_trace;

pub use node_details::{NodeDetailStage, TraceDocParams};
pub use node_filter::{NodeFilterStage, FILTERED_PREFIX};
pub use node_oid::{NodeOidParams, NodeOidStage};
pub use node_trace::{NodeTraceParams, NodeTraceStage};

use serde::Serialize;
use std::path::PathBuf;
use tracexml_core::{QueryEngine, QueryStage, RunContext, StageRecord, StageRunner, TraceError};
use tracexml_out::{render_summary, RenderError, RenderOutcome, RenderStage, TransformEngine, Viewer};

/// Result of a run that reached the render state.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub run_id: String,
    pub oid: String,
    pub stages: Vec<StageRecord>,
    /// Document handed to the render stage
    pub frontier: PathBuf,
    pub report: RenderOutcome,
}

/// Query stages in execution order. The filter stage is only present when
/// filtering is enabled; without it the frontier goes straight to rendering.
pub fn trace_stages(filter: bool) -> Vec<&'static dyn QueryStage> {
    let mut stages: Vec<&'static dyn QueryStage> = Vec::with_capacity(4);
    stages.push(&NodeTraceStage);
    stages.push(&NodeOidStage);
    stages.push(&NodeDetailStage);
    if filter {
        stages.push(&NodeFilterStage);
    }
    stages
}

/// Pipeline orchestrator for one trace run.
pub struct TracePipeline<'a> {
    engine: &'a dyn QueryEngine,
    transform: &'a dyn TransformEngine,
    viewer: &'a dyn Viewer,
}

impl<'a> TracePipeline<'a> {
    pub fn new(
        engine: &'a dyn QueryEngine,
        transform: &'a dyn TransformEngine,
        viewer: &'a dyn Viewer,
    ) -> Self {
        Self {
            engine,
            transform,
            viewer,
        }
    }

    /// Validate, run the query chain, then render. Any error returned means
    /// the run halted before rendering; a returned outcome means it completed,
    /// whether or not the report itself could be rendered.
    pub fn run(&self, ctx: &RunContext) -> Result<RunOutcome, TraceError> {
        let span = tracing::info_span!("trace", run_id = %ctx.run_id, oid = %ctx.oid);
        let _guard = span.enter();

        ctx.validate()?;

        let runner = StageRunner::new(self.engine, ctx);
        let chain = runner.run(&trace_stages(ctx.filter), ctx.config.graph_document())?;

        let report = RenderStage::new(self.transform, self.viewer).render(
            &chain.frontier,
            &ctx.config.transform_path(),
            &ctx.config.report_path(),
            !ctx.quiet,
        );

        Ok(RunOutcome {
            run_id: ctx.run_id.clone(),
            oid: ctx.oid.clone(),
            stages: chain.records,
            frontier: chain.frontier,
            report,
        })
    }
}

impl RunOutcome {
    pub fn summary(&self, ctx: &RunContext) -> Result<String, RenderError> {
        render_summary(ctx, &self.stages, &self.report)
    }
}
