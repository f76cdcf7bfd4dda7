//! Stage Runner: threads the frontier through query stages, fail-fast on
//! the first stage that yields nothing.
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::context::RunContext;
use crate::data_model::StageRecord;
use crate::engine::QueryEngine;
use crate::error::TraceError;
use crate::executor::QueryExecutor;
use crate::stage::QueryStage;

/// Frontier and records left by a fully successful chain.
#[derive(Debug, Clone)]
pub struct ChainOutput {
    pub frontier: PathBuf,
    pub records: Vec<StageRecord>,
}

pub struct StageRunner<'a> {
    executor: QueryExecutor<'a>,
    ctx: &'a RunContext,
}

impl<'a> StageRunner<'a> {
    pub fn new(engine: &'a dyn QueryEngine, ctx: &'a RunContext) -> Self {
        Self {
            executor: QueryExecutor::new(engine, &ctx.config),
            ctx,
        }
    }

    /// Run `stages` in order starting from `initial`. Each stage consumes the
    /// previous frontier; no stage runs after one that produced zero items.
    pub fn run(
        &self,
        stages: &[&dyn QueryStage],
        initial: PathBuf,
    ) -> Result<ChainOutput, TraceError> {
        let mut frontier = initial;
        let mut records = Vec::with_capacity(stages.len());

        for stage in stages {
            let record = self.run_stage(*stage, &frontier)?;
            frontier = record.output.clone();
            records.push(record);
        }

        Ok(ChainOutput { frontier, records })
    }

    /// Run one stage and gate on its item count.
    pub fn run_stage(
        &self,
        stage: &dyn QueryStage,
        frontier: &Path,
    ) -> Result<StageRecord, TraceError> {
        let start = Instant::now();
        let descriptor = stage.describe(frontier, self.ctx);
        tracing::info!(stage = stage.id(), input = %frontier.display(), "running stage");

        let result = self.executor.execute(&descriptor)?;
        let record = StageRecord {
            id: stage.id().to_string(),
            query: descriptor.query.to_string(),
            input: frontier.to_path_buf(),
            output: result.output.clone(),
            items: result.items,
            out_hash: hash_file(&result.output),
            latency_ms: start.elapsed().as_millis() as u64,
            failure: result.failure.clone(),
        };

        if result.items == 0 {
            tracing::debug!(stage = stage.id(), failure = ?result.failure, "stage produced no items");
            return Err(TraceError::EmptyResult {
                stage: stage.id(),
                message: stage.empty_message(&self.ctx.oid),
                cause: result.failure,
            });
        }

        tracing::info!(
            stage = stage.id(),
            items = record.items,
            output = %record.output.display(),
            latency_ms = record.latency_ms,
            "stage complete"
        );
        Ok(record)
    }
}

fn hash_file(path: &Path) -> Option<String> {
    std::fs::read(path)
        .ok()
        .map(|bytes| format!("blake3:{}", blake3::hash(&bytes)))
}
