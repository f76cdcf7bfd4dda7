//! Query Executor: runs one stage descriptor against the engine and
//! serializes its items to the stage output file.
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::config::Config;
use crate::engine::{QueryEngine, QueryItem};
use crate::error::TraceError;
use crate::stage::{StageDescriptor, StageResult};

pub struct QueryExecutor<'a> {
    engine: &'a dyn QueryEngine,
    config: &'a Config,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(engine: &'a dyn QueryEngine, config: &'a Config) -> Self {
        Self { engine, config }
    }

    /// Execute one stage. Only an unreadable query artifact is an error here;
    /// engine and write failures are logged and left in
    /// [`StageResult::failure`] for the caller to weigh against the count.
    pub fn execute(&self, descriptor: &StageDescriptor) -> Result<StageResult, TraceError> {
        let query_path = self.config.query_path(descriptor.query);
        let query = std::fs::read_to_string(&query_path).map_err(|source| {
            TraceError::QueryArtifact {
                path: query_path.clone(),
                source,
            }
        })?;

        let bindings = descriptor.params.bindings();
        tracing::debug!(
            stage = descriptor.stage,
            query = %query_path.display(),
            ?bindings,
            "executing query"
        );

        let file = match File::create(&descriptor.output) {
            Ok(f) => f,
            Err(e) => {
                let failure = format!(
                    "Unable to write the output to {}. {}",
                    descriptor.output.display(),
                    e
                );
                tracing::error!(stage = descriptor.stage, "{}", failure);
                return Ok(StageResult {
                    output: descriptor.output.clone(),
                    items: 0,
                    failure: Some(failure),
                });
            }
        };

        let mut writer = BufWriter::new(file);
        let mut items = 0usize;
        let evaluated = {
            let mut sink = |item: QueryItem| -> std::io::Result<()> {
                writer.write_all(item.text.as_bytes())?;
                writer.write_all(b"\n")?;
                if !item.empty {
                    items += 1;
                }
                Ok(())
            };
            self.engine.evaluate(&query, &bindings, &mut sink)
        };

        let mut failure = evaluated.err().map(|e| e.to_string());
        if let Err(e) = writer.flush() {
            failure.get_or_insert_with(|| {
                format!("Unable to write the output to {}. {}", descriptor.output.display(), e)
            });
        }
        if let Some(reason) = &failure {
            tracing::error!(stage = descriptor.stage, query = descriptor.query, "{}", reason);
        }

        Ok(StageResult {
            output: descriptor.output.clone(),
            items,
            failure,
        })
    }
}
