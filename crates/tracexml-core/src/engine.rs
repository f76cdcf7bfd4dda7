//! Query engine boundary.
//!
//! The engine evaluates query text against bound parameters and streams
//! result items back. Whether an item is the "matched nothing" marker is
//! decided here, so callers only ever look at a structured flag.

use std::io::{BufRead, BufReader};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

use crate::config::Config;
use crate::stage::Bindings;

/// Separator requested from the external processor between items.
const ITEM_SEPARATOR: u8 = 0x1e;

/// One serialized result item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryItem {
    pub text: String,
    /// True when the item is the explicit empty-collection marker
    pub empty: bool,
}

impl QueryItem {
    pub fn matched(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            empty: false,
        }
    }

    pub fn empty_marker(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            empty: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unable to start query engine '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Query engine '{program}' exited with {status}")]
    Failed { program: String, status: ExitStatus },
    #[error("Error reading results from the query engine: {0}")]
    Read(#[source] std::io::Error),
    #[error("Unable to write query results: {0}")]
    Sink(#[source] std::io::Error),
    #[error("Query evaluation failed: {0}")]
    Evaluation(String),
}

/// Sink receiving each item as the engine produces it.
pub type ItemSink<'s> = dyn FnMut(QueryItem) -> std::io::Result<()> + 's;

/// Evaluates one query. Implementations are reused across stages; bindings
/// are passed per call and must not carry over to the next one.
pub trait QueryEngine {
    fn evaluate(
        &self,
        query: &str,
        bindings: &Bindings,
        emit: &mut ItemSink<'_>,
    ) -> Result<(), EngineError>;
}

/// Runs an external XQuery processor with a BaseX-style command line:
/// `-b name=value` per binding, `-s item-separator=…` and `-q <query>`.
///
/// The processor splits a `-b` argument into several bindings at each
/// single comma, so commas inside a value are doubled.
#[derive(Debug, Clone)]
pub struct CommandQueryEngine {
    program: String,
    empty_marker: String,
}

impl CommandQueryEngine {
    pub fn new(program: impl Into<String>, empty_marker: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            empty_marker: empty_marker.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.xquery_engine, &config.empty_marker)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, query: &str, bindings: &Bindings) -> Command {
        let mut cmd = Command::new(&self.program);
        for (name, value) in bindings {
            cmd.arg(format!("-b{}={}", name, value.replace(',', ",,")));
        }
        cmd.arg(format!("-sitem-separator={}", ITEM_SEPARATOR as char));
        cmd.arg("-q").arg(query);
        cmd
    }

    /// Turn one raw chunk of output into an item, skipping blank chunks.
    pub fn classify(&self, raw: &str) -> Option<QueryItem> {
        let text = raw.trim();
        if text.is_empty() {
            None
        } else if text.eq_ignore_ascii_case(&self.empty_marker) {
            Some(QueryItem::empty_marker(text))
        } else {
            Some(QueryItem::matched(text))
        }
    }
}

impl QueryEngine for CommandQueryEngine {
    fn evaluate(
        &self,
        query: &str,
        bindings: &Bindings,
        emit: &mut ItemSink<'_>,
    ) -> Result<(), EngineError> {
        tracing::debug!(program = %self.program, bindings = bindings.len(), "spawning query engine");

        let mut child = self
            .command(query, bindings)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut streamed = Ok(());
        if let Some(stdout) = child.stdout.take() {
            for chunk in BufReader::new(stdout).split(ITEM_SEPARATOR) {
                let chunk = match chunk {
                    Ok(c) => c,
                    Err(e) => {
                        streamed = Err(EngineError::Read(e));
                        break;
                    }
                };
                if let Some(item) = self.classify(&String::from_utf8_lossy(&chunk)) {
                    if let Err(e) = emit(item) {
                        streamed = Err(EngineError::Sink(e));
                        break;
                    }
                }
            }
        }

        let status = child.wait().map_err(EngineError::Read)?;
        streamed?;
        if !status.success() {
            return Err(EngineError::Failed {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}
