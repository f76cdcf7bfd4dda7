//! Trace-XML Core: configuration, run context, query stage contract and runner
//!
//! Every stage of a trace run is a named query evaluated by an external
//! engine. Stages hand their output file forward as the next stage's input;
//! the first stage that yields nothing stops the run.

pub mod config;
pub mod context;
pub mod data_model;
pub mod engine;
pub mod error;
pub mod executor;
pub mod runner;
pub mod stage;

pub use config::{Config, ConfigError, Properties};
pub use context::RunContext;
pub use data_model::StageRecord;
pub use engine::{CommandQueryEngine, EngineError, ItemSink, QueryEngine, QueryItem};
pub use error::{FailureKind, TraceError};
pub use executor::QueryExecutor;
pub use runner::{ChainOutput, StageRunner};
pub use stage::{path_value, Bindings, QueryStage, StageDescriptor, StageParams, StageResult};

/// Trace-XML engine version
pub const TRACEXML_VERSION: &str = env!("CARGO_PKG_VERSION");
