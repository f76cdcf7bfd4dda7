//! Trace-XML CLI: parse options, run one trace, map the outcome to an exit status.
pub mod args;
pub mod logging;

use std::process::ExitCode;

use args::{parse_args, CliOptions, Invocation, USAGE};
use tracexml_core::{CommandQueryEngine, Config, FailureKind, QueryEngine, RunContext, TraceError};
use tracexml_out::{SystemViewer, TransformEngine, Viewer, XsltprocEngine};
use tracexml_stages::{RunOutcome, TracePipeline};

pub const EXIT_OK: u8 = 0;
pub const EXIT_USAGE: u8 = 2;
pub const EXIT_CONFIG: u8 = 3;
pub const EXIT_VALIDATION: u8 = 4;
pub const EXIT_EMPTY_RESULT: u8 = 5;
pub const EXIT_IO: u8 = 6;

pub fn exit_code(kind: FailureKind) -> u8 {
    match kind {
        FailureKind::Configuration => EXIT_CONFIG,
        FailureKind::Validation => EXIT_VALIDATION,
        FailureKind::EmptyResult => EXIT_EMPTY_RESULT,
        FailureKind::Io => EXIT_IO,
    }
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<TraceError>()
        .map(|e| exit_code(e.kind()))
        .unwrap_or(EXIT_IO)
}

/// Entry point used by the binary. `args` excludes the program name.
pub fn run(args: Vec<String>) -> ExitCode {
    let options = match parse_args(args, args::default_config_path()) {
        Ok(Invocation::Run(options)) => options,
        Ok(Invocation::Help) => {
            eprintln!("{}", USAGE);
            return ExitCode::from(EXIT_OK);
        }
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", USAGE);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    logging::init(logging::default_level(options.verbose));

    match execute(&options) {
        Ok(_) => ExitCode::from(EXIT_OK),
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

/// Load the configuration and run the trace with the external engines it names.
pub fn execute(options: &CliOptions) -> anyhow::Result<RunOutcome> {
    if options.oid.trim().is_empty() {
        return Err(TraceError::MissingOid.into());
    }
    let config = Config::load(&options.cfg).map_err(TraceError::from)?;

    let engine = CommandQueryEngine::from_config(&config);
    let transform = XsltprocEngine::from_config(&config);
    execute_with(options, config, &engine, &transform, &SystemViewer)
}

/// Run the trace against the given engines and print the completion summary.
pub fn execute_with(
    options: &CliOptions,
    config: Config,
    engine: &dyn QueryEngine,
    transform: &dyn TransformEngine,
    viewer: &dyn Viewer,
) -> anyhow::Result<RunOutcome> {
    let ctx = RunContext::new(options.oid.clone(), config)
        .quiet(options.quiet)
        .filter(options.filter);

    tracing::info!(run_id = %ctx.run_id, oid = %ctx.oid, filter = ctx.filter, "starting trace");
    let outcome = TracePipeline::new(engine, transform, viewer).run(&ctx)?;

    match outcome.summary(&ctx) {
        Ok(summary) => print!("{}", summary),
        Err(e) => tracing::warn!("{}", e),
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn options(cfg: PathBuf, oid: &str) -> CliOptions {
        CliOptions {
            cfg,
            oid: oid.to_string(),
            quiet: true,
            filter: false,
            verbose: false,
        }
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            EXIT_OK,
            EXIT_USAGE,
            exit_code(FailureKind::Configuration),
            exit_code(FailureKind::Validation),
            exit_code(FailureKind::EmptyResult),
            exit_code(FailureKind::Io),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_missing_oid_is_validation_error() {
        let err = execute(&options(PathBuf::from("unused.cfg"), "")).unwrap_err();
        assert_eq!(exit_code_for(&err), EXIT_VALIDATION);
        assert_eq!(err.to_string(), "No OID provided for this query.");
    }

    #[test]
    fn test_missing_config_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute(&options(dir.path().join("trace-xml.cfg"), "IT.AGE")).unwrap_err();

        assert_eq!(exit_code_for(&err), EXIT_CONFIG);
        assert!(err.to_string().starts_with("Configuration file not found"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_config_without_graph_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("trace-xml.cfg");
        std::fs::write(
            &cfg,
            format!("xml-path={}\nxquery-path={}\nL3-graph=missing.graphml\n", dir.path().display(), dir.path().display()),
        )
        .unwrap();

        let err = execute(&options(cfg, "IT.AGE")).unwrap_err();
        assert_eq!(exit_code_for(&err), EXIT_VALIDATION);
    }
}
