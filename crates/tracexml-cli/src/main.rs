//! Binary entrypoint for Trace-XML trace runs.
use std::process::ExitCode;

fn main() -> ExitCode {
    tracexml_cli::run(std::env::args().skip(1).collect())
}
