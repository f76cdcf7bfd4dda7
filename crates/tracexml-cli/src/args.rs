//! `key=value` style command-line options.
use std::path::PathBuf;
use thiserror::Error;
use tracexml_core::config::DEFAULT_CONFIG_FILE;

pub const USAGE: &str =
    "Usage: tracexml cfg=<config file> oid=<variable oid> [quiet] [filter] [verbose] [help]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub cfg: PathBuf,
    pub oid: String,
    pub quiet: bool,
    pub filter: bool,
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run(CliOptions),
    Help,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("Unknown argument: {0}")]
    Unknown(String),
}

/// Parse arguments (without the program name). `help` wins as soon as it is seen.
pub fn parse_args<I>(args: I, default_cfg: PathBuf) -> Result<Invocation, ArgsError>
where
    I: IntoIterator<Item = String>,
{
    let mut options = CliOptions {
        cfg: default_cfg,
        oid: String::new(),
        quiet: false,
        filter: false,
        verbose: false,
    };

    for arg in args {
        if let Some(cfg) = arg.strip_prefix("cfg=") {
            options.cfg = PathBuf::from(cfg);
        } else if let Some(oid) = arg.strip_prefix("oid=") {
            options.oid = oid.to_string();
        } else {
            match arg.as_str() {
                "quiet" => options.quiet = true,
                "filter" => options.filter = true,
                "verbose" => options.verbose = true,
                "help" => return Ok(Invocation::Help),
                _ => return Err(ArgsError::Unknown(arg)),
            }
        }
    }

    Ok(Invocation::Run(options))
}

/// `trace-xml.cfg` next to the running executable.
pub fn default_config_path() -> PathBuf {
    match std::env::current_exe() {
        Ok(exe) => exe
            .parent()
            .map(|dir| dir.join(DEFAULT_CONFIG_FILE))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
        Err(e) => {
            tracing::warn!(
                "Unexpected error determining the current path. Please include the config file as a command-line argument. {}",
                e
            );
            PathBuf::from(DEFAULT_CONFIG_FILE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Invocation, ArgsError> {
        parse_args(args.iter().map(|a| a.to_string()), PathBuf::from("default.cfg"))
    }

    #[test]
    fn test_full_invocation() {
        let inv = parse(&["cfg=/etc/trace.cfg", "oid=IT.AGE", "quiet", "filter"]).unwrap();
        assert_eq!(
            inv,
            Invocation::Run(CliOptions {
                cfg: PathBuf::from("/etc/trace.cfg"),
                oid: "IT.AGE".to_string(),
                quiet: true,
                filter: true,
                verbose: false,
            })
        );
    }

    #[test]
    fn test_defaults() {
        let Invocation::Run(opts) = parse(&["oid=IT.AGE"]).unwrap() else {
            panic!("expected a run");
        };
        assert_eq!(opts.cfg, PathBuf::from("default.cfg"));
        assert!(!opts.quiet && !opts.filter);
    }

    #[test]
    fn test_missing_oid_parses_empty() {
        let Invocation::Run(opts) = parse(&[]).unwrap() else {
            panic!("expected a run");
        };
        assert!(opts.oid.is_empty());
    }

    #[test]
    fn test_oid_keeps_everything_after_first_equals() {
        let Invocation::Run(opts) = parse(&["oid=IG.DM=1"]).unwrap() else {
            panic!("expected a run");
        };
        assert_eq!(opts.oid, "IG.DM=1");
    }

    #[test]
    fn test_help_and_unknown() {
        assert_eq!(parse(&["oid=X", "help", "bogus"]).unwrap(), Invocation::Help);
        assert_eq!(parse(&["--oid", "X"]).unwrap_err(), ArgsError::Unknown("--oid".to_string()));
    }

    #[test]
    fn test_default_config_sits_next_to_binary() {
        assert!(default_config_path().ends_with(DEFAULT_CONFIG_FILE));
    }
}
