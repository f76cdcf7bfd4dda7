//! Transform engine boundary: XML document + transform definition → report.

use std::path::Path;
use std::process::{Command, Stdio};

use tracexml_core::Config;

use crate::RenderError;

pub trait TransformEngine {
    fn transform(&self, xml: &Path, transform: &Path, output: &Path) -> Result<(), RenderError>;
}

/// Runs an external XSLT processor with an xsltproc-style command line:
/// `-o <output> <transform> <xml>`.
#[derive(Debug, Clone)]
pub struct XsltprocEngine {
    program: String,
}

impl XsltprocEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.xslt_engine)
    }

    fn command(&self, xml: &Path, transform: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-o").arg(output).arg(transform).arg(xml);
        cmd
    }
}

impl TransformEngine for XsltprocEngine {
    fn transform(&self, xml: &Path, transform: &Path, output: &Path) -> Result<(), RenderError> {
        if !transform.is_file() {
            return Err(RenderError::MissingInput(transform.to_path_buf()));
        }
        if !xml.is_file() {
            return Err(RenderError::MissingInput(xml.to_path_buf()));
        }

        let status = self
            .command(xml, transform, output)
            .stdin(Stdio::null())
            .status()
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(RenderError::Transform(format!(
                "'{}' exited with {}",
                self.program, status
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let engine = XsltprocEngine::new("xsltproc");
        let cmd = engine.command(
            Path::new("/w/trace-node-details.xml"),
            Path::new("/w/trace.xsl"),
            Path::new("/w/trace.html"),
        );
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args, ["-o", "/w/trace.html", "/w/trace.xsl", "/w/trace-node-details.xml"]);
    }

    #[test]
    fn test_missing_transform_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let xml = dir.path().join("in.xml");
        std::fs::write(&xml, "<nodes/>").unwrap();

        let err = XsltprocEngine::new("xsltproc")
            .transform(&xml, &dir.path().join("none.xsl"), &dir.path().join("out.html"))
            .unwrap_err();
        assert!(matches!(err, RenderError::MissingInput(_)));
    }
}
