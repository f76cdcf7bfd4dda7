//! Opens a rendered report in the platform's default viewer.

use std::path::Path;
use std::process::Command;

use crate::RenderError;

pub trait Viewer {
    fn open(&self, path: &Path) -> Result<(), RenderError>;
}

/// `open` on macOS, `cmd /C start` on Windows, `xdg-open` elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemViewer;

impl SystemViewer {
    fn command(path: &Path) -> Command {
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(path);
            cmd
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", ""]).arg(path);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(path);
            cmd
        }
    }
}

impl Viewer for SystemViewer {
    fn open(&self, path: &Path) -> Result<(), RenderError> {
        let status = Self::command(path)
            .status()
            .map_err(|e| RenderError::Display(e.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(RenderError::Display(format!("viewer exited with {}", status)))
        }
    }
}
