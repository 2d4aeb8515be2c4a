// String extraction: produces the string table that gets uploaded.
//
// The upload driver only depends on the `StringExtractor` trait so tests can
// hand it a canned file instead of running `genstrings`.

use crate::error::SyncError;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

pub trait StringExtractor {
    /// Extract translatable strings from the tree at `root` and return the
    /// path of the resulting string-table file.
    fn extract(&self, root: &Path) -> Result<PathBuf, SyncError>;
}

/// Runs a shell pipeline from the project root and expects it to leave
/// `output` (relative to the root) behind.
#[derive(Debug, Clone)]
pub struct ShellExtractor {
    command: String,
    output: String,
}

impl ShellExtractor {
    pub fn new(command: impl Into<String>, output: impl Into<String>) -> Self {
        ShellExtractor {
            command: command.into(),
            output: output.into(),
        }
    }
}

impl StringExtractor for ShellExtractor {
    fn extract(&self, root: &Path) -> Result<PathBuf, SyncError> {
        let output = root.join(&self.output);
        // A leftover from an earlier run must not pass for fresh output.
        if output.exists() {
            std::fs::remove_file(&output)?;
        }

        info!("Extracting strings: {}", self.command);
        let result = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .current_dir(root)
            .output()
            .map_err(|e| SyncError::Extraction(format!("cannot run `sh`: {e}")))?;

        let stdout = String::from_utf8_lossy(&result.stdout);
        let stderr = String::from_utf8_lossy(&result.stderr);
        if !stdout.trim().is_empty() {
            debug!("extractor stdout: {}", stdout.trim_end());
        }
        if !stderr.trim().is_empty() {
            warn!("extractor stderr: {}", stderr.trim_end());
        }

        if !result.status.success() {
            return Err(SyncError::Extraction(format!(
                "`{}` exited with {}: {}",
                self.command,
                result.status,
                stderr.trim()
            )));
        }
        if !output.is_file() {
            return Err(SyncError::Extraction(format!(
                "`{}` did not produce {}",
                self.command,
                output.display()
            )));
        }
        Ok(output)
    }
}
