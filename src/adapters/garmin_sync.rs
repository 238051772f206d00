//! Garmin download step
//!
//! New sleep exports are produced by an external downloader (GarminDB's
//! `garmindb_cli.py` by default). This module only runs it and reports
//! failures; the files it writes are read by [`super::GarminSleepDirectory`].

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::EngineConfig;
use crate::error::MetricsError;

#[derive(Debug, Clone)]
pub struct GarminSync {
    command: String,
    args: Vec<String>,
}

impl GarminSync {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.garmin_sync.command.clone(),
            config.garmin_sync.args.clone(),
        )
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Resolved path of the downloader, if it can be found
    pub fn locate(&self) -> Option<PathBuf> {
        let command = Path::new(&self.command);
        if command.components().count() > 1 {
            return command.exists().then(|| command.to_path_buf());
        }
        which(&self.command)
    }

    /// Run the downloader to completion.
    ///
    /// A spawn failure or a non-zero exit is a `Fetch` error carrying the
    /// command's stderr.
    pub fn run(&self) -> Result<(), MetricsError> {
        tracing::info!(command = %self.command, "downloading sleep data");

        let output = Command::new(&self.command)
            .args(&self.args)
            .output()
            .map_err(|e| MetricsError::Fetch(format!("failed to run {}: {}", self.command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MetricsError::Fetch(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        tracing::info!(command = %self.command, "sleep data downloaded");
        Ok(())
    }
}

fn which<S: AsRef<OsStr>>(cmd: S) -> Option<PathBuf> {
    let cmd_ref = cmd.as_ref();
    std::env::var_os("PATH").and_then(|paths| {
        std::env::split_paths(&paths).find_map(|dir| {
            let candidate = dir.join(cmd_ref);
            if candidate.exists() {
                Some(candidate)
            } else {
                None
            }
        })
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_successful_download() {
        assert!(GarminSync::new("true", Vec::new()).run().is_ok());
    }

    #[test]
    fn test_failing_download_reports_stderr() {
        let sync = GarminSync::new(
            "sh",
            vec!["-c".to_string(), "echo login failed >&2; exit 3".to_string()],
        );
        match sync.run() {
            Err(MetricsError::Fetch(message)) => assert!(message.contains("login failed")),
            other => panic!("expected fetch error, got {:?}", other),
        }
        assert!(matches!(
            GarminSync::new("false", Vec::new()).run(),
            Err(MetricsError::Fetch(_))
        ));
    }

    #[test]
    fn test_missing_command_fails_to_spawn() {
        let sync = GarminSync::new("/nonexistent/garmindb_cli.py", Vec::new());
        assert!(matches!(sync.run(), Err(MetricsError::Fetch(_))));
        assert!(sync.locate().is_none());
    }

    #[test]
    fn test_locate_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("sync.sh");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();

        let sync = GarminSync::new(script.to_string_lossy(), Vec::new());
        assert_eq!(sync.locate(), Some(script));
    }
}
