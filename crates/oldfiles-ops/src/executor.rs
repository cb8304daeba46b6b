//! Per-file command execution and deletion.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::operation::{CleanupOptions, CleanupOutcome, OperationError};

/// Placeholder replaced by the file path in command templates.
pub const PATH_PLACEHOLDER: &str = "{}";

/// Runs the configured cleanup actions for old files, one file at a time.
#[derive(Debug, Clone, Default)]
pub struct CleanupExecutor {
    options: CleanupOptions,
}

impl CleanupExecutor {
    /// Create an executor with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        Self { options }
    }

    /// The configured options.
    pub fn options(&self) -> &CleanupOptions {
        &self.options
    }

    /// The command line that would be run for `path`, if any.
    pub fn command_for(&self, path: &Path) -> Option<String> {
        self.options
            .command
            .as_ref()
            .map(|template| template.replace(PATH_PLACEHOLDER, &path.to_string_lossy()))
    }

    /// Run the command for `path` and delete the file if requested.
    ///
    /// A failing command leaves the file alone and is not an error. Only a
    /// deletion failure other than the file being already gone is.
    pub async fn cleanup(&self, path: &Path) -> Result<CleanupOutcome, OperationError> {
        if let Some(command) = self.command_for(path) {
            let status = self.run_command(&command).await;
            if status != Some(0) {
                tracing::warn!(
                    path = %path.display(),
                    ?status,
                    "command failed, file left in place"
                );
                return Ok(CleanupOutcome::CommandFailed { status });
            }
            if !self.options.delete {
                return Ok(CleanupOutcome::CommandSucceeded);
            }
        }

        if !self.options.delete {
            return Ok(CleanupOutcome::NoAction);
        }

        delete_file(path.to_path_buf()).await
    }

    /// Run `command` through the platform shell and wait for it.
    ///
    /// Returns the exit code, or `None` if the command could not be started
    /// or was killed by a signal.
    async fn run_command(&self, command: &str) -> Option<i32> {
        let mut cmd = shell_command(command);
        cmd.stdin(Stdio::null());
        if self.options.verbose {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        } else {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }

        tracing::debug!(command, "running cleanup command");
        match cmd.status().await {
            Ok(status) => status.code(),
            Err(e) => {
                tracing::warn!(command, error = %e, "could not start command");
                None
            }
        }
    }
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

async fn delete_file(path: PathBuf) -> Result<CleanupOutcome, OperationError> {
    let target = path.clone();
    let result = tokio::task::spawn_blocking(move || std::fs::remove_file(&target))
        .await
        .map_err(|e| OperationError::new(path.clone(), format!("Task failed: {}", e)))?;

    match result {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "deleted");
            Ok(CleanupOutcome::Deleted)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(CleanupOutcome::AlreadyAbsent),
        Err(e) => Err(OperationError::new(path, e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_for_replaces_every_placeholder() {
        let executor = CleanupExecutor::new(CleanupOptions {
            command: Some("cp {} {}.bak".into()),
            ..Default::default()
        });

        assert_eq!(
            executor.command_for(Path::new("/x/a.log")).as_deref(),
            Some("cp /x/a.log /x/a.log.bak")
        );
    }

    #[test]
    fn test_no_command_configured() {
        let executor = CleanupExecutor::default();
        assert!(executor.command_for(Path::new("/x")).is_none());
        assert!(!executor.options().has_action());
    }

    #[tokio::test]
    async fn test_no_action_leaves_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("a-2020-01-01");
        std::fs::write(&file, "x").unwrap();

        let outcome = CleanupExecutor::default().cleanup(&file).await.unwrap();

        assert_eq!(outcome, CleanupOutcome::NoAction);
        assert!(file.exists());
    }
}
