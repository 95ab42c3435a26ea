use std::{io, path::PathBuf, time::Duration};

pub type Result<T> = std::result::Result<T, JudgeError>;

/// Failures that prevent producing a [`Verdict`](super::Verdict) at all.
#[derive(Debug, thiserror::Error)]
pub enum JudgeError {
    #[error("Solution command is empty")]
    EmptyCommand,

    #[error("Failed to get current dir: {0}")]
    CurrentDir(#[source] io::Error),

    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("'{command}' did not finish within {}s and was killed", .timeout.as_secs_f64())]
    ProcessTimeout { command: String, timeout: Duration },

    #[error("Failed to communicate with subprocess: {0}")]
    Communicate(#[source] io::Error),

    #[error("Missing expected-output file for testcase '{name}' (expected '{}')", .path.to_string_lossy())]
    MissingCounterpart { name: String, path: PathBuf },

    #[error("Failed to read testcase '{}': {source}", .path.to_string_lossy())]
    ReadTestcase {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Fs(#[from] fsutil::Error),
}

impl JudgeError {
    /// No testcase can be judged once the solution cannot even be started.
    pub fn is_fatal_for_batch(&self) -> bool {
        matches!(self, JudgeError::Spawn { .. })
    }
}
