use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

pub type Result<T, E = OrchestratorError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Error: {tool} is required but not installed.")]
    MissingTool { tool: String },

    #[error("Command '{command}' failed with exit code {code}")]
    CommandFailed { command: String, code: i32 },

    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid package name {name:?} read from {}", manifest.display())]
    InvalidPackageName { name: String, manifest: PathBuf },

    #[error("Could not read manifest {}: {reason}", path.display())]
    Manifest { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not link {} -> {}: {source}", link.display(), target.display())]
    Link {
        link: PathBuf,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OrchestratorError {
    /// Process exit status this error should terminate the run with.
    ///
    /// Delegated command failures propagate their own status verbatim and
    /// commands that cannot be started use the shell's 127/126. Every other
    /// failure exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            OrchestratorError::CommandFailed { code, .. } => *code,
            OrchestratorError::Spawn { source, .. } => match source.kind() {
                std::io::ErrorKind::NotFound => 127,
                std::io::ErrorKind::PermissionDenied => 126,
                _ => 1,
            },
            _ => 1,
        }
    }
}

/// Maps a child's exit status to the status the orchestrator should exit with.
///
/// A child killed by a signal has no code; on Unix we follow the shell
/// convention of `128 + signal`.
pub fn status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
