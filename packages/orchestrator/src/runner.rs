use std::process::Command;

use crate::error::{status_code, OrchestratorError, Result};

/// Renders a command the way it would be typed: program followed by its
/// arguments, separated by single spaces.
pub fn command_line(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs `cmd` to completion with inherited stdio.
///
/// A non-zero status becomes [`OrchestratorError::CommandFailed`] carrying the
/// full command line and that status, which the binary exits with unchanged.
pub fn run_or_fail(cmd: &mut Command) -> Result<()> {
    let line = command_line(cmd);
    tracing::debug!(command = %line, "running");

    let status = cmd.status().map_err(|source| OrchestratorError::Spawn {
        command: line.clone(),
        source,
    })?;

    if status.success() {
        Ok(())
    } else {
        let code = status_code(status);
        tracing::debug!(command = %line, code, "command failed");
        Err(OrchestratorError::CommandFailed {
            command: line,
            code,
        })
    }
}
