use build_orchestrator::OrchestratorError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    #[error("Missing required tools: {}", .0.join(", "))]
    MissingTools(Vec<String>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Status the process exits with.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Orchestrator(e) => e.exit_code(),
            _ => 1,
        }
    }

    /// Returns a themed, actionable suggestion for the error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            CliError::Orchestrator(OrchestratorError::MissingTool { tool }) => Some(format!(
                "Install {} and make sure it is on your PATH, or point [tools] in orchestrator.toml at it.",
                tool
            )),
            CliError::MissingTools(_) => {
                Some("Install the tools above or point [tools] in orchestrator.toml at them.".to_string())
            }
            CliError::Orchestrator(OrchestratorError::InvalidPackageName { .. }) => {
                Some("Check that the manifest sets [package] name.".to_string())
            }
            CliError::Orchestrator(OrchestratorError::Config(_)) => {
                Some("Check orchestrator.toml for syntax errors or unknown fields.".to_string())
            }
            _ => None,
        }
    }

    pub fn render(&self) {
        eprintln!("\n{} {}", console::style("Error:").red().bold(), self);
        if let Some(s) = self.suggestion() {
            eprintln!("{} {}", console::style("  help:").dim(), s);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_status_survives_wrapping() {
        let err = CliError::from(OrchestratorError::CommandFailed {
            command: "./installPhase.sh".to_string(),
            code: 3,
        });
        assert_eq!(err.exit_code(), 3);
        assert!(err.suggestion().is_none());
    }

    #[test]
    fn missing_tool_suggests_install() {
        let err = CliError::from(OrchestratorError::MissingTool {
            tool: "wasm-bindgen".to_string(),
        });
        assert_eq!(err.exit_code(), 1);
        assert!(err.suggestion().unwrap().contains("wasm-bindgen"));
    }
}
