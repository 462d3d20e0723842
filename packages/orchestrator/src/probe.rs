use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{OrchestratorError, Result};

/// Resolves executables the way a shell would before running them.
///
/// By default the search path is the invoking process's `PATH`; tests and
/// sandboxed callers pin it with [`ToolProbe::with_search_path`].
#[derive(Debug, Clone)]
pub struct ToolProbe {
    search_path: Option<OsString>,
    cwd: PathBuf,
}

impl ToolProbe {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            search_path: std::env::var_os("PATH"),
            cwd: cwd.into(),
        }
    }

    pub fn with_search_path(cwd: impl Into<PathBuf>, search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
            cwd: cwd.into(),
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Full path of `tool`, if it resolves to an executable.
    pub fn locate(&self, tool: &str) -> Option<PathBuf> {
        match which::which_in(tool, self.search_path.as_ref(), &self.cwd) {
            Ok(path) => {
                tracing::trace!(tool, path = %path.display(), "resolved");
                Some(path)
            }
            Err(e) => {
                tracing::trace!(tool, error = %e, "unresolved");
                None
            }
        }
    }

    /// Hard prerequisite: an unresolvable tool ends the run.
    pub fn require(&self, tool: &str) -> Result<PathBuf> {
        self.locate(tool).ok_or_else(|| OrchestratorError::MissingTool {
            tool: tool.to_string(),
        })
    }

    /// Soft prerequisite: reports whether `tool` resolves, never fails.
    pub fn check(&self, tool: &str) -> bool {
        self.locate(tool).is_some()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn executable(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn require_finds_tool_on_private_path() {
        let bin = tempfile::tempdir().unwrap();
        let expected = executable(bin.path(), "toml2json");

        let probe = ToolProbe::with_search_path(bin.path(), bin.path().as_os_str());
        assert_eq!(probe.require("toml2json").unwrap(), expected);
        assert!(probe.check("toml2json"));
    }

    #[test]
    fn require_reports_missing_tool() {
        let bin = tempfile::tempdir().unwrap();
        let probe = ToolProbe::with_search_path(bin.path(), bin.path().as_os_str());

        match probe.require("wasm-bindgen") {
            Err(OrchestratorError::MissingTool { tool }) => assert_eq!(tool, "wasm-bindgen"),
            other => panic!("expected MissingTool, got {:?}", other),
        }
        assert!(!probe.check("wasm-opt"));
    }

    #[test]
    fn non_executable_file_does_not_resolve() {
        let bin = tempfile::tempdir().unwrap();
        std::fs::write(bin.path().join("jq"), "not a program").unwrap();

        let probe = ToolProbe::with_search_path(bin.path(), bin.path().as_os_str());
        assert!(!probe.check("jq"));
    }
}
