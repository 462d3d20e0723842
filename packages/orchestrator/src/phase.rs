use std::path::{Path, PathBuf};
use std::process::Command;

use crate::context::BuildContext;
use crate::error::Result;
use crate::runner::run_or_fail;

/// A delegated unit of work.
///
/// Implementations receive the build context explicitly and must not rely on
/// anything the orchestrator left in its own environment.
pub trait Phase {
    fn name(&self) -> &str;

    fn run(&self, ctx: &BuildContext) -> Result<()>;
}

/// Runs an external script with no arguments from the project root.
#[derive(Debug, Clone)]
pub struct ScriptPhase {
    name: String,
    script: PathBuf,
}

impl ScriptPhase {
    pub fn new(name: impl Into<String>, script: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
        }
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    /// The command as it will be spawned for `ctx`.
    pub fn command(&self, ctx: &BuildContext) -> Command {
        let program = if self.script.is_absolute() {
            self.script.clone()
        } else {
            ctx.project_root().join(&self.script)
        };

        let mut cmd = Command::new(program);
        cmd.current_dir(ctx.project_root());
        for (key, value) in ctx.exported_vars() {
            cmd.env(key, value);
        }
        cmd
    }
}

impl Phase for ScriptPhase {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: &BuildContext) -> Result<()> {
        tracing::info!(phase = %self.name, script = %self.script.display(), "starting phase");
        run_or_fail(&mut self.command(ctx))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::ExportsConfig;
    use crate::context::OutputSource;
    use crate::manifest::PackageName;
    use std::os::unix::fs::PermissionsExt;

    fn context(root: &Path) -> BuildContext {
        BuildContext::new(
            root.to_path_buf(),
            PackageName::parse("foo", Path::new("Cargo.toml")).unwrap(),
            (PathBuf::from("./outputs/out"), OutputSource::Default),
            ExportsConfig::default(),
        )
    }

    fn script(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn script_sees_context_variables_and_runs_in_root() {
        let root = tempfile::tempdir().unwrap();
        script(
            root.path(),
            "build.sh",
            r#"printf '%s|%s|%s' "$pname" "$out" "$CARGO_TARGET_DIR" > seen.txt"#,
        );

        let ctx = context(root.path());
        ScriptPhase::new("build", "./build.sh").run(&ctx).unwrap();

        let seen = std::fs::read_to_string(root.path().join("seen.txt")).unwrap();
        assert_eq!(
            seen,
            format!("foo|./outputs/out|{}", root.path().join("target").display())
        );
    }

    #[test]
    fn failing_script_reports_its_status() {
        let root = tempfile::tempdir().unwrap();
        script(root.path(), "install.sh", "exit 7");

        let err = ScriptPhase::new("install", "./install.sh")
            .run(&context(root.path()))
            .unwrap_err();
        assert_eq!(err.exit_code(), 7);
    }
}
