use serde::Serialize;
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::config::{ExportsConfig, OutputConfig};
use crate::manifest::PackageName;

/// Snapshot of the invoking environment.
///
/// The orchestrator only ever reads from this snapshot; it never mutates its
/// own process environment.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: BTreeMap<OsString, OsString>,
}

impl Environment {
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars_os().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<OsString>, value: impl Into<OsString>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars.get(key.as_ref()).map(OsString::as_os_str)
    }
}

/// Where the output path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputSource {
    /// Pre-set in the invoking environment.
    Environment,
    Default,
}

/// Applies the override-or-default policy.
///
/// Presence is what counts: a variable set to the empty string still
/// overrides the default.
pub fn resolve_output_path(env: &Environment, output: &OutputConfig) -> (PathBuf, OutputSource) {
    match env.get(&output.env_var) {
        Some(value) => (PathBuf::from(value), OutputSource::Environment),
        None => (output.default_path.clone(), OutputSource::Default),
    }
}

/// Values handed from the orchestrator to each phase.
///
/// Built once per run after the package name and output path are resolved;
/// phases only ever see it by shared reference.
#[derive(Debug, Clone, Serialize)]
pub struct BuildContext {
    project_root: PathBuf,
    package_name: PackageName,
    output_path: PathBuf,
    output_source: OutputSource,
    target_dir: PathBuf,
    #[serde(skip)]
    exports: ExportsConfig,
}

impl BuildContext {
    pub fn new(
        project_root: PathBuf,
        package_name: PackageName,
        (output_path, output_source): (PathBuf, OutputSource),
        exports: ExportsConfig,
    ) -> Self {
        let target_dir = project_root.join(&exports.target_dir);
        Self {
            project_root,
            package_name,
            output_path,
            output_source,
            target_dir,
            exports,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn package_name(&self) -> &PackageName {
        &self.package_name
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn output_source(&self) -> OutputSource {
        self.output_source
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Variables set on every phase process.
    pub fn exported_vars(&self) -> Vec<(String, OsString)> {
        vec![
            (
                self.exports.package_var.clone(),
                OsString::from(self.package_name.as_str()),
            ),
            (
                self.exports.output_var.clone(),
                self.output_path.clone().into_os_string(),
            ),
            (
                self.exports.target_dir_var.clone(),
                self.target_dir.clone().into_os_string(),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_applies_without_override() {
        let (path, source) = resolve_output_path(&Environment::empty(), &OutputConfig::default());
        assert_eq!(path, PathBuf::from("./outputs/out"));
        assert_eq!(source, OutputSource::Default);
    }

    #[test]
    fn preset_variable_wins() {
        let env = Environment::empty().with("out", "/tmp/custom-out");
        let (path, source) = resolve_output_path(&env, &OutputConfig::default());
        assert_eq!(path, PathBuf::from("/tmp/custom-out"));
        assert_eq!(source, OutputSource::Environment);
    }

    #[test]
    fn exported_vars_carry_resolved_values() {
        let name = PackageName::parse("foo", Path::new("Cargo.toml")).unwrap();
        let ctx = BuildContext::new(
            PathBuf::from("/work/pkg"),
            name,
            (PathBuf::from("./outputs/out"), OutputSource::Default),
            ExportsConfig::default(),
        );

        assert_eq!(
            ctx.exported_vars(),
            vec![
                ("pname".to_string(), OsString::from("foo")),
                ("out".to_string(), OsString::from("./outputs/out")),
                (
                    "CARGO_TARGET_DIR".to_string(),
                    OsString::from("/work/pkg/target")
                ),
            ]
        );
    }
}
