use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{OrchestratorError, Result};

/// File looked up in the project root when no explicit config path is given.
pub const CONFIG_FILE_NAME: &str = "orchestrator.toml";

/// Everything the orchestrator needs to know about a project.
///
/// Every field has a default matching the wasm package layout, so an absent
/// `orchestrator.toml` is equivalent to an empty one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrchestratorConfig {
    pub tools: ToolsConfig,
    pub manifest: ManifestConfig,
    pub output: OutputConfig,
    pub phases: PhasesConfig,
    pub exports: ExportsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// Converts the TOML manifest to JSON on stdout.
    pub converter: String,
    /// Queries the converter's JSON output.
    pub query: String,
    pub compiler: String,
    pub bindgen: String,
    /// Checked but never required.
    pub optimizer: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            converter: "toml2json".to_string(),
            query: "jq".to_string(),
            compiler: "cargo".to_string(),
            bindgen: "wasm-bindgen".to_string(),
            optimizer: "wasm-opt".to_string(),
        }
    }
}

impl ToolsConfig {
    /// Hard prerequisites in the order they are checked.
    pub fn required(&self) -> [&str; 4] {
        [
            self.converter.as_str(),
            self.query.as_str(),
            self.compiler.as_str(),
            self.bindgen.as_str(),
        ]
    }

    pub fn optional(&self) -> [&str; 1] {
        [self.optimizer.as_str()]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReaderKind {
    /// Pipe the manifest through the converter and the query tool.
    #[default]
    Toolchain,
    /// Parse the manifest in-process.
    Native,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestConfig {
    pub path: PathBuf,
    /// jq-style path of the package name, e.g. `.package.name`.
    pub query: String,
    pub reader: ReaderKind,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("Cargo.toml"),
            query: ".package.name".to_string(),
            reader: ReaderKind::Toolchain,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Variable that, when present in the invoking environment, overrides
    /// `default_path`.
    pub env_var: String,
    pub default_path: PathBuf,
    /// Removed before every build, relative to the project root.
    pub clean: Vec<PathBuf>,
    pub result_link: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            env_var: "out".to_string(),
            default_path: PathBuf::from("./outputs/out"),
            clean: vec![PathBuf::from("./outputs"), PathBuf::from("./result")],
            result_link: PathBuf::from("./result"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhasesConfig {
    pub build: PathBuf,
    pub install: PathBuf,
}

impl Default for PhasesConfig {
    fn default() -> Self {
        Self {
            build: PathBuf::from("./buildPhaseCargoCommand.sh"),
            install: PathBuf::from("./installPhase.sh"),
        }
    }
}

/// Names under which the build context is handed to phase processes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportsConfig {
    pub package_var: String,
    pub output_var: String,
    pub target_dir_var: String,
    pub target_dir: PathBuf,
}

impl Default for ExportsConfig {
    fn default() -> Self {
        Self {
            package_var: "pname".to_string(),
            output_var: "out".to_string(),
            target_dir_var: "CARGO_TARGET_DIR".to_string(),
            target_dir: PathBuf::from("target"),
        }
    }
}

impl OrchestratorConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| OrchestratorError::Config(e.to_string()))
    }

    /// Reads `path`. The file must exist.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            OrchestratorError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            OrchestratorError::Config(msg) => {
                OrchestratorError::Config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Loads `orchestrator.toml` from `project_root`, falling back to defaults
    /// when the file does not exist.
    pub fn discover(project_root: &Path) -> Result<Self> {
        let candidate = project_root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading config");
            Self::load(&candidate)
        } else {
            tracing::debug!("no {} found, using defaults", CONFIG_FILE_NAME);
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("tools.converter", &self.tools.converter),
            ("tools.query", &self.tools.query),
            ("tools.compiler", &self.tools.compiler),
            ("tools.bindgen", &self.tools.bindgen),
            ("tools.optimizer", &self.tools.optimizer),
            ("output.env_var", &self.output.env_var),
            ("exports.package_var", &self.exports.package_var),
            ("exports.output_var", &self.exports.output_var),
            ("exports.target_dir_var", &self.exports.target_dir_var),
        ] {
            if value.trim().is_empty() {
                return Err(OrchestratorError::Config(format!("{} must not be empty", field)));
            }
        }

        if !self.manifest.query.starts_with('.') {
            return Err(OrchestratorError::Config(format!(
                "manifest.query must start with '.', got {:?}",
                self.manifest.query
            )));
        }

        if self.output.result_link.as_os_str().is_empty() {
            return Err(OrchestratorError::Config(
                "output.result_link must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
