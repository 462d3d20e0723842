use build_orchestrator::{Environment, Orchestrator, OrchestratorConfig};
use clap::Args;
use std::path::PathBuf;

use crate::core::CliError;
use crate::ui::ConsoleReporter;

pub mod build;
pub mod clean;
pub mod doctor;
pub mod plan;

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Project directory (holds the manifest and phase scripts)
    #[arg(short = 'C', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Config file; defaults to <project-dir>/orchestrator.toml when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Manifest to read the package name from, relative to the project dir
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,

    /// Install destination; same as setting the output variable beforehand
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl GlobalArgs {
    /// Loads config, applies flag overrides and captures the environment.
    pub fn orchestrator(&self) -> Result<Orchestrator<ConsoleReporter>, CliError> {
        let root = std::fs::canonicalize(&self.project_dir)?;

        let mut config = match &self.config {
            Some(path) => OrchestratorConfig::load(path)?,
            None => OrchestratorConfig::discover(&root)?,
        };
        if let Some(manifest) = &self.manifest {
            config.manifest.path = manifest.clone();
        }
        config.validate()?;

        let mut env = Environment::capture();
        if let Some(out) = &self.out {
            env.set(config.output.env_var.clone(), out.clone());
        }

        tracing::debug!(root = %root.display(), "project");

        let reporter = ConsoleReporter::new(config.phases.install.display().to_string());
        Ok(Orchestrator::new(root, config, env, reporter))
    }
}
