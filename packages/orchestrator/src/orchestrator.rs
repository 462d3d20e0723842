use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::{OrchestratorConfig, ReaderKind};
use crate::context::{resolve_output_path, BuildContext, Environment, OutputSource};
use crate::error::Result;
use crate::manifest::{ManifestReader, NativeReader, PackageName, ToolchainReader};
use crate::phase::{Phase, ScriptPhase};
use crate::probe::ToolProbe;
use crate::report::{Event, Reporter, Stage};
use crate::workspace;

/// Resolved locations of every configured tool.
#[derive(Debug, Clone, Serialize)]
pub struct Toolchain {
    pub converter: PathBuf,
    pub query: PathBuf,
    pub compiler: PathBuf,
    pub bindgen: PathBuf,
    /// `None` when the optimizer is not installed.
    pub optimizer: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolStatus {
    pub name: String,
    pub required: bool,
    pub path: Option<PathBuf>,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub context: BuildContext,
    pub toolchain: Toolchain,
    pub result_link: PathBuf,
    /// Whether the output path existed when the result link was created.
    pub target_exists: bool,
}

/// What a run would do, computed without touching the filesystem.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub project_root: PathBuf,
    pub manifest: PathBuf,
    pub toolchain: Toolchain,
    pub package_name: PackageName,
    pub output_path: PathBuf,
    pub output_source: OutputSource,
    pub clean: Vec<PathBuf>,
    pub phases: Vec<(String, PathBuf)>,
    pub exports: Vec<(String, String)>,
    pub result_link: PathBuf,
}

impl Plan {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub struct Orchestrator<R: Reporter> {
    root: PathBuf,
    config: OrchestratorConfig,
    env: Environment,
    probe: ToolProbe,
    reporter: R,
}

impl<R: Reporter> Orchestrator<R> {
    pub fn new(
        root: impl Into<PathBuf>,
        config: OrchestratorConfig,
        env: Environment,
        reporter: R,
    ) -> Self {
        let root = root.into();
        let probe = ToolProbe::new(root.clone());
        Self {
            root,
            config,
            env,
            probe,
            reporter,
        }
    }

    /// Replaces the `PATH`-based probe, e.g. to pin the search path.
    pub fn with_probe(mut self, probe: ToolProbe) -> Self {
        self.probe = probe;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    fn enter(&self, stage: Stage) {
        self.reporter.report(&Event::StageEntered(stage));
    }

    /// Probes every configured tool without failing.
    pub fn survey(&self) -> Vec<ToolStatus> {
        let tools = &self.config.tools;
        let required = tools.required().into_iter().map(|t| (t, true));
        let optional = tools.optional().into_iter().map(|t| (t, false));

        required
            .chain(optional)
            .map(|(name, required)| ToolStatus {
                name: name.to_string(),
                required,
                path: self.probe.locate(name),
            })
            .collect()
    }

    /// Hard checks in their fixed order, then the soft optimizer check.
    pub fn check_prerequisites(&self) -> Result<Toolchain> {
        let tools = &self.config.tools;
        let require = |tool: &str| match self.probe.require(tool) {
            Ok(path) => {
                self.reporter.report(&Event::ToolFound {
                    tool: tool.to_string(),
                    path: path.clone(),
                });
                Ok(path)
            }
            Err(e) => {
                self.reporter.report(&Event::RequiredToolMissing {
                    tool: tool.to_string(),
                });
                Err(e)
            }
        };

        let converter = require(tools.converter.as_str())?;
        let query = require(tools.query.as_str())?;
        let compiler = require(tools.compiler.as_str())?;
        let bindgen = require(tools.bindgen.as_str())?;

        let optimizer = self.probe.locate(&tools.optimizer);
        match &optimizer {
            Some(path) => self.reporter.report(&Event::ToolFound {
                tool: tools.optimizer.clone(),
                path: path.clone(),
            }),
            None => self.reporter.report(&Event::OptionalToolMissing {
                tool: tools.optimizer.clone(),
            }),
        }

        Ok(Toolchain {
            converter,
            query,
            compiler,
            bindgen,
            optimizer,
        })
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.config.manifest.path)
    }

    pub fn resolve_package(&self, toolchain: &Toolchain) -> Result<PackageName> {
        let manifest = self.manifest_path();
        let query_path = self.config.manifest.query.clone();

        let name = match self.config.manifest.reader {
            ReaderKind::Toolchain => ToolchainReader {
                converter: toolchain.converter.clone(),
                query: toolchain.query.clone(),
                query_path,
            }
            .package_name(&manifest)?,
            ReaderKind::Native => NativeReader { query_path }.package_name(&manifest)?,
        };

        self.reporter.report(&Event::PackageResolved(name.clone()));
        Ok(name)
    }

    pub fn clean(&self) -> Vec<PathBuf> {
        let removed = workspace::clean(&self.root, &self.config.output.clean);
        for path in &removed {
            self.reporter.report(&Event::Removed(path.clone()));
        }
        removed
    }

    pub fn resolve_output(&self) -> (PathBuf, OutputSource) {
        let (path, source) = resolve_output_path(&self.env, &self.config.output);
        self.reporter.report(&Event::OutputResolved {
            path: path.clone(),
            source,
        });
        (path, source)
    }

    /// The configured build and install scripts, in run order.
    pub fn script_phases(&self) -> [ScriptPhase; 2] {
        [
            ScriptPhase::new("build", &self.config.phases.build),
            ScriptPhase::new("install", &self.config.phases.install),
        ]
    }

    /// Full run with the configured phase scripts.
    pub fn run(&self) -> Result<BuildReport> {
        let [build, install] = self.script_phases();
        self.run_with_phases(&[&build, &install])
    }

    /// Full run with caller-supplied phases, executed in order.
    pub fn run_with_phases(&self, phases: &[&dyn Phase]) -> Result<BuildReport> {
        let result = self.execute(phases);
        self.enter(if result.is_ok() {
            Stage::Succeeded
        } else {
            Stage::Aborted
        });
        result
    }

    fn execute(&self, phases: &[&dyn Phase]) -> Result<BuildReport> {
        self.enter(Stage::Prerequisites);
        let toolchain = self.check_prerequisites()?;

        self.enter(Stage::Manifest);
        let package_name = self.resolve_package(&toolchain)?;

        self.enter(Stage::Clean);
        self.clean();

        self.enter(Stage::ResolveOutput);
        let output = self.resolve_output();

        let ctx = BuildContext::new(
            self.root.clone(),
            package_name,
            output,
            self.config.exports.clone(),
        );

        for (index, phase) in phases.iter().enumerate() {
            self.enter(match index {
                0 => Stage::Build,
                _ => Stage::Install,
            });
            self.reporter.report(&Event::PhaseStarted {
                name: phase.name().to_string(),
            });
            phase.run(&ctx)?;
            self.reporter.report(&Event::PhaseFinished {
                name: phase.name().to_string(),
            });
        }

        self.enter(Stage::Link);
        let link = self.config.output.result_link.clone();
        let target_exists = workspace::link_result(&self.root, &link, ctx.output_path())?;
        self.reporter.report(&Event::ResultLinked {
            link: link.clone(),
            target: ctx.output_path().to_path_buf(),
            target_exists,
        });

        Ok(BuildReport {
            context: ctx,
            toolchain,
            result_link: link,
            target_exists,
        })
    }

    /// Prerequisites, package name and output path, with no cleanup, no
    /// phases and no link.
    pub fn plan(&self) -> Result<Plan> {
        let toolchain = self.check_prerequisites()?;
        let package_name = self.resolve_package(&toolchain)?;
        let output = resolve_output_path(&self.env, &self.config.output);

        let ctx = BuildContext::new(
            self.root.clone(),
            package_name.clone(),
            output.clone(),
            self.config.exports.clone(),
        );

        Ok(Plan {
            project_root: self.root.clone(),
            manifest: self.manifest_path(),
            package_name,
            output_path: output.0,
            output_source: output.1,
            clean: self.config.output.clean.clone(),
            phases: self
                .script_phases()
                .iter()
                .map(|p| (p.name().to_string(), p.script().to_path_buf()))
                .collect(),
            exports: ctx
                .exported_vars()
                .into_iter()
                .map(|(k, v)| (k, v.to_string_lossy().into_owned()))
                .collect(),
            result_link: self.config.output.result_link.clone(),
            toolchain,
        })
    }
}
