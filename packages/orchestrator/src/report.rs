use std::path::PathBuf;

use crate::context::OutputSource;
use crate::manifest::PackageName;

/// Linear progression of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Prerequisites,
    Manifest,
    Clean,
    ResolveOutput,
    Build,
    Install,
    Link,
    Succeeded,
    Aborted,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Succeeded | Stage::Aborted)
    }
}

/// What the orchestrator tells its caller while running.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StageEntered(Stage),
    ToolFound { tool: String, path: PathBuf },
    /// A required tool is missing; the run aborts right after this event.
    RequiredToolMissing { tool: String },
    /// An optional tool is missing; the run continues.
    OptionalToolMissing { tool: String },
    PackageResolved(PackageName),
    Removed(PathBuf),
    OutputResolved { path: PathBuf, source: OutputSource },
    PhaseStarted { name: String },
    PhaseFinished { name: String },
    ResultLinked { link: PathBuf, target: PathBuf, target_exists: bool },
}

pub trait Reporter {
    fn report(&self, event: &Event);
}

/// Forwards every event to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &Event) {
        match event {
            Event::StageEntered(stage) => tracing::debug!(?stage, "stage"),
            Event::ToolFound { tool, path } => {
                tracing::debug!(tool = %tool, path = %path.display(), "tool found")
            }
            Event::RequiredToolMissing { tool } => {
                tracing::error!("{} is required but not installed.", tool)
            }
            Event::OptionalToolMissing { tool } => {
                tracing::warn!("{} is not installed. Please install it.", tool)
            }
            Event::PackageResolved(name) => tracing::info!(package = %name, "package resolved"),
            Event::Removed(path) => tracing::debug!(path = %path.display(), "removed"),
            Event::OutputResolved { path, source } => {
                tracing::info!(path = %path.display(), ?source, "Will install package")
            }
            Event::PhaseStarted { name } => tracing::info!(phase = %name, "phase started"),
            Event::PhaseFinished { name } => tracing::info!(phase = %name, "phase finished"),
            Event::ResultLinked {
                link,
                target,
                target_exists,
            } => {
                if *target_exists {
                    tracing::info!(link = %link.display(), target = %target.display(), "linked")
                } else {
                    tracing::warn!(
                        link = %link.display(),
                        target = %target.display(),
                        "linked to a path that does not exist"
                    )
                }
            }
        }
    }
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn report(&self, event: &Event) {
        (**self).report(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_succeeded_and_aborted_are_terminal() {
        let terminal: Vec<Stage> = [
            Stage::Prerequisites,
            Stage::Manifest,
            Stage::Clean,
            Stage::ResolveOutput,
            Stage::Build,
            Stage::Install,
            Stage::Link,
            Stage::Succeeded,
            Stage::Aborted,
        ]
        .into_iter()
        .filter(|s| s.is_terminal())
        .collect();
        assert_eq!(terminal, vec![Stage::Succeeded, Stage::Aborted]);
    }

    #[test]
    fn tracing_reporter_accepts_every_event_through_a_reference() {
        let reporter = &TracingReporter;
        for event in [
            Event::StageEntered(Stage::Prerequisites),
            Event::RequiredToolMissing { tool: "jq".into() },
            Event::OptionalToolMissing { tool: "wasm-opt".into() },
            Event::OutputResolved {
                path: PathBuf::from("./outputs/out"),
                source: OutputSource::Default,
            },
            Event::ResultLinked {
                link: PathBuf::from("./result"),
                target: PathBuf::from("./outputs/out"),
                target_exists: false,
            },
        ] {
            reporter.report(&event);
        }
    }
}
