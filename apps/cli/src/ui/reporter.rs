use build_orchestrator::{Event, OutputSource, Reporter};

use super::{Icon, Theme};

/// Prints orchestrator events for a human at a terminal.
///
/// Progress goes to stdout, diagnostics to stderr. Every event is also
/// logged at debug level so `-v` shows the structured trail.
pub struct ConsoleReporter {
    install_script: String,
}

impl ConsoleReporter {
    /// `install_script` is named in the override notice so the user knows
    /// which phase the pre-set destination came from outside of.
    pub fn new(install_script: impl Into<String>) -> Self {
        Self {
            install_script: install_script.into(),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: &Event) {
        tracing::debug!(?event, "event");

        match event {
            Event::OptionalToolMissing { tool } => {
                super::warn(format!("{} is not installed. Please install it.", tool))
            }
            Event::PackageResolved(name) => {
                super::step(Icon::Package, format!("Package {}", Theme::bold(name)))
            }
            Event::Removed(path) => super::step(
                Icon::Broom,
                format!("Removed {}", Theme::muted(path.display())),
            ),
            Event::OutputResolved { path, source } => match source {
                OutputSource::Environment => super::info(format!(
                    "Will install package to {} (defined outside {} script)",
                    path.display(),
                    self.install_script
                )),
                OutputSource::Default => {
                    super::info(format!("Will install package to {}", path.display()))
                }
            },
            Event::PhaseStarted { name } => {
                super::step(Icon::Wrench, format!("Running {} phase", Theme::primary(name)))
            }
            Event::PhaseFinished { name } => super::success(format!("{} phase complete", name)),
            Event::ResultLinked {
                link,
                target,
                target_exists,
            } => {
                super::step(
                    Icon::Link,
                    format!("{} -> {}", link.display(), Theme::muted(target.display())),
                );
                if !target_exists {
                    super::warn(format!(
                        "{} does not exist; {} is a dangling link",
                        target.display(),
                        link.display()
                    ));
                }
            }
            // Missing required tools are rendered once, as the final error.
            Event::RequiredToolMissing { .. }
            | Event::StageEntered(_)
            | Event::ToolFound { .. } => {}
        }
    }
}
