use clap::Parser;

use super::GlobalArgs;
use crate::core::CliError;
use crate::ui;

#[derive(Parser, Debug, Default)]
pub struct BuildCommand {}

impl BuildCommand {
    pub fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let orchestrator = global.orchestrator()?;
        let report = orchestrator.run()?;

        ui::success(format!(
            "Built {} into {}",
            ui::Theme::bold(report.context.package_name()),
            report.context.output_path().display()
        ));
        Ok(())
    }
}
