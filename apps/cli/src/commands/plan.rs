use clap::Parser;

use super::GlobalArgs;
use crate::core::CliError;
use crate::ui::{self, Theme};

#[derive(Parser, Debug)]
pub struct PlanCommand {
    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

impl PlanCommand {
    pub fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        if self.json {
            // Keep stdout clean for the JSON document.
            ui::set_quiet(true);
        }

        let plan = global.orchestrator()?.plan()?;

        if self.json {
            ui::println(plan.to_json()?);
            return Ok(());
        }

        ui::println(Theme::primary("Build plan"));
        ui::println(format!("  project   {}", plan.project_root.display()));
        ui::println(format!("  manifest  {}", plan.manifest.display()));
        ui::println(format!("  package   {}", Theme::bold(&plan.package_name)));
        ui::println(format!(
            "  output    {} {}",
            plan.output_path.display(),
            Theme::muted(format!("({:?})", plan.output_source).to_lowercase())
        ));
        for path in &plan.clean {
            ui::println(format!("  clean     {}", path.display()));
        }
        for (name, script) in &plan.phases {
            ui::println(format!("  {:<9} {}", name, script.display()));
        }
        for (key, value) in &plan.exports {
            ui::println(format!("  export    {}={}", key, value));
        }
        ui::println(format!(
            "  link      {} -> {}",
            plan.result_link.display(),
            plan.output_path.display()
        ));
        if plan.toolchain.optimizer.is_none() {
            ui::println(Theme::muted("  optimizer not installed; phases may skip it"));
        }
        Ok(())
    }
}
