use clap::Parser;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use super::GlobalArgs;
use crate::core::CliError;
use crate::ui::{self, Theme};

#[derive(Parser, Debug)]
pub struct DoctorCommand {}

impl DoctorCommand {
    pub fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let orchestrator = global.orchestrator()?;
        let survey = orchestrator.survey();

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Tool", "Kind", "Status", "Path"]);

        for status in &survey {
            let kind = if status.required { "required" } else { "optional" };
            let (state, path) = match &status.path {
                Some(path) => (Theme::success("found"), path.display().to_string()),
                None if status.required => (Theme::error("missing"), String::new()),
                None => (Theme::warning("missing"), String::new()),
            };
            table.add_row(vec![status.name.clone(), kind.to_string(), state, path]);
        }
        ui::println(table.to_string());

        let missing: Vec<String> = survey
            .into_iter()
            .filter(|s| s.required && s.path.is_none())
            .map(|s| s.name)
            .collect();

        if missing.is_empty() {
            ui::success("All required tools are installed.");
            Ok(())
        } else {
            Err(CliError::MissingTools(missing))
        }
    }
}
