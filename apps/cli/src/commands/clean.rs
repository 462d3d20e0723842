use clap::Parser;

use super::GlobalArgs;
use crate::core::CliError;
use crate::ui;

#[derive(Parser, Debug)]
pub struct CleanCommand {}

impl CleanCommand {
    pub fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let removed = global.orchestrator()?.clean();
        if removed.is_empty() {
            ui::info("Nothing to clean.");
        }
        Ok(())
    }
}
