mod commands;
mod core;
mod ui;

use clap::{Parser, Subcommand};
use commands::{
    build::BuildCommand, clean::CleanCommand, doctor::DoctorCommand, plan::PlanCommand,
    GlobalArgs,
};

#[derive(Parser)]
#[command(name = "orchestrate", version)]
#[command(about = "Build and install a wasm package through its phase scripts", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check tools, run the build and install phases, link the result (default)
    Build(BuildCommand),
    /// Show what a build would do without running anything
    Plan(PlanCommand),
    /// Report which required and optional tools are installed
    Doctor(DoctorCommand),
    /// Remove previous outputs and the result link
    Clean(CleanCommand),
}

fn main() {
    let cli = Cli::parse();

    core::logging::init(cli.global.verbose);
    ui::set_quiet(cli.global.quiet);

    let result = match cli.command.unwrap_or(Commands::Build(BuildCommand::default())) {
        Commands::Build(cmd) => cmd.execute(&cli.global),
        Commands::Plan(cmd) => cmd.execute(&cli.global),
        Commands::Doctor(cmd) => cmd.execute(&cli.global),
        Commands::Clean(cmd) => cmd.execute(&cli.global),
    };

    if let Err(e) = result {
        e.render();
        std::process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_build() {
        let cli = Cli::try_parse_from(["orchestrate"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.global.project_dir, std::path::PathBuf::from("."));
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli =
            Cli::try_parse_from(["orchestrate", "plan", "--json", "--out", "/tmp/custom-out", "-vv"])
                .unwrap();
        assert_eq!(cli.global.out, Some(std::path::PathBuf::from("/tmp/custom-out")));
        assert_eq!(cli.global.verbose, 2);
        assert!(matches!(cli.command, Some(Commands::Plan(PlanCommand { json: true }))));
    }
}
