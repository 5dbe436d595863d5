use anyhow::Result;
use clap::Parser;
use log::info;
use logboss::session::Command;

mod cli;
mod commands;
mod context;
mod logging;

use crate::cli::{Cli, Commands};
use crate::context::LogbossContext;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = logboss::config::load()?;
    let context = LogbossContext::new(cli, config);
    let state_dir = context.state_dir()?;
    logging::init_logging(
        context.invocation.logging_mode,
        context.invocation.debug,
        &state_dir,
    )?;
    info!("logboss starting");
    info!("logging mode: {:?}", context.invocation.logging_mode);
    info!("state dir: {}", state_dir.display());

    match &context.invocation.command {
        Commands::Highlight(targets) => commands::edit::run(&context, Command::Highlight, targets),
        Commands::RemoveHighlight(targets) => {
            commands::edit::run(&context, Command::RemoveHighlight, targets)
        }
        Commands::ToggleHighlight(targets) => {
            commands::edit::run(&context, Command::ToggleHighlight, targets)
        }
        Commands::Comment(targets) => commands::edit::run(&context, Command::Comment, targets),
        Commands::Uncomment(targets) => commands::edit::run(&context, Command::Uncomment, targets),
        Commands::RemoveLogs(targets) => {
            commands::edit::run(&context, Command::RemoveLogs, targets)
        }
        Commands::ToggleComments(targets) => {
            commands::edit::run(&context, Command::ToggleComments, targets)
        }
        Commands::Open { path } => commands::open::run(&context, path),
        Commands::Scan { targets, json } => commands::scan::run(&context, targets, *json),
        Commands::Status { path, json } => commands::status::run(&context, path.clone(), *json),
        Commands::Files { root, extensions } => {
            commands::files::run(&context, root.clone(), extensions)
        }
    }
}
