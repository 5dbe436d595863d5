use anyhow::{Result, bail};
use log::info;
use logboss::session::Command;

use crate::cli::Targets;
use crate::commands::resolve_targets;
use crate::context::LogbossContext;

pub fn run(context: &LogbossContext, command: Command, targets: &Targets) -> Result<()> {
    info!("{} start (paths={:?})", command, targets.paths);
    let mut session = context.session()?;
    let Some(files) = resolve_targets(context, &session, targets)? else {
        return Ok(());
    };

    let report = session.execute(command, &files);

    for outcome in &report.processed {
        match command {
            Command::RemoveHighlight => {
                println!("{}: highlighting removed", outcome.path.display())
            }
            Command::Highlight | Command::ToggleHighlight => println!(
                "{}: {} statement(s) highlighted",
                outcome.path.display(),
                outcome.statements
            ),
            _ => println!(
                "{}: {} statement(s), {} line edit(s){}",
                outcome.path.display(),
                outcome.statements,
                outcome.edits,
                if outcome.state.is_commented {
                    " [commented]"
                } else {
                    ""
                }
            ),
        }
    }

    if report.is_success() {
        println!("{}", success_message(command));
        return Ok(());
    }

    for (path, err) in &report.failed {
        eprintln!("  {}: {}", path.display(), err);
    }
    bail!(
        "Failed to {}: {} of {} file(s) failed",
        command,
        report.failed.len(),
        files.len()
    );
}

fn success_message(command: Command) -> &'static str {
    match command {
        Command::Highlight => "Console statements highlighted",
        Command::RemoveHighlight => "Console highlighting removed",
        Command::ToggleHighlight => "Console highlighting toggled",
        Command::Comment => "Console statements commented out",
        Command::Uncomment => "Console statements uncommented",
        Command::RemoveLogs => "Console statements removed successfully",
        Command::ToggleComments => "Console comments toggled",
    }
}
