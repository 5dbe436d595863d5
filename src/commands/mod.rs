pub mod edit;
pub mod files;
pub mod open;
pub mod scan;
pub mod status;

use anyhow::Result;
use log::info;
use logboss::LogbossError;
use logboss::highlight::Decorations;
use logboss::session::Session;
use logboss::state::StateStore;
use std::path::PathBuf;

use crate::cli::Targets;
use crate::context::LogbossContext;

/// Explicit paths expand through the file selector; no paths means the
/// active file. `None` means there is nothing to do.
pub(crate) fn resolve_targets<S, D>(
    context: &LogbossContext,
    session: &Session<S, D>,
    targets: &Targets,
) -> Result<Option<Vec<PathBuf>>>
where
    S: StateStore,
    D: Decorations,
{
    let selection = if targets.paths.is_empty() {
        None
    } else {
        Some(context.selector(&targets.extensions).expand(&targets.paths))
    };

    match session.targets(selection) {
        Ok(files) if files.is_empty() => {
            println!("No files selected");
            Ok(None)
        }
        Ok(files) => Ok(Some(files)),
        Err(LogbossError::NoActiveTarget) => {
            info!("no active file, nothing to do");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}
