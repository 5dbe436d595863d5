use anyhow::{Context, Result};
use logboss::highlight::HighlightState;
use std::path::Path;

use crate::context::LogbossContext;

pub fn run(context: &LogbossContext, path: &Path) -> Result<()> {
    let mut session = context.session()?;
    let state = session
        .activate(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let active = session
        .active_file()
        .context("Active file was not recorded")?;
    let suffix = match state {
        HighlightState::Highlighted => " (highlighted)",
        HighlightState::Unhighlighted => "",
    };
    println!("Active file: {}{}", active.display(), suffix);
    Ok(())
}
