use anyhow::Result;
use logboss::state::StateStore;
use std::path::PathBuf;

use crate::context::LogbossContext;

pub fn run(context: &LogbossContext, root: Option<PathBuf>, extensions: &[String]) -> Result<()> {
    let root = match root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let active = context.store()?.active_file();
    let files = context
        .selector(extensions)
        .candidates(&root, active.as_deref());

    for file in files {
        println!("{}", file.display());
    }
    Ok(())
}
