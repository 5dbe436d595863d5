use anyhow::Result;
use logboss::state::{StateStore, normalize_path};
use serde_json::json;
use std::path::PathBuf;

use crate::context::LogbossContext;

pub fn run(context: &LogbossContext, path: Option<PathBuf>, json: bool) -> Result<()> {
    let store = context.store()?;
    let Some(path) = path.map(|p| normalize_path(&p)).or_else(|| store.active_file()) else {
        println!("No active file");
        return Ok(());
    };

    let state = store.get(&path);
    let active = store.active_file().as_deref() == Some(path.as_path());

    if json {
        let value = json!({
            "path": path.to_string_lossy(),
            "active": active,
            "state": state,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        let last_modified = state
            .last_modified
            .map(|time| time.to_rfc3339())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "{}{}: commented={} highlighted={} last_modified={}",
            path.display(),
            if active { " (active)" } else { "" },
            state.is_commented,
            state.is_highlighted,
            last_modified
        );
    }
    Ok(())
}
