use anyhow::{Result, bail};
use log::warn;
use logboss::document::{Document, TextBuffer};
use logboss::statement::Statement;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::Targets;
use crate::commands::resolve_targets;
use crate::context::LogbossContext;

#[derive(Serialize)]
struct ScannedFile {
    path: PathBuf,
    language: String,
    statements: Vec<Statement>,
}

pub fn run(context: &LogbossContext, targets: &Targets, json: bool) -> Result<()> {
    let session = context.session()?;
    let Some(files) = resolve_targets(context, &session, targets)? else {
        return Ok(());
    };

    let mut scanned = Vec::new();
    let mut failed = Vec::new();
    for path in files {
        let located = Document::open(&path).and_then(|document| {
            session
                .locator()
                .locate(document.text(), document.language())
                .map(|statements| (document.language(), statements))
                .map_err(|err| err.in_file(&path))
        });
        match located {
            Ok((language, mut statements)) => {
                statements.sort_by_key(|s| (s.location.start_line, s.location.start_column));
                scanned.push(ScannedFile {
                    path,
                    language: language.to_string(),
                    statements,
                });
            }
            Err(err) => {
                warn!("Skipping file {:?}: {}", path, err);
                failed.push((path, err));
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&scanned)?);
    } else {
        for file in &scanned {
            println!("File: {} ({})", file.path.display(), file.language);
            for statement in &file.statements {
                println!(
                    "  [L{}-L{}] {:?}",
                    statement.location.start_line, statement.location.end_line, statement.kind
                );
            }
        }
    }

    if failed.is_empty() {
        return Ok(());
    }
    for (path, err) in &failed {
        eprintln!("  {}: {}", path.display(), err);
    }
    bail!("Scan failed for {} file(s)", failed.len());
}
