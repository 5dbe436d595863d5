use crate::error::{LogbossError, Result};
use crate::hashing::hash_str;
use crate::language::{self, Language};
use crate::statement::{EditAction, EditOp, Position};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Read access to a text buffer addressed by 0-indexed lines.
pub trait TextBuffer {
    fn text(&self) -> &str;
    fn line_count(&self) -> usize;
    /// Line content without its line break.
    fn line(&self, index: usize) -> Option<&str>;
}

/// In-memory copy of a source file. Edits are applied as one atomic batch
/// and only reach disk through [`Document::save`].
#[derive(Debug, Clone)]
pub struct Document {
    path: Option<PathBuf>,
    text: String,
    line_starts: Vec<usize>,
    disk_hash: Option<String>,
    dirty: bool,
}

impl Document {
    pub fn open(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| LogbossError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        let disk_hash = Some(hash_str(&text));
        Ok(Self {
            path: Some(path.to_path_buf()),
            line_starts: line_starts(&text),
            text,
            disk_hash,
            dirty: false,
        })
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            path: None,
            line_starts: line_starts(&text),
            text,
            disk_hash: None,
            dirty: false,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn language(&self) -> Language {
        self.path
            .as_deref()
            .map(language::detect)
            .unwrap_or_default()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Applies every op or none of them. Ranges are resolved against the
    /// current text up front, must not overlap, and are spliced from the
    /// highest offset down so earlier coordinates stay valid.
    pub fn apply(&mut self, ops: &[EditOp]) -> Result<()> {
        if ops.is_empty() {
            return Ok(());
        }

        let mut resolved = Vec::with_capacity(ops.len());
        for op in ops {
            let start = self.offset(op.range.start)?;
            let end = self.offset(op.range.end)?;
            if start > end {
                return Err(LogbossError::EditApplication(format!(
                    "range {:?} ends before it starts",
                    op.range
                )));
            }
            let replacement = match &op.action {
                EditAction::Replace(text) => text.as_str(),
                EditAction::Delete => "",
            };
            resolved.push((start, end, replacement));
        }

        resolved.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
        for pair in resolved.windows(2) {
            let (later, earlier) = (&pair[0], &pair[1]);
            if earlier.1 > later.0 || (earlier.0 == later.0 && earlier.1 == later.1) {
                return Err(LogbossError::EditApplication(format!(
                    "overlapping edits at bytes {}..{} and {}..{}",
                    earlier.0, earlier.1, later.0, later.1
                )));
            }
        }

        let mut text = self.text.clone();
        for (start, end, replacement) in &resolved {
            text.replace_range(*start..*end, replacement);
        }

        debug!("applied {} edit(s)", resolved.len());
        self.line_starts = line_starts(&text);
        self.text = text;
        self.dirty = true;
        Ok(())
    }

    /// Writes pending edits back to the file. Refuses when the file changed
    /// on disk after it was opened.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let Some(path) = self.path.clone() else {
            return Err(LogbossError::EditApplication(
                "document has no backing file".to_string(),
            ));
        };

        let on_disk = fs::read_to_string(&path).map_err(|source| LogbossError::FileAccess {
            path: path.clone(),
            source,
        })?;
        if self.disk_hash.as_deref() != Some(hash_str(&on_disk).as_str()) {
            return Err(LogbossError::EditApplication(format!(
                "{} was modified externally",
                path.display()
            )));
        }

        fs::write(&path, &self.text).map_err(|source| LogbossError::FileAccess {
            path: path.clone(),
            source,
        })?;
        self.disk_hash = Some(hash_str(&self.text));
        self.dirty = false;
        info!("saved {}", path.display());
        Ok(())
    }

    /// Byte offset of `position`. Columns past the line end (including the
    /// end-of-line sentinel) clamp to the line end; lines past the last one
    /// clamp to the end of the text.
    fn offset(&self, position: Position) -> Result<usize> {
        let Some(&line_start) = self.line_starts.get(position.line) else {
            return Ok(self.text.len());
        };
        let line_len = self.line(position.line).map(str::len).unwrap_or(0);
        let offset = line_start + position.column.min(line_len);
        if !self.text.is_char_boundary(offset) {
            return Err(LogbossError::EditApplication(format!(
                "column {} on line {} splits a character",
                position.column, position.line
            )));
        }
        Ok(offset)
    }
}

impl TextBuffer for Document {
    fn text(&self) -> &str {
        &self.text
    }

    fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn line(&self, index: usize) -> Option<&str> {
        let start = *self.line_starts.get(index)?;
        let end = self
            .line_starts
            .get(index + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        let line = &self.text[start..end];
        Some(line.strip_suffix('\r').unwrap_or(line))
    }
}

fn line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(text.match_indices('\n').map(|(index, _)| index + 1));
    starts
}
