use crate::document::TextBuffer;
use crate::error::{LogbossError, Result};
use crate::language::Language;
use crate::locator::Locator;
use crate::planner::{self, Mode};
use crate::state::{StateStore, StateUpdate, normalize_path};
use crate::statement::LineRange;
use crossterm::style::Stylize;
use log::{debug, info};
use std::collections::HashMap;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

/// Surface that can show (and later remove) highlights over line ranges.
pub trait Decorations {
    type Handle;

    fn decorate(
        &mut self,
        path: &Path,
        buffer: &dyn TextBuffer,
        ranges: &[LineRange],
    ) -> Result<Self::Handle>;

    fn dispose(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightState {
    Unhighlighted,
    Highlighted,
}

/// Drives the decoration lifecycle. Handles live in a registry keyed by
/// normalized path, so one file's decoration is never shown for another.
pub struct HighlightController<D: Decorations> {
    decorations: D,
    handles: HashMap<PathBuf, D::Handle>,
    active: Option<PathBuf>,
}

impl<D: Decorations> HighlightController<D> {
    pub fn new(decorations: D) -> Self {
        Self {
            decorations,
            handles: HashMap::new(),
            active: None,
        }
    }

    pub fn decorations(&self) -> &D {
        &self.decorations
    }

    pub fn active(&self) -> Option<&Path> {
        self.active.as_deref()
    }

    pub fn state(&self, path: &Path) -> HighlightState {
        if self.handles.contains_key(&normalize_path(path)) {
            HighlightState::Highlighted
        } else {
            HighlightState::Unhighlighted
        }
    }

    /// Unhighlighted -> Highlighted. Returns the number of decorated statements.
    pub fn highlight<S: StateStore>(
        &mut self,
        path: &Path,
        buffer: &dyn TextBuffer,
        language: Language,
        locator: &Locator,
        store: &mut S,
    ) -> Result<usize> {
        let count = self.decorate(path, buffer, language, locator, store)?;
        store.set(path, StateUpdate::highlighted(true))?;
        info!("highlighted {} statement(s) in {}", count, path.display());
        Ok(count)
    }

    /// Highlighted -> Unhighlighted.
    pub fn remove<S: StateStore>(&mut self, path: &Path, store: &mut S) -> Result<()> {
        self.dispose(path);
        store.set(path, StateUpdate::highlighted(false))?;
        info!("removed highlighting from {}", path.display());
        Ok(())
    }

    /// Direction comes from the file's persisted flag. Returns the new state.
    pub fn toggle<S: StateStore>(
        &mut self,
        path: &Path,
        buffer: &dyn TextBuffer,
        language: Language,
        locator: &Locator,
        store: &mut S,
    ) -> Result<HighlightState> {
        if store.get(path).is_highlighted {
            self.remove(path, store)?;
            Ok(HighlightState::Unhighlighted)
        } else {
            self.highlight(path, buffer, language, locator, store)?;
            Ok(HighlightState::Highlighted)
        }
    }

    /// Makes `path` the active file and reconciles its visible decoration
    /// with that file's persisted flag.
    pub fn activate<S: StateStore>(
        &mut self,
        path: &Path,
        buffer: &dyn TextBuffer,
        language: Language,
        locator: &Locator,
        store: &mut S,
    ) -> Result<HighlightState> {
        let key = normalize_path(path);
        self.active = Some(key.clone());

        let wanted = store.get(&key).is_highlighted;
        let shown = self.handles.contains_key(&key);
        match (wanted, shown) {
            (true, false) => {
                debug!("restoring highlight for {}", key.display());
                self.decorate(&key, buffer, language, locator, store)?;
            }
            (false, true) => {
                debug!("dropping stale highlight for {}", key.display());
                self.dispose(&key);
            }
            _ => {}
        }
        Ok(self.state(&key))
    }

    fn decorate<S: StateStore>(
        &mut self,
        path: &Path,
        buffer: &dyn TextBuffer,
        language: Language,
        locator: &Locator,
        store: &S,
    ) -> Result<usize> {
        let key = normalize_path(path);
        let statements = locator
            .locate(buffer.text(), language)
            .map_err(|err| err.in_file(&key))?;
        let ranges = planner::plan(
            buffer,
            &statements,
            Mode::Highlight,
            &store.get(&key),
        )
        .into_decorations();

        // At most one decoration per file.
        self.dispose(&key);
        let handle = self.decorations.decorate(&key, buffer, &ranges)?;
        self.handles.insert(key, handle);
        Ok(ranges.len())
    }

    fn dispose(&mut self, path: &Path) {
        if let Some(handle) = self.handles.remove(&normalize_path(path)) {
            self.decorations.dispose(handle);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecorationId(pub u64);

/// Prints decorated lines to stdout, styled when stdout is a terminal.
#[derive(Debug)]
pub struct TerminalDecorations {
    next_id: u64,
    styled: bool,
}

impl TerminalDecorations {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            styled: std::io::stdout().is_terminal(),
        }
    }
}

impl Default for TerminalDecorations {
    fn default() -> Self {
        Self::new()
    }
}

impl Decorations for TerminalDecorations {
    type Handle = DecorationId;

    fn decorate(
        &mut self,
        path: &Path,
        buffer: &dyn TextBuffer,
        ranges: &[LineRange],
    ) -> Result<DecorationId> {
        let mut lines = ranges
            .iter()
            .flat_map(|range| range.start.line..=range.end.line)
            .collect::<Vec<_>>();
        lines.sort_unstable();
        lines.dedup();

        let mut out = std::io::stdout().lock();
        let write_err = LogbossError::Render;
        writeln!(out, "{}", path.display()).map_err(write_err)?;
        for index in lines {
            let Some(text) = buffer.line(index) else {
                continue;
            };
            let rendered = format!("{:>5} | {}", index + 1, text);
            if self.styled {
                writeln!(out, "{}", rendered.on_dark_grey()).map_err(write_err)?;
            } else {
                writeln!(out, "{}", rendered).map_err(write_err)?;
            }
        }

        self.next_id += 1;
        Ok(DecorationId(self.next_id))
    }

    fn dispose(&mut self, handle: DecorationId) {
        debug!("decoration {:?} disposed", handle);
    }
}
