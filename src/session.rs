use crate::document::{Document, TextBuffer};
use crate::error::{LogbossError, Result};
use crate::highlight::{Decorations, HighlightController, HighlightState};
use crate::locator::Locator;
use crate::planner::{self, Mode};
use crate::state::{FileToggleState, StateStore, StateUpdate, normalize_path};
use log::{info, warn};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Highlight,
    RemoveHighlight,
    ToggleHighlight,
    Comment,
    Uncomment,
    RemoveLogs,
    ToggleComments,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Highlight => "highlight",
            Command::RemoveHighlight => "remove-highlight",
            Command::ToggleHighlight => "toggle-highlight",
            Command::Comment => "comment",
            Command::Uncomment => "uncomment",
            Command::RemoveLogs => "remove-logs",
            Command::ToggleComments => "toggle-comments",
        }
    }

    fn edit_mode(&self) -> Option<Mode> {
        match self {
            Command::Comment => Some(Mode::Comment),
            Command::Uncomment => Some(Mode::Uncomment),
            Command::RemoveLogs => Some(Mode::Delete),
            Command::ToggleComments => Some(Mode::Toggle),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub statements: usize,
    pub edits: usize,
    pub state: FileToggleState,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: Vec<FileOutcome>,
    pub failed: Vec<(PathBuf, LogbossError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs commands one file at a time against a state store and a
/// decoration surface.
pub struct Session<S: StateStore, D: Decorations> {
    locator: Locator,
    store: S,
    highlights: HighlightController<D>,
}

impl<S: StateStore, D: Decorations> Session<S, D> {
    pub fn new(locator: Locator, store: S, decorations: D) -> Self {
        Self {
            locator,
            store,
            highlights: HighlightController::new(decorations),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn highlights(&self) -> &HighlightController<D> {
        &self.highlights
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn active_file(&self) -> Option<PathBuf> {
        self.store.active_file()
    }

    /// Switches the active file and reconciles its highlight with the
    /// file's own persisted flag.
    pub fn activate(&mut self, path: &Path) -> Result<HighlightState> {
        let path = normalize_path(path);
        let document = Document::open(&path)?;
        self.store.set_active_file(Some(&path))?;
        info!("active file: {}", path.display());
        self.highlights.activate(
            &path,
            &document,
            document.language(),
            &self.locator,
            &mut self.store,
        )
    }

    /// Resolves the files a command applies to: the explicit selection, or
    /// the active file when nothing was selected.
    pub fn targets(&self, selection: Option<Vec<PathBuf>>) -> Result<Vec<PathBuf>> {
        match selection {
            Some(files) => Ok(files),
            None => self
                .store
                .active_file()
                .map(|path| vec![path])
                .ok_or(LogbossError::NoActiveTarget),
        }
    }

    /// Processes `files` strictly in order. A failing file is recorded and
    /// skipped; files already processed keep their changes.
    pub fn execute(&mut self, command: Command, files: &[PathBuf]) -> BatchReport {
        let mut report = BatchReport::default();
        if files.is_empty() {
            info!("{}: nothing selected", command);
            return report;
        }

        info!("{} start (files={})", command, files.len());
        for path in files {
            let path = normalize_path(path);
            match self.run_file(command, &path) {
                Ok(outcome) => report.processed.push(outcome),
                Err(err) => {
                    warn!("{} failed for {}: {}", command, path.display(), err);
                    report.failed.push((path, err));
                }
            }
        }
        info!(
            "{} done (processed={}, failed={})",
            command,
            report.processed.len(),
            report.failed.len()
        );
        report
    }

    fn run_file(&mut self, command: Command, path: &Path) -> Result<FileOutcome> {
        if command == Command::RemoveHighlight {
            self.highlights.remove(path, &mut self.store)?;
            return Ok(FileOutcome {
                path: path.to_path_buf(),
                statements: 0,
                edits: 0,
                state: self.store.get(path),
            });
        }

        let mut document = Document::open(path)?;

        let Some(mode) = command.edit_mode() else {
            let language = document.language();
            let statements = match command {
                Command::ToggleHighlight => {
                    let state = self.highlights.toggle(
                        path,
                        &document,
                        language,
                        &self.locator,
                        &mut self.store,
                    )?;
                    match state {
                        HighlightState::Highlighted => self.count(&document, path)?,
                        HighlightState::Unhighlighted => 0,
                    }
                }
                _ => self.highlights.highlight(
                    path,
                    &document,
                    language,
                    &self.locator,
                    &mut self.store,
                )?,
            };
            return Ok(FileOutcome {
                path: path.to_path_buf(),
                statements,
                edits: 0,
                state: self.store.get(path),
            });
        };

        self.edit(path, &mut document, mode)
    }

    fn edit(&mut self, path: &Path, document: &mut Document, mode: Mode) -> Result<FileOutcome> {
        let statements = self
            .locator
            .locate(document.text(), document.language())
            .map_err(|err| err.in_file(path))?;
        let before = self.store.get(path);
        let ops = planner::plan(&*document, &statements, mode, &before).into_edits();

        document.apply(&ops)?;
        document.save()?;

        // Only reached once the batch is applied and on disk.
        let update = match mode {
            Mode::Comment => StateUpdate::commented(true),
            Mode::Uncomment | Mode::Delete => StateUpdate::commented(false),
            Mode::Toggle => StateUpdate::commented(!before.is_commented),
            Mode::Highlight => StateUpdate::default(),
        };
        let state = self.store.set(path, update)?;
        info!(
            "{:?}: {} statement(s), {} edit(s) in {}",
            mode,
            statements.len(),
            ops.len(),
            path.display()
        );

        Ok(FileOutcome {
            path: path.to_path_buf(),
            statements: statements.len(),
            edits: ops.len(),
            state,
        })
    }

    fn count(&self, document: &Document, path: &Path) -> Result<usize> {
        self.locator
            .locate(document.text(), document.language())
            .map(|statements| statements.len())
            .map_err(|err| err.in_file(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::DetectionPolicy;
    use crate::state::JsonStateStore;
    use crate::statement::LineRange;
    use std::fs;
    use uuid::Uuid;

    #[derive(Default)]
    struct Silent {
        shown: usize,
    }

    impl Decorations for Silent {
        type Handle = ();

        fn decorate(&mut self, _: &Path, _: &dyn TextBuffer, _: &[LineRange]) -> Result<()> {
            self.shown += 1;
            Ok(())
        }

        fn dispose(&mut self, _: ()) {
            self.shown -= 1;
        }
    }

    fn workspace(files: &[(&str, &str)]) -> PathBuf {
        let root = std::env::temp_dir()
            .join("logboss_unit")
            .join(Uuid::new_v4().to_string());
        for (name, content) in files {
            let path = root.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        root
    }

    fn session() -> Session<JsonStateStore, Silent> {
        Session::new(
            Locator::new(DetectionPolicy::default()).unwrap(),
            JsonStateStore::in_memory(),
            Silent::default(),
        )
    }

    #[test]
    fn toggle_state_survives_file_switches() {
        let root = workspace(&[("a.js", "console.log('a');\n"), ("b.js", "b();\n")]);
        let (a, b) = (root.join("a.js"), root.join("b.js"));
        let mut session = session();

        session.activate(&a).unwrap();
        let report = session.execute(Command::Comment, &[a.clone()]);
        assert!(report.is_success());

        session.activate(&b).unwrap();
        assert!(!session.store().get(&b).is_commented);

        session.activate(&a).unwrap();
        assert!(session.store().get(&a).is_commented);
        assert_eq!(session.active_file(), Some(a.clone()));
        assert_eq!(fs::read_to_string(&a).unwrap(), "//console.log('a');\n");
    }

    #[test]
    fn toggle_comments_flips_after_each_successful_pass() {
        let root = workspace(&[("a.js", "x();\n  console.warn(1);\n")]);
        let a = root.join("a.js");
        let mut session = session();

        let first = session.execute(Command::ToggleComments, &[a.clone()]);
        assert!(first.processed[0].state.is_commented);
        assert_eq!(fs::read_to_string(&a).unwrap(), "x();\n  //console.warn(1);\n");

        let second = session.execute(Command::ToggleComments, &[a.clone()]);
        assert!(!second.processed[0].state.is_commented);
        assert_eq!(fs::read_to_string(&a).unwrap(), "x();\n  console.warn(1);\n");
    }

    #[test]
    fn batch_continues_past_failures() {
        let root = workspace(&[
            ("a.js", "console.log(1);\na();\n"),
            ("broken.js", "console.log(\n"),
            ("c.js", "c();\nconsole.log(3);\n"),
        ]);
        let files = vec![
            root.join("a.js"),
            root.join("missing.js"),
            root.join("broken.js"),
            root.join("c.js"),
        ];
        let mut session = session();
        let report = session.execute(Command::RemoveLogs, &files);

        assert_eq!(report.processed.len(), 2);
        assert_eq!(report.failed.len(), 2);
        assert!(matches!(report.failed[0].1, LogbossError::FileAccess { .. }));
        assert!(matches!(report.failed[1].1, LogbossError::Parse { .. }));
        assert_eq!(fs::read_to_string(root.join("a.js")).unwrap(), "a();\n");
        assert_eq!(fs::read_to_string(root.join("broken.js")).unwrap(), "console.log(\n");
        assert_eq!(fs::read_to_string(root.join("c.js")).unwrap(), "c();\n");
        assert!(!session.store().get(&root.join("broken.js")).is_commented);
    }

    #[test]
    fn failed_edit_leaves_state_alone() {
        let root = workspace(&[("a.js", "console.log(1);\n")]);
        let a = root.join("a.js");
        let mut session = session();
        fs::remove_file(&a).unwrap();

        let report = session.execute(Command::ToggleComments, &[a.clone()]);
        assert!(!report.is_success());
        assert_eq!(session.store().get(&a), FileToggleState::default());
    }

    #[test]
    fn missing_active_file_is_no_active_target() {
        let session = session();
        assert!(matches!(
            session.targets(None),
            Err(LogbossError::NoActiveTarget)
        ));
        assert_eq!(session.targets(Some(Vec::new())).unwrap(), Vec::<PathBuf>::new());
    }

    #[test]
    fn empty_batch_has_no_side_effects() {
        let mut session = session();
        let report = session.execute(Command::RemoveLogs, &[]);
        assert!(report.processed.is_empty());
        assert!(report.failed.is_empty());
        assert_eq!(session.active_file(), None);
    }

    #[test]
    fn highlight_commands_track_per_file_flags() {
        let root = workspace(&[("a.js", "console.log(1);\n// console.info(2)\n")]);
        let a = root.join("a.js");
        let mut session = session();

        let report = session.execute(Command::Highlight, &[a.clone()]);
        assert_eq!(report.processed[0].statements, 2);
        assert!(session.store().get(&a).is_highlighted);
        assert_eq!(session.highlights().decorations().shown, 1);

        let report = session.execute(Command::ToggleHighlight, &[a.clone()]);
        assert_eq!(report.processed[0].statements, 0);
        assert!(!session.store().get(&a).is_highlighted);
        assert_eq!(session.highlights().decorations().shown, 0);

        session.execute(Command::ToggleHighlight, &[a.clone()]);
        session.execute(Command::RemoveHighlight, &[a.clone()]);
        assert!(!session.store().get(&a).is_highlighted);
        assert_eq!(session.highlights().decorations().shown, 0);
    }
}
