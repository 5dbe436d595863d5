use crate::state::normalize_path;
use log::warn;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const DEFAULT_EXTENSIONS: [&str; 4] = ["js", "ts", "jsx", "tsx"];
pub const DEFAULT_IGNORED_DIRS: [&str; 1] = ["node_modules"];

/// Expands user-chosen files and folders into the source files to process.
#[derive(Debug, Clone)]
pub struct FileSelector {
    extensions: Vec<String>,
    ignored_dirs: Vec<String>,
}

impl Default for FileSelector {
    fn default() -> Self {
        Self::new(
            DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            DEFAULT_IGNORED_DIRS.iter().map(|dir| dir.to_string()).collect(),
        )
    }
}

impl FileSelector {
    pub fn new(extensions: Vec<String>, ignored_dirs: Vec<String>) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        Self {
            extensions,
            ignored_dirs,
        }
    }

    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|allowed| *allowed == ext)
            })
    }

    /// Folders are walked recursively for source files; explicit files are
    /// kept as given. Output is de-duplicated, absolute and in selection order.
    pub fn expand(&self, selected: &[PathBuf]) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for path in selected {
            let path = normalize_path(path);
            if path.is_dir() {
                for file in self.walk(&path) {
                    if seen.insert(file.clone()) {
                        files.push(file);
                    }
                }
            } else if seen.insert(path.clone()) {
                files.push(path);
            }
        }

        files
    }

    /// Every source file under `root`, with `current` (if any) listed first.
    pub fn candidates(&self, root: &Path, current: Option<&Path>) -> Vec<PathBuf> {
        let mut files = self.walk(&normalize_path(root));
        if let Some(current) = current.map(normalize_path)
            && let Some(index) = files.iter().position(|file| *file == current)
        {
            let current = files.remove(index);
            files.insert(0, current);
        }
        files
    }

    fn walk(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let walker = WalkDir::new(root).sort_by_file_name().into_iter();

        for entry in walker.filter_entry(|e| e.depth() == 0 || !self.is_ignored(e)) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };
            if entry.file_type().is_file() && self.is_source_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files
    }

    fn is_ignored(&self, entry: &walkdir::DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.') || self.ignored_dirs.iter().any(|dir| dir.as_str() == name.as_ref())
    }
}
