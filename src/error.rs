use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the locator, the planner collaborators and the session.
#[derive(Debug, Error)]
pub enum LogbossError {
    #[error("Syntax error in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("No active file")]
    NoActiveTarget,

    #[error("Edit rejected: {0}")]
    EditApplication(String),

    #[error("Cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write decorations: {0}")]
    Render(#[source] std::io::Error),

    #[error("State store error: {0}")]
    State(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl LogbossError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        LogbossError::Parse {
            path: "<buffer>".to_string(),
            message: message.into(),
        }
    }

    /// Attaches the file path to a parse error raised on an anonymous buffer.
    pub fn in_file(self, file: &std::path::Path) -> Self {
        match self {
            LogbossError::Parse { message, .. } => LogbossError::Parse {
                path: file.display().to_string(),
                message,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, LogbossError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn render_failure_keeps_io_source() {
        let source = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let err = LogbossError::Render(source);
        assert_eq!(err.to_string(), "Cannot write decorations: pipe closed");
        assert!(err.source().is_some());
    }

    #[test]
    fn in_file_names_the_parsed_file() {
        let path = std::path::Path::new("/w/a.js");
        let err = LogbossError::parse("unexpected token").in_file(path);
        assert_eq!(err.to_string(), "Syntax error in /w/a.js: unexpected token");
    }
}
