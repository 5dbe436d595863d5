//! Grammar for console calls written inside comments.
//!
//! Three productions drive the comment grouper:
//! - `start-line`: text opens a call (`console.<method>(`) and may not close it.
//! - `continuation-line`: a comment sits on the line right after the previous
//!   member of the group.
//! - `complete-statement`: text is a whole call with balanced closing `)`,
//!   an optional `;` and an optional trailing line comment.

use crate::statement::SourceLocation;
use regex::Regex;
use std::sync::OnceLock;

static DECORATION: OnceLock<Regex> = OnceLock::new();

fn decoration_regex() -> &'static Regex {
    DECORATION.get_or_init(|| Regex::new(r"(?m)^[\s*]+").expect("valid decoration regex"))
}

/// Strips leading whitespace and `*` decoration from every line of a comment body.
pub fn normalize(value: &str) -> String {
    decoration_regex().replace_all(value, "").into_owned()
}

#[derive(Debug, Clone)]
pub struct CommentGrammar {
    productions: Option<Productions>,
}

#[derive(Debug, Clone)]
struct Productions {
    start_line: Regex,
    complete_statement: Regex,
}

impl CommentGrammar {
    /// Builds the grammar for the given method allow-list. An empty list
    /// recognizes nothing.
    pub fn new(methods: &[String]) -> Result<Self, regex::Error> {
        if methods.is_empty() {
            return Ok(Self { productions: None });
        }

        let alternatives = methods
            .iter()
            .map(|method| regex::escape(method))
            .collect::<Vec<_>>()
            .join("|");
        let prefix = format!(r"^\s*console\.(?:{})\s*\(", alternatives);

        Ok(Self {
            productions: Some(Productions {
                start_line: Regex::new(&prefix)?,
                complete_statement: Regex::new(&format!(
                    r"{}[\s\S]*?\)(?:\s*;?\s*(?://.*)?)?$",
                    prefix
                ))?,
            }),
        })
    }

    pub fn is_start_line(&self, text: &str) -> bool {
        self.productions
            .as_ref()
            .is_some_and(|p| p.start_line.is_match(text))
    }

    pub fn is_complete_statement(&self, text: &str) -> bool {
        self.productions
            .as_ref()
            .is_some_and(|p| p.complete_statement.is_match(text))
    }

    /// Strict adjacency: `next` must begin on the line right after `previous` ends.
    pub fn is_continuation_line(previous: &SourceLocation, next: &SourceLocation) -> bool {
        next.start_line == previous.end_line + 1
    }
}
