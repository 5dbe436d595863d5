use crate::grammar::{CommentGrammar, normalize};
use crate::parser::Comment;
use crate::statement::Statement;
use log::debug;

/// Adjacent comments that may still turn into one commented-out call.
struct CommentGroup<'a> {
    comments: Vec<&'a Comment>,
    is_open: bool,
}

impl<'a> CommentGroup<'a> {
    fn closed() -> Self {
        Self {
            comments: Vec::new(),
            is_open: false,
        }
    }

    fn open(&mut self, seed: &'a Comment) {
        self.comments.clear();
        self.comments.push(seed);
        self.is_open = true;
    }

    fn discard(&mut self) {
        self.comments.clear();
        self.is_open = false;
    }

    fn accepts(&self, comment: &Comment) -> bool {
        self.is_open
            && self.comments.last().is_some_and(|previous| {
                CommentGrammar::is_continuation_line(&previous.location, &comment.location)
            })
    }

    fn text(&self) -> String {
        self.comments
            .iter()
            .map(|comment| normalize(comment.value()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn statement(&self) -> Option<Statement> {
        let first = self.comments.first()?;
        let last = self.comments.last()?;
        Some(Statement::ghost(first.location.through(&last.location)))
    }
}

/// Finds console calls preserved in comments. `comments` must be in
/// ascending source order.
pub fn group_comments(comments: &[Comment], grammar: &CommentGrammar) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut group = CommentGroup::closed();

    for comment in comments {
        let text = normalize(comment.value());

        if grammar.is_complete_statement(&text) {
            group.discard();
            debug!("ghost statement at line {}", comment.location.start_line);
            statements.push(Statement::ghost(comment.location));
            continue;
        }

        if grammar.is_start_line(&text) {
            group.open(comment);
            continue;
        }

        if !group.accepts(comment) {
            // Rules above already rejected this comment on its own.
            group.discard();
            continue;
        }

        group.comments.push(comment);
        if grammar.is_complete_statement(&group.text()) {
            if let Some(statement) = group.statement() {
                debug!(
                    "ghost statement spanning lines {}-{}",
                    statement.location.start_line, statement.location.end_line
                );
                statements.push(statement);
            }
            group.discard();
        }
    }

    statements
}
