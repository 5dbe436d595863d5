use crate::document::TextBuffer;
use crate::state::FileToggleState;
use crate::statement::{EditOp, LineRange, Position, Statement, StatementKind};
use log::debug;
use std::cmp::Reverse;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Highlight,
    Comment,
    Uncomment,
    /// Comment or uncomment, decided once from the file's `is_commented` flag.
    Toggle,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Edits(Vec<EditOp>),
    Decorations(Vec<LineRange>),
}

impl Plan {
    pub fn len(&self) -> usize {
        match self {
            Plan::Edits(ops) => ops.len(),
            Plan::Decorations(ranges) => ranges.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_edits(self) -> Vec<EditOp> {
        match self {
            Plan::Edits(ops) => ops,
            Plan::Decorations(_) => Vec::new(),
        }
    }

    pub fn into_decorations(self) -> Vec<LineRange> {
        match self {
            Plan::Decorations(ranges) => ranges,
            Plan::Edits(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineDirection {
    Comment,
    Uncomment,
}

/// Turns located statements into ops against the text they were located in.
///
/// Statements are visited by descending start line and every op stays inside
/// its own statement's lines, so applying the batch highest-first never
/// shifts a line that another pending op still points at.
pub fn plan<B>(buffer: &B, statements: &[Statement], mode: Mode, state: &FileToggleState) -> Plan
where
    B: TextBuffer + ?Sized,
{
    let ordered = descending(statements);
    let plan = match mode {
        Mode::Highlight => Plan::Decorations(
            ordered
                .iter()
                .map(|statement| {
                    let (first, last) = statement.location.buffer_lines();
                    LineRange::lines(first, last)
                })
                .collect(),
        ),
        Mode::Comment => Plan::Edits(line_edits(buffer, &ordered, LineDirection::Comment)),
        Mode::Uncomment => Plan::Edits(line_edits(buffer, &ordered, LineDirection::Uncomment)),
        Mode::Toggle => {
            let direction = if state.is_commented {
                LineDirection::Uncomment
            } else {
                LineDirection::Comment
            };
            Plan::Edits(line_edits(buffer, &ordered, direction))
        }
        Mode::Delete => Plan::Edits(delete_edits(buffer, &ordered)),
    };
    debug!(
        "planned {} op(s) for {} statement(s) in {:?} mode",
        plan.len(),
        statements.len(),
        mode
    );
    plan
}

fn descending(statements: &[Statement]) -> Vec<&Statement> {
    let mut ordered = statements.iter().collect::<Vec<_>>();
    ordered.sort_by_key(|statement| Reverse(statement.location.start_line));
    ordered
}

pub fn is_line_commented(line: &str) -> bool {
    line.trim_start().starts_with("//")
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

pub fn comment_line(line: &str) -> String {
    let indent = indentation(line);
    format!("{}//{}", &line[..indent], &line[indent..])
}

/// Removes one `//` and at most one space after it, keeping the indentation.
pub fn uncomment_line(line: &str) -> String {
    let indent = indentation(line);
    let body = &line[indent..];
    let body = body.strip_prefix("//").unwrap_or(body);
    let body = body.strip_prefix(' ').unwrap_or(body);
    format!("{}{}", &line[..indent], body)
}

fn line_edits<B>(buffer: &B, ordered: &[&Statement], direction: LineDirection) -> Vec<EditOp>
where
    B: TextBuffer + ?Sized,
{
    let mut touched = HashSet::new();
    let mut ops = Vec::new();

    for statement in ordered {
        let (first, last) = statement.location.buffer_lines();
        for index in (first..=last).rev() {
            if !touched.insert(index) {
                continue;
            }
            let Some(line) = buffer.line(index) else {
                continue;
            };
            let replacement = match direction {
                LineDirection::Comment if !is_line_commented(line) => comment_line(line),
                LineDirection::Uncomment if is_line_commented(line) => uncomment_line(line),
                _ => continue,
            };
            ops.push(EditOp::replace(LineRange::lines(index, index), replacement));
        }
    }

    ops.sort_by_key(|op| Reverse(op.range.start));
    ops
}

fn delete_edits<B>(buffer: &B, ordered: &[&Statement]) -> Vec<EditOp>
where
    B: TextBuffer + ?Sized,
{
    let mut spans: Vec<(usize, usize)> = Vec::new();

    for statement in ordered {
        let (first, last) = statement.location.buffer_lines();
        if statement.kind == StatementKind::Live {
            let starts_line = buffer
                .line(first)
                .is_some_and(|line| line.trim().starts_with("console."));
            if !starts_line {
                debug!(
                    "skipping delete of embedded call on line {}",
                    statement.location.start_line
                );
                continue;
            }
        }

        // Spans arrive by descending start; fold overlaps into the previous one.
        match spans.last_mut() {
            Some(previous) if last >= previous.0 => {
                previous.0 = first;
                previous.1 = previous.1.max(last);
            }
            _ => spans.push((first, last)),
        }
    }

    spans
        .into_iter()
        .map(|(first, last)| {
            EditOp::delete(LineRange::new(
                Position::line_start(first),
                Position::line_start(last + 1),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::language::Language;
    use crate::locator::locate;
    use crate::statement::SourceLocation;

    fn run(content: &str, mode: Mode, state: &FileToggleState) -> String {
        let mut doc = Document::from_text(content);
        let statements = locate(content, Language::JavaScript).unwrap();
        let ops = plan(&doc, &statements, mode, state).into_edits();
        doc.apply(&ops).unwrap();
        doc.text().to_string()
    }

    fn apply(content: &str, mode: Mode) -> String {
        run(content, mode, &FileToggleState::default())
    }

    #[test]
    fn delete_drops_whole_lines() {
        assert_eq!(
            apply("foo();\nconsole.log(\"x\");\nbar();", Mode::Delete),
            "foo();\nbar();"
        );
    }

    #[test]
    fn delete_keeps_statements_embedded_in_other_code() {
        let content = "if (x) console.log(x);\nconsole.warn(y);\n";
        assert_eq!(apply(content, Mode::Delete), "if (x) console.log(x);\n");
    }

    #[test]
    fn delete_removes_multi_line_ghost_and_live_calls() {
        let content = "a();\n// console.log(\n//   1\n// );\nconsole.info(\n  2\n);\nb();\n";
        assert_eq!(apply(content, Mode::Delete), "a();\nb();\n");
    }

    #[test]
    fn batch_delete_targets_original_lines() {
        let content = [
            "line1();",
            "console.log(2);",
            "line3();",
            "line4();",
            "console.log(5);",
            "line6();",
            "line7();",
            "line8();",
            "console.log(9);",
            "line10();",
        ]
        .join("\n");
        let result = apply(&content, Mode::Delete);
        let remaining = result.lines().collect::<Vec<_>>();
        assert_eq!(
            remaining,
            vec![
                "line1();", "line3();", "line4();", "line6();", "line7();", "line8();",
                "line10();"
            ]
        );
    }

    #[test]
    fn delete_ops_are_descending_and_disjoint() {
        let statements = vec![
            Statement::ghost(SourceLocation::new(2, 0, 2, 10)),
            Statement::ghost(SourceLocation::new(9, 0, 9, 10)),
            Statement::ghost(SourceLocation::new(5, 0, 6, 10)),
            Statement::ghost(SourceLocation::new(6, 0, 6, 10)),
        ];
        let doc = Document::from_text("x\n".repeat(10));
        let ops = plan(&doc, &statements, Mode::Delete, &FileToggleState::default()).into_edits();
        let starts = ops.iter().map(|op| op.range.start.line).collect::<Vec<_>>();
        let ends = ops.iter().map(|op| op.range.end.line).collect::<Vec<_>>();
        assert_eq!(starts, vec![8, 4, 1]);
        assert_eq!(ends, vec![9, 6, 2]);
    }

    #[test]
    fn comment_inserts_after_indentation() {
        let content = "function f() {\n    console.log(\n      1\n    );\n}\n";
        assert_eq!(
            apply(content, Mode::Comment),
            "function f() {\n    //console.log(\n      //1\n    //);\n}\n"
        );
    }

    #[test]
    fn comment_is_idempotent() {
        let content = "a();\nconsole.log(1);\n  console.error(\n    2\n  );\n";
        let once = apply(content, Mode::Comment);
        let twice = apply(&once, Mode::Comment);
        assert_eq!(once, twice);
    }

    #[test]
    fn comment_then_uncomment_round_trips() {
        let content = "a();\n\tconsole.log(1);\n  console.error(\n    { x: 1 }\n  );\nb();\n";
        let commented = apply(content, Mode::Comment);
        assert_ne!(commented, content);
        assert_eq!(apply(&commented, Mode::Uncomment), content);
    }

    #[test]
    fn uncomment_strips_one_marker_and_one_space() {
        assert_eq!(uncomment_line("  //  console.log(1)"), "   console.log(1)");
        assert_eq!(uncomment_line("// console.log(1)"), "console.log(1)");
        assert_eq!(uncomment_line("\t////x"), "\t//x");
    }

    #[test]
    fn uncomment_skips_live_lines() {
        let content = "console.log(1);\n// console.warn(2);\n";
        assert_eq!(
            apply(content, Mode::Uncomment),
            "console.log(1);\nconsole.warn(2);\n"
        );
    }

    #[test]
    fn shared_lines_get_one_op() {
        let content = "console.log(1); console.log(2);\n";
        assert_eq!(
            apply(content, Mode::Comment),
            "//console.log(1); console.log(2);\n"
        );
    }

    #[test]
    fn trailing_ghost_comment_edits_whole_line() {
        // Line granularity: the code before the comment goes with it.
        let content = "a();\nfoo(); // console.log(x)\nb();\n";
        assert_eq!(
            apply(content, Mode::Comment),
            "a();\n//foo(); // console.log(x)\nb();\n"
        );
        assert_eq!(apply(content, Mode::Delete), "a();\nb();\n");
    }

    #[test]
    fn toggle_direction_comes_from_state() {
        let content = "console.log(1);\n";
        let commented = run(content, Mode::Toggle, &FileToggleState::default());
        assert_eq!(commented, "//console.log(1);\n");

        let state = FileToggleState {
            is_commented: true,
            ..FileToggleState::default()
        };
        assert_eq!(run(&commented, Mode::Toggle, &state), content);
    }

    #[test]
    fn highlight_covers_full_lines() {
        let content = "a();\nconsole.log(\n  1\n);\n";
        let doc = Document::from_text(content);
        let statements = locate(content, Language::JavaScript).unwrap();
        let ranges = plan(&doc, &statements, Mode::Highlight, &FileToggleState::default())
            .into_decorations();
        assert_eq!(ranges, vec![LineRange::lines(1, 3)]);
    }
}
