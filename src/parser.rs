use crate::error::{LogbossError, Result};
use crate::language::Language;
use crate::statement::SourceLocation;
use log::debug;
use tree_sitter::{Node, Parser, Tree};

/// A comment token exactly as it appears in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub raw: String,
    pub location: SourceLocation,
}

impl Comment {
    /// Comment body without its `//` or `/* */` delimiters.
    pub fn value(&self) -> &str {
        if let Some(body) = self.raw.strip_prefix("//") {
            return body;
        }
        if let Some(body) = self.raw.strip_prefix("/*") {
            return body.strip_suffix("*/").unwrap_or(body);
        }
        &self.raw
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Identifier the callee is a member of (`console` in `console.log()`).
    pub object: Option<String>,
    /// Property name of a member callee (`log` in `console.log()`).
    pub member: Option<String>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedSource {
    pub calls: Vec<CallSite>,
    /// Ascending source order.
    pub comments: Vec<Comment>,
}

pub fn parse(content: &str, language: Language) -> Result<ParsedSource> {
    debug!("parse start (lang={:?}, bytes={})", language, content.len());
    let mut parser = Parser::new();
    parser
        .set_language(&language.grammar())
        .map_err(|err| LogbossError::parse(format!("grammar unavailable: {}", err)))?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| LogbossError::parse("parser produced no tree"))?;

    if tree.root_node().has_error() {
        return Err(LogbossError::parse(describe_error(&tree)));
    }

    let source = content.as_bytes();
    let mut parsed = ParsedSource::default();
    walk(&tree, |node| match node.kind() {
        "comment" => {
            if let Ok(raw) = node.utf8_text(source) {
                parsed.comments.push(Comment {
                    raw: raw.to_string(),
                    location: location_of(&node),
                });
            }
        }
        "call_expression" => parsed.calls.push(call_site(&node, source)),
        _ => {}
    });

    debug!(
        "parse done (calls={}, comments={})",
        parsed.calls.len(),
        parsed.comments.len()
    );
    Ok(parsed)
}

fn call_site(node: &Node<'_>, source: &[u8]) -> CallSite {
    let text = |node: Node<'_>| node.utf8_text(source).ok().map(str::to_string);
    let callee = node.child_by_field_name("function");

    let (object, member) = match callee {
        Some(callee) if matches!(callee.kind(), "member_expression" | "subscript_expression") => {
            let object = callee
                .child_by_field_name("object")
                .filter(|object| object.kind() == "identifier")
                .and_then(text);
            let member = if callee.kind() == "member_expression" {
                callee.child_by_field_name("property").and_then(text)
            } else {
                callee
                    .child_by_field_name("index")
                    .and_then(text)
                    .map(|index| computed_member(&index))
            };
            (object, member)
        }
        _ => (None, None),
    };

    CallSite {
        object,
        member,
        location: location_of(node),
    }
}

/// `console["log"]` and `console['log']` name the `log` member; any other
/// index expression is kept as written.
fn computed_member(index: &str) -> String {
    for quote in ['"', '\'', '`'] {
        if let Some(inner) = index
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.to_string();
        }
    }
    index.to_string()
}

fn location_of(node: &Node<'_>) -> SourceLocation {
    let start = node.start_position();
    let end = node.end_position();
    SourceLocation::new(start.row + 1, start.column, end.row + 1, end.column)
}

/// Pre-order walk, which visits nodes (and therefore comments) in source order.
fn walk<F>(tree: &Tree, mut visit: F)
where
    F: FnMut(Node<'_>),
{
    let mut cursor = tree.walk();
    loop {
        visit(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

fn describe_error(tree: &Tree) -> String {
    let mut first = None;
    walk(tree, |node| {
        if first.is_none() && (node.is_error() || node.is_missing()) {
            let point = node.start_position();
            first = Some((point.row + 1, point.column + 1, node.is_missing()));
        }
    });

    match first {
        Some((line, column, true)) => format!("missing token at line {}, column {}", line, column),
        Some((line, column, false)) => {
            format!("unexpected input at line {}, column {}", line, column)
        }
        None => "unparseable input".to_string(),
    }
}
