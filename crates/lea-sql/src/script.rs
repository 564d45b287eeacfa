//! SQL discovery inside Python scripts
//!
//! A scripted view runs SQL through a handful of well-known call shapes:
//!
//! - `pd.read_gbq("SELECT ...")`: a remote-query member on a fixed receiver
//! - `con.query("SELECT ...")`, `client.query_df("...")`: any member whose
//!   name starts with the query prefix
//!
//! The first positional argument of each recognized call is parsed as SQL
//! when it is a string literal. Arguments built at runtime (names, f-strings,
//! concatenation with variables) cannot be analyzed and contribute nothing.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Parser};

use crate::error::{SqlError, SqlResult};
use crate::extractor::parse_dependencies;
use crate::parser::SqlParser;
use crate::view_ref::ViewRef;

/// Call shapes that mark a call as running SQL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptCallShapes {
    /// Receiver of the remote-query call (`pd` in `pd.read_gbq`)
    #[serde(default = "default_remote_query_receiver")]
    pub remote_query_receiver: String,

    /// Member of the remote-query call (`read_gbq` in `pd.read_gbq`)
    #[serde(default = "default_remote_query_member")]
    pub remote_query_member: String,

    /// Prefix of member names that run a query on any receiver
    #[serde(default = "default_query_member_prefix")]
    pub query_member_prefix: String,
}

fn default_remote_query_receiver() -> String {
    "pd".to_string()
}

fn default_remote_query_member() -> String {
    "read_gbq".to_string()
}

fn default_query_member_prefix() -> String {
    "query".to_string()
}

impl Default for ScriptCallShapes {
    fn default() -> Self {
        Self {
            remote_query_receiver: default_remote_query_receiver(),
            remote_query_member: default_remote_query_member(),
            query_member_prefix: default_query_member_prefix(),
        }
    }
}

/// Which recognized shape a call expression has
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallShape {
    RemoteQuery,
    QueryMember,
}

/// First positional argument of a recognized call
#[derive(Debug, PartialEq, Eq)]
enum QueryArgument {
    Literal(String),
    Dynamic,
    Missing,
}

/// Return the SQL literals passed to recognized calls, in source order.
///
/// Fails only when the script itself is not valid Python.
pub fn extract_script_queries(source: &str, shapes: &ScriptCallShapes) -> SqlResult<Vec<String>> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| SqlError::ScriptParse {
            message: e.to_string(),
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| SqlError::ScriptParse {
            message: "parser produced no syntax tree".to_string(),
        })?;

    let root = tree.root_node();
    if root.has_error() {
        let (line, column) = first_error_position(root).unwrap_or((0, 0));
        return Err(SqlError::ScriptParse {
            message: format!("invalid syntax at line {line}, column {column}"),
        });
    }

    let mut calls = Vec::new();
    collect_calls(root, &mut calls);

    let src = source.as_bytes();
    let mut queries = Vec::new();
    for call in calls {
        if match_call_shape(call, src, shapes).is_none() {
            continue;
        }
        match first_positional_argument(call, src) {
            QueryArgument::Literal(sql) => queries.push(sql),
            QueryArgument::Dynamic => log::debug!(
                "Skipping non-literal query argument at line {}",
                call.start_position().row + 1
            ),
            QueryArgument::Missing => {}
        }
    }

    Ok(queries)
}

/// Parse every SQL literal found in a script and union their dependencies
pub fn extract_script_dependencies(
    parser: &SqlParser,
    source: &str,
    shapes: &ScriptCallShapes,
) -> SqlResult<BTreeSet<ViewRef>> {
    let mut deps = BTreeSet::new();
    for sql in extract_script_queries(source, shapes)? {
        deps.extend(parse_dependencies(parser, &sql)?);
    }
    Ok(deps)
}

fn collect_calls<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    if node.kind() == "call" {
        out.push(node);
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_calls(child, out);
    }
}

fn first_error_position(node: Node<'_>) -> Option<(usize, usize)> {
    if node.is_error() || node.is_missing() {
        let pos = node.start_position();
        return Some((pos.row + 1, pos.column + 1));
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error() || c.is_missing())
        .find_map(first_error_position)
}

fn node_text<'s>(node: Node<'_>, src: &'s [u8]) -> Option<&'s str> {
    node.utf8_text(src).ok()
}

fn match_call_shape(call: Node<'_>, src: &[u8], shapes: &ScriptCallShapes) -> Option<CallShape> {
    let function = call.child_by_field_name("function")?;
    if function.kind() != "attribute" {
        return None;
    }
    let receiver = function.child_by_field_name("object")?;
    let member = node_text(function.child_by_field_name("attribute")?, src)?;

    if receiver.kind() == "identifier"
        && node_text(receiver, src) == Some(shapes.remote_query_receiver.as_str())
        && member == shapes.remote_query_member
    {
        return Some(CallShape::RemoteQuery);
    }
    if member.starts_with(&shapes.query_member_prefix) {
        return Some(CallShape::QueryMember);
    }
    None
}

fn first_positional_argument(call: Node<'_>, src: &[u8]) -> QueryArgument {
    let Some(args) = call.child_by_field_name("arguments") else {
        return QueryArgument::Missing;
    };
    if args.kind() != "argument_list" {
        return QueryArgument::Dynamic;
    }

    let mut cursor = args.walk();
    let first = args.named_children(&mut cursor).find(|n| {
        !matches!(
            n.kind(),
            "keyword_argument" | "dictionary_splat" | "comment"
        )
    });

    match first {
        None => QueryArgument::Missing,
        Some(arg) => match string_literal(arg, src) {
            Some(sql) => QueryArgument::Literal(sql),
            None => QueryArgument::Dynamic,
        },
    }
}

/// Value of a string literal expression, or `None` if it is not a constant string
fn string_literal(node: Node<'_>, src: &[u8]) -> Option<String> {
    match node.kind() {
        "string" => plain_string_value(node, src),
        "concatenated_string" => {
            let mut cursor = node.walk();
            let parts: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
            let mut value = String::new();
            for part in parts {
                value.push_str(&plain_string_value(part, src)?);
            }
            Some(value)
        }
        "parenthesized_expression" => {
            let mut cursor = node.walk();
            let mut inner = node
                .named_children(&mut cursor)
                .filter(|n| n.kind() != "comment");
            match (inner.next(), inner.next()) {
                (Some(only), None) => string_literal(only, src),
                _ => None,
            }
        }
        _ => None,
    }
}

fn plain_string_value(node: Node<'_>, src: &[u8]) -> Option<String> {
    if node.kind() != "string" || node.child_count() < 2 {
        return None;
    }
    let start = node.child(0)?;
    let end = node.child(node.child_count() - 1)?;
    if start.kind() != "string_start" || end.kind() != "string_end" {
        return None;
    }

    let prefix = node_text(start, src)?
        .trim_end_matches(['"', '\''])
        .to_ascii_lowercase();
    // f-strings, t-strings and bytes are not constant SQL text
    if prefix.contains(['f', 't', 'b']) {
        return None;
    }

    let body = std::str::from_utf8(src.get(start.end_byte()..end.start_byte())?).ok()?;
    if prefix.contains('r') {
        Some(body.to_string())
    } else {
        Some(unescape(body))
    }
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('\n') => {}
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
