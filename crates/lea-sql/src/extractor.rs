//! View dependency extraction from SQL AST
//!
//! Table references are normalized into [`ViewRef`]s with the following
//! precedence:
//!
//! 1. A bare name containing `__` is split on its first `__` into
//!    `(schema, name)`, whatever qualifier the reference was written with.
//! 2. A qualified reference `a.b` (or `a.b.c`) becomes `(a, <last part>)`.
//! 3. Anything else is unqualified.
//!
//! Unqualified references naming a CTE declared anywhere in the query are
//! dropped, since those are local bindings and not views. Table-valued
//! function calls such as `read_csv_auto('x.csv')` are not views either;
//! relations inside their arguments still count.

use std::collections::{BTreeSet, HashSet};
use std::ops::ControlFlow;

use sqlparser::ast::{ObjectName, Query, Statement, TableFactor, Visit, Visitor};

use crate::error::SqlResult;
use crate::parser::SqlParser;
use crate::view_ref::ViewRef;

/// Separator encoding a schema inside a table name (`core__orders`)
pub const SCHEMA_SEPARATOR: &str = "__";

/// Collects CTE aliases and relation references in one AST walk
#[derive(Default)]
struct RelationCollector {
    cte_names: HashSet<String>,
    relations: Vec<ViewRef>,
    // Set when the next visited relation is a table function's name
    skip_function_name: bool,
}

impl Visitor for RelationCollector {
    type Break = ();

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<Self::Break> {
        if let Some(with) = &query.with {
            for cte in &with.cte_tables {
                self.cte_names.insert(cte.alias.name.value.clone());
            }
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_table_factor(&mut self, factor: &TableFactor) -> ControlFlow<Self::Break> {
        if let TableFactor::Table { args: Some(_), .. } = factor {
            self.skip_function_name = true;
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_relation(&mut self, relation: &ObjectName) -> ControlFlow<Self::Break> {
        if std::mem::take(&mut self.skip_function_name) {
            return ControlFlow::Continue(());
        }
        if let Some(view_ref) = view_ref_from_object_name(relation) {
            self.relations.push(view_ref);
        }
        ControlFlow::Continue(())
    }
}

/// Extract the views read by a list of statements
pub fn extract_dependencies(statements: &[Statement]) -> BTreeSet<ViewRef> {
    let mut collector = RelationCollector::default();
    for stmt in statements {
        let _ = stmt.visit(&mut collector);
    }

    let RelationCollector {
        cte_names,
        relations,
        ..
    } = collector;

    relations
        .into_iter()
        .filter(|r| !(r.schema.is_none() && cte_names.contains(&r.name)))
        .collect()
}

/// Parse query text and extract the views it reads
pub fn parse_dependencies(parser: &SqlParser, sql: &str) -> SqlResult<BTreeSet<ViewRef>> {
    let statements = parser.parse(sql)?;
    Ok(extract_dependencies(&statements))
}

/// Normalize a relation name into a [`ViewRef`].
///
/// Returns `None` for names without any plain identifier part.
pub fn view_ref_from_object_name(name: &ObjectName) -> Option<ViewRef> {
    let parts: Vec<&str> = name
        .0
        .iter()
        .filter_map(|p| p.as_ident())
        .map(|ident| ident.value.as_str())
        .collect();

    let bare = *parts.last()?;
    if let Some((schema, view)) = bare.split_once(SCHEMA_SEPARATOR) {
        return Some(ViewRef::qualified(schema, view));
    }

    match parts.as_slice() {
        [qualifier, .., _] => Some(ViewRef::qualified(*qualifier, bare)),
        _ => Some(ViewRef::unqualified(bare)),
    }
}

#[cfg(test)]
#[path = "extractor_test.rs"]
mod tests;
