//! Dialect-aware SQL parsing

use crate::error::{SqlError, SqlResult};
use serde::{Deserialize, Serialize};
use sqlparser::ast::Statement;
use sqlparser::dialect::{BigQueryDialect, DuckDbDialect};
use sqlparser::parser::Parser;
use std::fmt;

/// SQL dialect views are written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    DuckDb,
    BigQuery,
}

impl Dialect {
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::DuckDb => "duckdb",
            Dialect::BigQuery => "bigquery",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses view queries in a fixed dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlParser {
    dialect: Dialect,
}

impl SqlParser {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Parse SQL into statements. Blank input is [`SqlError::EmptySql`].
    pub fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(SqlError::EmptySql);
        }

        let parsed = match self.dialect {
            Dialect::DuckDb => Parser::parse_sql(&DuckDbDialect {}, sql),
            Dialect::BigQuery => Parser::parse_sql(&BigQueryDialect {}, sql),
        };
        parsed.map_err(|e| {
            let message = e.to_string();
            let (line, column) = error_location(&message).unwrap_or((0, 0));
            SqlError::ParseError {
                message,
                line,
                column,
            }
        })
    }
}

/// Read `Line: N, Column: M` back out of a sqlparser error message.
fn error_location(message: &str) -> Option<(usize, usize)> {
    let (_, tail) = message.rsplit_once("Line: ")?;
    let (line, tail) = tail.split_once(", Column: ")?;
    let end = tail
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(tail.len());
    Some((line.trim().parse().ok()?, tail[..end].parse().ok()?))
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
