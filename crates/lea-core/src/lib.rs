//! lea-core - Core library for lea
//!
//! This crate turns a directory of SQL and Python files into typed views.
//! Each view knows its `(schema, name)` identity from its location and, on
//! demand, the set of other views it reads from.
//!
//! ```text
//! views/
//!   staging/customers.sql   -> staging.customers
//!   analytics/kpis/daily.sql -> analytics.kpis__daily
//! ```

pub mod config;
pub mod error;
pub mod identity;
pub mod loader;
pub mod overrides;
pub mod view;

pub use config::{Config, Dialect};
pub use error::{CoreError, CoreResult};
pub use identity::{resolve_identity, ViewKey};
pub use lea_sql::{ScriptCallShapes, ViewRef};
pub use loader::{load_views, LoadedViews};
pub use overrides::OverrideTable;
pub use view::{InlineSqlView, ScriptView, SqlView, View, ViewKind, ViewTree};
