//! # oxide-morm-core
//!
//! Compiles record types into SQL schema definitions and literal SQL
//! statements.
//!
//! This crate provides:
//! - Record descriptors built once per type, with per-field annotations
//! - Column name collision resolution for flattened records
//! - Value serialization into SQL literals, including temporal encodings
//! - SQLite and SQL Server dialect profiles
//! - A filter builder rendering `WHERE` clauses
//!
//! Types are usually described with `#[derive(Record)]` from the
//! `oxide-morm` crate. Descriptors can also be built by hand:
//!
//! ```rust
//! use oxide_morm_core::{Compiler, Engine, FieldKind, RecordType, ScalarKind, Value};
//!
//! let user = RecordType::builder("User")
//!     .field("Id", FieldKind::Scalar(ScalarKind::Text), "id text PRIMARY KEY")
//!     .field("Name", FieldKind::Scalar(ScalarKind::Text), "")
//!     .build()
//!     .unwrap();
//!
//! let compiler = Compiler::new(Engine::Sqlite).unwrap();
//! assert_eq!(
//!     compiler.create_table(&user, None).unwrap(),
//!     vec!["CREATE TABLE IF NOT EXISTS users (id text PRIMARY KEY, name text)"]
//! );
//!
//! let values = [Value::Text("00".into()), Value::Text("Richard".into())];
//! assert_eq!(
//!     compiler.insert(&user, &values, None).unwrap(),
//!     vec!["insert into users(id, name)\nvalues ('00', 'Richard')"]
//! );
//! ```
//!
//! Statements are plain strings with literal values inlined; nothing here
//! talks to a database.

pub mod compiler;
pub mod dialect;
pub mod directive;
pub mod error;
pub mod filter;
pub mod record;
pub mod serialize;
pub mod tracker;
pub mod value;

pub use compiler::{Compiler, SelectTarget};
pub use dialect::{Dialect, Engine};
pub use directive::FieldDirective;
pub use error::{Error, Result};
pub use filter::{Comparison, Filter, FilterGroup};
pub use record::{FieldKind, Record, RecordType, ScalarKind};
pub use tracker::NameTracker;
pub use value::{FieldType, Value};
