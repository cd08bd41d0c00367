//! # oxide-morm
//!
//! Maps Rust structs to SQL tables and runs the generated statements.
//!
//! Structs derive [`Record`]; per-field annotations live under `morm`:
//!
//! ```ignore
//! use oxide_morm::{Client, ClientConfig, Comparison, Engine, Filter, Record};
//!
//! #[derive(Record)]
//! struct Phone {
//!     #[morm("id integer")]
//!     id: i64,
//!     number: String,
//! }
//!
//! #[derive(Record)]
//! #[morm(table = "people")]
//! struct User {
//!     #[morm("id text PRIMARY KEY")]
//!     id: String,
//!     lastname: String,
//!     #[morm(":flatten")]
//!     phone: Phone,
//!     #[morm(":ignore")]
//!     cache: Vec<u8>,
//! }
//!
//! let client = Client::connect(&ClientConfig::new(Engine::Sqlite, "sqlite://app.db"))?;
//! client.create_table::<User>().await?;
//! client.insert(&user).await?;
//!
//! let mut filter = Filter::new();
//! filter.and("id", Comparison::Equal, "00");
//! client.update(&user, Some(&filter), &["lastname"]).await?;
//! ```
//!
//! The generated code refers to `oxide_morm_core`, so crates deriving
//! `Record` depend on it alongside this crate.

pub mod client;
pub mod config;
pub mod error;
pub mod executor;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use executor::{Executor, QueryResult, SqliteExecutor};

pub use oxide_morm_core::{
    Comparison, Compiler, Dialect, Engine, FieldKind, FieldType, Filter, FilterGroup, RecordType,
    ScalarKind, SelectTarget, Value,
};
pub use oxide_morm_core::Error as CompileError;
pub use oxide_morm_core::Record;
pub use oxide_morm_derive::Record;
