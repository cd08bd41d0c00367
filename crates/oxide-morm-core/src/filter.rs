//! Filter expressions rendered as `WHERE` clauses.
//!
//! A [`Filter`] is a list of comparisons joined by `and` / `or`, plus nested
//! groups. Groups always attach to the top level with `and`:
//!
//! ```
//! use oxide_morm_core::dialect::SqliteDialect;
//! use oxide_morm_core::filter::{Comparison, Filter};
//!
//! let mut filter = Filter::new();
//! filter
//!     .and("id", Comparison::Equal, 5)
//!     .or("name", Comparison::Equal, "x");
//! filter
//!     .group()
//!     .and("active", Comparison::Equal, 1)
//!     .or("admin", Comparison::Equal, true);
//!
//! let sql = filter.to_sql(&SqliteDialect::new()).unwrap();
//! assert_eq!(sql, "where id=5 or name='x'\nand (active=1 or admin=1)");
//! ```

use std::fmt;

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::serialize::literal;
use crate::value::{FieldType, Value};

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `=`
    Equal,
    /// `<>`
    NotEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
        };
        f.write_str(op)
    }
}

/// How an item joins the items before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joiner {
    /// `and`
    And,
    /// `or`
    Or,
}

impl fmt::Display for Joiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::And => "and",
            Self::Or => "or",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Condition {
    Compare { op: Comparison, value: Value },
    IsNull,
    IsNotNull,
}

/// One condition of a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterItem {
    column: String,
    condition: Condition,
    joiner: Joiner,
}

impl FilterItem {
    /// Returns the column the item tests.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Returns the item's joiner. Ignored for the first item.
    #[must_use]
    pub const fn joiner(&self) -> Joiner {
        self.joiner
    }

    fn to_sql(&self, dialect: &dyn Dialect) -> Result<String> {
        match &self.condition {
            Condition::Compare { op, value } => Ok(format!(
                "{}{op}{}",
                self.column,
                literal(&self.column, value, dialect)?
            )),
            Condition::IsNull => Ok(format!("{} is null", self.column)),
            Condition::IsNotNull => Ok(format!("{} is not null", self.column)),
        }
    }
}

fn join_items(items: &[FilterItem], dialect: &dyn Dialect) -> Result<String> {
    let mut clause = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let sql = item.to_sql(dialect)?;
        if idx == 0 {
            clause.push(sql);
        } else {
            clause.push(format!("{} {sql}", item.joiner));
        }
    }
    Ok(clause.join(" "))
}

macro_rules! filter_methods {
    ($ty:ty) => {
        impl $ty {
            /// Appends `column <op> value` joined with `and`.
            pub fn and<V: FieldType>(&mut self, column: &str, op: Comparison, value: V) -> &mut Self {
                self.push(column, Condition::Compare { op, value: value.to_value() }, Joiner::And)
            }

            /// Appends `column <op> value` joined with `or`.
            pub fn or<V: FieldType>(&mut self, column: &str, op: Comparison, value: V) -> &mut Self {
                self.push(column, Condition::Compare { op, value: value.to_value() }, Joiner::Or)
            }

            /// Appends `column is null` joined with `and`.
            pub fn and_is_null(&mut self, column: &str) -> &mut Self {
                self.push(column, Condition::IsNull, Joiner::And)
            }

            /// Appends `column is null` joined with `or`.
            pub fn or_is_null(&mut self, column: &str) -> &mut Self {
                self.push(column, Condition::IsNull, Joiner::Or)
            }

            /// Appends `column is not null` joined with `and`.
            pub fn and_is_not_null(&mut self, column: &str) -> &mut Self {
                self.push(column, Condition::IsNotNull, Joiner::And)
            }

            /// Appends `column is not null` joined with `or`.
            pub fn or_is_not_null(&mut self, column: &str) -> &mut Self {
                self.push(column, Condition::IsNotNull, Joiner::Or)
            }

            fn push(&mut self, column: &str, condition: Condition, joiner: Joiner) -> &mut Self {
                self.items.push(FilterItem {
                    column: column.to_string(),
                    condition,
                    joiner,
                });
                self
            }

            /// Returns the items in insertion order.
            #[must_use]
            pub fn items(&self) -> &[FilterItem] {
                &self.items
            }
        }
    };
}

/// A nested, parenthesized clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterGroup {
    items: Vec<FilterItem>,
}

filter_methods!(FilterGroup);

impl FilterGroup {
    /// Renders the group as `and (<items>)`.
    pub fn to_sql(&self, dialect: &dyn Dialect) -> Result<String> {
        if self.items.is_empty() {
            return Err(Error::EmptyFilterGroup);
        }
        Ok(format!("and ({})", join_items(&self.items, dialect)?))
    }
}

/// A `WHERE` clause under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    items: Vec<FilterItem>,
    groups: Vec<FilterGroup>,
}

filter_methods!(Filter);

impl Filter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a nested group, attached to the filter with `and`.
    pub fn group(&mut self) -> &mut FilterGroup {
        let idx = self.groups.len();
        self.groups.push(FilterGroup::default());
        &mut self.groups[idx]
    }

    /// Returns the nested groups.
    #[must_use]
    pub fn groups(&self) -> &[FilterGroup] {
        &self.groups
    }

    /// Renders the `WHERE` clause.
    ///
    /// The first item's joiner is dropped; each group follows on its own
    /// line.
    pub fn to_sql(&self, dialect: &dyn Dialect) -> Result<String> {
        if self.items.is_empty() {
            return Err(Error::EmptyFilter);
        }

        let mut sql = format!("where {}", join_items(&self.items, dialect)?);
        for group in &self.groups {
            sql.push('\n');
            sql.push_str(&group.to_sql(dialect)?);
        }
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{SqlServerDialect, SqliteDialect};

    fn render(filter: &Filter) -> Result<String> {
        filter.to_sql(&SqliteDialect::new())
    }

    #[test]
    fn test_single_item() {
        let mut filter = Filter::new();
        filter.and("id", Comparison::Equal, "00");
        assert_eq!(render(&filter).unwrap(), "where id='00'");
    }

    #[test]
    fn test_first_joiner_is_dropped() {
        let mut filter = Filter::new();
        filter
            .or("id", Comparison::Equal, 5)
            .or("name", Comparison::Equal, "x");
        assert_eq!(render(&filter).unwrap(), "where id=5 or name='x'");
    }

    #[test]
    fn test_group_is_and_attached() {
        let mut filter = Filter::new();
        filter
            .and("id", Comparison::Equal, 5)
            .or("name", Comparison::Equal, "x");
        filter.group().and("active", Comparison::Equal, 1);
        assert_eq!(
            render(&filter).unwrap(),
            "where id=5 or name='x'\nand (active=1)"
        );
    }

    #[test]
    fn test_multiple_groups() {
        let mut filter = Filter::new();
        filter.and("id", Comparison::Equal, "01");
        filter
            .group()
            .and("lastname", Comparison::Equal, "Bolanos")
            .or("phone_primary", Comparison::Greater, 1)
            .and_is_null("alias");
        filter.group().or_is_not_null("email");
        assert_eq!(
            render(&filter).unwrap(),
            "where id='01'\nand (lastname='Bolanos' or phone_primary>1 and alias is null)\nand (email is not null)"
        );
    }

    #[test]
    fn test_operators() {
        let mut filter = Filter::new();
        filter
            .and("a", Comparison::NotEqual, 1)
            .and("b", Comparison::GreaterOrEqual, 2)
            .and("c", Comparison::Less, 3)
            .and("d", Comparison::LessOrEqual, 4);
        assert_eq!(
            render(&filter).unwrap(),
            "where a<>1 and b>=2 and c<3 and d<=4"
        );
    }

    #[test]
    fn test_null_value_and_checks() {
        let mut filter = Filter::new();
        filter
            .and("alias", Comparison::Equal, None::<String>)
            .or_is_null("email");
        assert_eq!(render(&filter).unwrap(), "where alias=null or email is null");
    }

    #[test]
    fn test_empty_group_is_error() {
        let mut filter = Filter::new();
        filter.and("id", Comparison::Equal, 1);
        filter.group();
        assert_eq!(render(&filter).unwrap_err(), Error::EmptyFilterGroup);
    }

    #[test]
    fn test_empty_filter_is_error() {
        let mut filter = Filter::new();
        filter.group().and("id", Comparison::Equal, 1);
        assert_eq!(render(&filter).unwrap_err(), Error::EmptyFilter);
    }

    #[test]
    fn test_dialect_literals() {
        let mut filter = Filter::new();
        filter.and("hash", Comparison::Equal, [0xAB_u8]);
        assert_eq!(render(&filter).unwrap(), "where hash=X'AB'");
        assert_eq!(
            filter.to_sql(&SqlServerDialect::new()).unwrap(),
            "where hash=0xAB"
        );
    }

    #[test]
    fn test_items_accessors() {
        let mut filter = Filter::new();
        filter.and("a", Comparison::Equal, 1).or("b", Comparison::Equal, 2);
        assert_eq!(filter.items().len(), 2);
        assert_eq!(filter.items()[1].column(), "b");
        assert_eq!(filter.items()[1].joiner(), Joiner::Or);
        assert!(filter.groups().is_empty());
    }
}
