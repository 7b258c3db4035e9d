//! Typed read statements handed to a storage gateway
//!
//! A `Statement` describes the shape of a single-table read. Only validated
//! `Identifier`s are ever interpolated into SQL text; every value travels as a
//! bound parameter.

use crate::error::{Result, RosterError};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

lazy_static! {
    static ref IDENTIFIER_RE: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// A table or column name that is safe to splice into SQL text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if IDENTIFIER_RE.is_match(&name) {
            Ok(Self(name))
        } else {
            Err(RosterError::InvalidIdentifier(name))
        }
    }

    /// For names baked into the binary. Panics in debug builds if `name` is malformed.
    pub(crate) fn from_static(name: &'static str) -> Self {
        debug_assert!(IDENTIFIER_RE.is_match(name), "bad identifier literal: {}", name);
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Double-quoted form, so mixed-case and reserved names ("Order") survive.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identifier {
    type Error = RosterError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Text(String),
    Int(i64),
    Bool(bool),
    Date(NaiveDate),
}

/// SQL type of a key column, which decides how a textual key is bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// Numeric keys bind as integers; anything else still binds as text.
    #[default]
    Integer,
    /// Keys bind verbatim, so "007" stays "007".
    Text,
}

impl Param {
    /// Bind a key received as text from the request layer.
    pub fn key(raw: &str, key_type: KeyType) -> Self {
        match key_type {
            KeyType::Integer => match raw.parse::<i64>() {
                Ok(n) => Param::Int(n),
                Err(_) => Param::Text(raw.to_string()),
            },
            KeyType::Text => Param::Text(raw.to_string()),
        }
    }

    /// Lift a value read from one row into a parameter for the next lookup.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Param::Text(s.clone())),
            Value::Number(n) => n.as_i64().map(Param::Int),
            Value::Bool(b) => Some(Param::Bool(*b)),
            _ => None,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Text(s) => write!(f, "'{}'", s),
            Param::Int(n) => write!(f, "{}", n),
            Param::Bool(b) => write!(f, "{}", b),
            Param::Date(d) => write!(f, "'{}'", d),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Identifier, Param),
    NotEq(Identifier, Param),
    In(Identifier, Vec<Param>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Columns {
    All,
    List(Vec<Identifier>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: Identifier,
    pub descending: bool,
}

/// `SELECT <columns> FROM <table> [WHERE ...] [ORDER BY ...] [LIMIT n]`
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    table: Identifier,
    columns: Columns,
    conditions: Vec<Condition>,
    order_by: Option<OrderBy>,
    limit: Option<u32>,
}

impl Statement {
    pub fn select(table: &Identifier) -> Self {
        Self {
            table: table.clone(),
            columns: Columns::All,
            conditions: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    /// Restrict the projection. An empty list is not a valid SQL projection and
    /// is rejected by `to_sql`.
    pub fn columns<'a>(mut self, columns: impl IntoIterator<Item = &'a Identifier>) -> Self {
        self.columns = Columns::List(columns.into_iter().cloned().collect());
        self
    }

    pub fn filter_eq(mut self, column: &Identifier, value: Param) -> Self {
        self.conditions.push(Condition::Eq(column.clone(), value));
        self
    }

    pub fn filter_ne(mut self, column: &Identifier, value: Param) -> Self {
        self.conditions.push(Condition::NotEq(column.clone(), value));
        self
    }

    pub fn filter_in(mut self, column: &Identifier, values: Vec<Param>) -> Self {
        self.conditions.push(Condition::In(column.clone(), values));
        self
    }

    pub fn order_by_asc(mut self, column: &Identifier) -> Self {
        self.order_by = Some(OrderBy { column: column.clone(), descending: false });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn table(&self) -> &Identifier {
        &self.table
    }

    pub fn projection(&self) -> &Columns {
        &self.columns
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn ordering(&self) -> Option<&OrderBy> {
        self.order_by.as_ref()
    }

    pub fn row_limit(&self) -> Option<u32> {
        self.limit
    }

    /// Render Postgres SQL with `$n` placeholders, plus the parameters in bind order.
    pub fn to_sql(&self) -> Result<(String, Vec<Param>)> {
        let projection = match &self.columns {
            Columns::All => "*".to_string(),
            Columns::List(cols) if cols.is_empty() => {
                return Err(RosterError::InvalidIdentifier(format!(
                    "empty projection for {}",
                    self.table
                )))
            }
            Columns::List(cols) => cols.iter().map(Identifier::quoted).collect::<Vec<_>>().join(", "),
        };

        let mut sql = format!("SELECT {} FROM {}", projection, self.table.quoted());
        let mut params = Vec::new();

        if !self.conditions.is_empty() {
            let mut clauses = Vec::with_capacity(self.conditions.len());
            for condition in &self.conditions {
                let clause = match condition {
                    Condition::Eq(col, value) => {
                        params.push(value.clone());
                        format!("{} = ${}", col.quoted(), params.len())
                    }
                    Condition::NotEq(col, value) => {
                        params.push(value.clone());
                        format!("{} <> ${}", col.quoted(), params.len())
                    }
                    // `IN ()` is a syntax error
                    Condition::In(_, values) if values.is_empty() => "FALSE".to_string(),
                    Condition::In(col, values) => {
                        let mut placeholders = Vec::with_capacity(values.len());
                        for value in values {
                            params.push(value.clone());
                            placeholders.push(format!("${}", params.len()));
                        }
                        format!("{} IN ({})", col.quoted(), placeholders.join(", "))
                    }
                };
                clauses.push(clause);
            }
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        if let Some(order) = &self.order_by {
            let direction = if order.descending { "DESC" } else { "ASC" };
            sql.push_str(&format!(" ORDER BY {} {}", order.column.quoted(), direction));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        Ok((sql, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Identifier {
        Identifier::new(name).unwrap()
    }

    #[test]
    fn test_identifier_rejects_injection() {
        assert!(Identifier::new("AVG").is_ok());
        assert!(Identifier::new("_hr2").is_ok());
        assert!(Identifier::new("AVG; DROP TABLE players").is_err());
        assert!(Identifier::new("2B").is_err());
        assert!(Identifier::new("").is_err());
        assert!(Identifier::new("a\"b").is_err());
    }

    #[test]
    fn test_identifier_deserializes_with_validation() {
        let ok: Identifier = serde_json::from_str("\"TeamID\"").unwrap();
        assert_eq!(ok.as_str(), "TeamID");
        assert!(serde_json::from_str::<Identifier>("\"Team ID\"").is_err());
    }

    #[test]
    fn test_select_renders_placeholders_in_order() {
        let stmt = Statement::select(&ident("dictionarydata"))
            .columns([&ident("FieldNameX"), &ident("Order")])
            .filter_eq(&ident("TableName"), Param::Text("YearlyStatsBatting".into()))
            .filter_eq(&ident("Verify"), Param::Int(1))
            .order_by_asc(&ident("Order"));

        let (sql, params) = stmt.to_sql().unwrap();
        assert_eq!(
            sql,
            "SELECT \"FieldNameX\", \"Order\" FROM \"dictionarydata\" \
             WHERE \"TableName\" = $1 AND \"Verify\" = $2 ORDER BY \"Order\" ASC"
        );
        assert_eq!(params, vec![Param::Text("YearlyStatsBatting".into()), Param::Int(1)]);
    }

    #[test]
    fn test_select_in_and_limit() {
        let stmt = Statement::select(&ident("yearlystatsbatting"))
            .filter_ne(&ident("Position1"), Param::Text("SP".into()))
            .filter_in(&ident("PlayerRefID"), vec![Param::Int(7), Param::Int(9)])
            .limit(1);

        let (sql, params) = stmt.to_sql().unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM \"yearlystatsbatting\" WHERE \"Position1\" <> $1 \
             AND \"PlayerRefID\" IN ($2, $3) LIMIT 1"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_empty_in_list_matches_nothing() {
        let stmt = Statement::select(&ident("t")).filter_in(&ident("id"), Vec::new());
        let (sql, params) = stmt.to_sql().unwrap();
        assert_eq!(sql, "SELECT * FROM \"t\" WHERE FALSE");
        assert!(params.is_empty());
    }

    #[test]
    fn test_empty_projection_is_rejected() {
        let stmt = Statement::select(&ident("t")).columns(std::iter::empty());
        assert!(stmt.to_sql().is_err());
    }

    #[test]
    fn test_key_param_follows_key_type() {
        assert_eq!(Param::key("10234", KeyType::Integer), Param::Int(10234));
        assert_eq!(Param::key("abc01", KeyType::Integer), Param::Text("abc01".into()));
        assert_eq!(Param::key("007", KeyType::Text), Param::Text("007".into()));
        assert_eq!(Param::key("10234", KeyType::Text), Param::Text("10234".into()));
    }

    #[test]
    fn test_key_type_deserializes_lowercase() {
        let key_type: KeyType = serde_json::from_str("\"text\"").unwrap();
        assert_eq!(key_type, KeyType::Text);
        assert_eq!(KeyType::default(), KeyType::Integer);
    }
}
