//! In-memory storage gateway
//!
//! Holds tables as JSON rows and evaluates `Statement`s directly. Used by the
//! server's demo mode and by tests, which also rely on its query log and on
//! per-table fault injection.

use crate::db::gateway::{Row, StorageGateway};
use crate::db::statement::{Columns, Condition, Param, Statement};
use crate::error::{Result, RosterError};
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, RwLock};
use tracing::debug;

#[derive(Default)]
pub struct MemoryGateway {
    tables: RwLock<HashMap<String, Vec<Row>>>,
    failing: RwLock<HashSet<String>>,
    log: Mutex<Vec<String>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `insert`.
    pub fn with_table(self, table: &str, rows: Vec<Value>) -> Self {
        self.insert(table, rows);
        self
    }

    /// Append rows to `table`, creating it if needed. Non-object values are ignored.
    pub fn insert(&self, table: &str, rows: Vec<Value>) {
        let rows = rows.into_iter().filter_map(|value| match value {
            Value::Object(map) => Some(map.into_iter().collect::<Row>()),
            _ => None,
        });
        if let Ok(mut tables) = self.tables.write() {
            tables.entry(table.to_string()).or_default().extend(rows);
        }
    }

    /// Drop every row of `table` but keep the table itself.
    pub fn truncate(&self, table: &str) {
        if let Ok(mut tables) = self.tables.write() {
            if let Some(rows) = tables.get_mut(table) {
                rows.clear();
            }
        }
    }

    /// Make every subsequent read of `table` fault.
    pub fn fail_on(&self, table: &str) {
        if let Ok(mut failing) = self.failing.write() {
            failing.insert(table.to_string());
        }
    }

    /// Tables read so far, in call order.
    pub fn queried_tables(&self) -> Vec<String> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn clear_log(&self) {
        if let Ok(mut log) = self.log.lock() {
            log.clear();
        }
    }

    fn execute(&self, statement: &Statement) -> Result<Vec<Row>> {
        let table = statement.table().as_str();

        let failing = self
            .failing
            .read()
            .map_err(|_| RosterError::DataAccess("fault set poisoned".to_string()))?;
        if failing.contains(table) {
            return Err(RosterError::DataAccess(format!("simulated fault reading {}", table)));
        }
        drop(failing);

        let tables = self
            .tables
            .read()
            .map_err(|_| RosterError::DataAccess("table store poisoned".to_string()))?;
        let rows = tables
            .get(table)
            .ok_or_else(|| RosterError::DataAccess(format!("relation \"{}\" does not exist", table)))?;

        let mut matched: Vec<&Row> = Vec::new();
        for row in rows {
            if row_matches(row, statement.conditions())? {
                matched.push(row);
            }
        }

        if let Some(order) = statement.ordering() {
            let column = order.column.as_str();
            matched.sort_by(|a, b| {
                let ord = compare_values(a.get(column), b.get(column));
                if order.descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }

        if let Some(limit) = statement.row_limit() {
            matched.truncate(limit as usize);
        }

        matched.into_iter().map(|row| project(row, statement.projection())).collect()
    }
}

#[async_trait]
impl StorageGateway for MemoryGateway {
    async fn query_rows(&self, statement: &Statement) -> Result<Vec<Row>> {
        if let Ok(mut log) = self.log.lock() {
            log.push(statement.table().to_string());
        }
        let rows = self.execute(statement)?;
        debug!(table = %statement.table(), rows = rows.len(), "memory query");
        Ok(rows)
    }
}

fn column_value<'a>(row: &'a Row, column: &str) -> Result<&'a Value> {
    row.get(column)
        .ok_or_else(|| RosterError::DataAccess(format!("column \"{}\" does not exist", column)))
}

fn row_matches(row: &Row, conditions: &[Condition]) -> Result<bool> {
    for condition in conditions {
        let keep = match condition {
            Condition::Eq(col, param) => param_matches(column_value(row, col.as_str())?, param),
            // SQL three-valued logic: NULL <> x is not true
            Condition::NotEq(col, param) => {
                let value = column_value(row, col.as_str())?;
                !value.is_null() && !param_matches(value, param)
            }
            Condition::In(col, params) => {
                let value = column_value(row, col.as_str())?;
                params.iter().any(|p| param_matches(value, p))
            }
        };
        if !keep {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Loose equality in the spirit of MySQL comparisons: numeric text equals the
/// number, and 0/1 flags equal booleans.
fn param_matches(value: &Value, param: &Param) -> bool {
    match (value, param) {
        (Value::Null, _) => false,
        (Value::String(s), Param::Text(p)) => s == p,
        (Value::String(s), Param::Int(p)) => s.trim().parse::<i64>().map_or(false, |n| n == *p),
        (Value::String(s), Param::Date(d)) => s.starts_with(&d.to_string()),
        (Value::Number(n), Param::Int(p)) => n.as_i64() == Some(*p),
        (Value::Number(n), Param::Text(p)) => n.to_string() == *p,
        (Value::Number(n), Param::Bool(b)) => n.as_i64() == Some(i64::from(*b)),
        (Value::Bool(v), Param::Bool(b)) => v == b,
        (Value::Bool(v), Param::Int(p)) => i64::from(*v) == *p,
        _ => false,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        // NULLS LAST, as Postgres sorts ascending
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn project(row: &Row, columns: &Columns) -> Result<Row> {
    match columns {
        Columns::All => Ok(row.clone()),
        Columns::List(list) => list
            .iter()
            .map(|col| Ok((col.to_string(), column_value(row, col.as_str())?.clone())))
            .collect(),
    }
}
