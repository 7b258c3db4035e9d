//! PostgreSQL storage gateway

use crate::db::gateway::{Row, StorageGateway};
use crate::db::statement::{Param, Statement};
use crate::error::{Result, RosterError};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Column, PgPool, Row as _, TypeInfo};
use tracing::{debug, error};

pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageGateway for PgGateway {
    async fn query_rows(&self, statement: &Statement) -> Result<Vec<Row>> {
        let (sql, params) = statement.to_sql()?;
        debug!(%sql, params = params.len(), "executing statement");

        let mut query = sqlx::query(&sql);
        for param in params {
            query = match param {
                Param::Text(s) => query.bind(s),
                Param::Int(n) => query.bind(n),
                Param::Bool(b) => query.bind(b),
                Param::Date(d) => query.bind(d),
            };
        }

        let rows = query.fetch_all(&self.pool).await.map_err(|e| {
            error!(table = %statement.table(), "query failed: {}", e);
            RosterError::DataAccess(format!("Failed to query {}: {}", statement.table(), e))
        })?;

        rows.iter().map(decode_row).collect()
    }
}

fn decode_row(row: &PgRow) -> Result<Row> {
    let mut decoded = Row::new();
    for column in row.columns() {
        let value = decode_value(row, column.ordinal(), column.type_info().name())
            .map_err(|e| RosterError::DataAccess(format!("column {}: {}", column.name(), e)))?;
        decoded.push(column.name(), value);
    }
    Ok(decoded)
}

fn decode_value(row: &PgRow, idx: usize, type_name: &str) -> Result<Value> {
    let value = match type_name {
        "BOOL" => Value::from(row.try_get::<Option<bool>, _>(idx)?),
        "INT2" => Value::from(row.try_get::<Option<i16>, _>(idx)?),
        "INT4" => Value::from(row.try_get::<Option<i32>, _>(idx)?),
        "INT8" => Value::from(row.try_get::<Option<i64>, _>(idx)?),
        "FLOAT4" => Value::from(row.try_get::<Option<f32>, _>(idx)?.map(f64::from)),
        "FLOAT8" => Value::from(row.try_get::<Option<f64>, _>(idx)?),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CHAR" => {
            Value::from(row.try_get::<Option<String>, _>(idx)?)
        }
        "DATE" => Value::from(
            row.try_get::<Option<NaiveDate>, _>(idx)?
                .map(|d| d.to_string()),
        ),
        "TIMESTAMP" => Value::from(
            row.try_get::<Option<NaiveDateTime>, _>(idx)?
                .map(|t| t.to_string()),
        ),
        "TIMESTAMPTZ" => Value::from(
            row.try_get::<Option<DateTime<Utc>>, _>(idx)?
                .map(|t| t.to_rfc3339()),
        ),
        "UUID" => Value::from(
            row.try_get::<Option<uuid::Uuid>, _>(idx)?
                .map(|u| u.to_string()),
        ),
        other => {
            return Err(RosterError::DataAccess(format!(
                "unsupported column type {}",
                other
            )))
        }
    };
    Ok(value)
}
