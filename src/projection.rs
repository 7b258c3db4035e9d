//! Projection Resolver
//!
//! Reads the column metadata relation and returns the ordered list of active
//! columns for a logical table. The resolved list drives both the fetch query's
//! column set and the key order of the fetched record.

use crate::db::gateway::{Row, StorageGateway};
use crate::db::statement::{Identifier, Param, Statement};
use crate::error::{Result, RosterError};
use crate::schema::DictionarySchema;
use itertools::Itertools;
use std::sync::Arc;
use tracing::{debug, error};

/// One row of the column metadata relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMetadataEntry {
    pub table_name: String,
    pub field_name: String,
    pub active: bool,
    pub order: i64,
}

impl ColumnMetadataEntry {
    fn from_row(row: &Row, dict: &DictionarySchema) -> Result<Self> {
        let field_name = row
            .get_str(dict.field_name_column.as_str())
            .ok_or_else(|| integrity("metadata entry without a field name"))?
            .to_string();
        let order = row
            .get_i64(dict.order_column.as_str())
            .ok_or_else(|| integrity(&format!("metadata entry {} has no order", field_name)))?;

        Ok(Self {
            table_name: row
                .get_str(dict.table_name_column.as_str())
                .unwrap_or_default()
                .to_string(),
            active: row.get_bool(dict.active_column.as_str()).unwrap_or(false),
            field_name,
            order,
        })
    }
}

/// Ordered, validated column list for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    table: String,
    columns: Vec<Identifier>,
}

impl Projection {
    pub fn new(table: impl Into<String>, columns: Vec<Identifier>) -> Self {
        Self { table: table.into(), columns }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[Identifier] {
        &self.columns
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(Identifier::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

pub struct ProjectionResolver {
    gateway: Arc<dyn StorageGateway>,
    dictionary: DictionarySchema,
}

impl ProjectionResolver {
    pub fn new(gateway: Arc<dyn StorageGateway>, dictionary: DictionarySchema) -> Self {
        Self { gateway, dictionary }
    }

    /// Active columns of `table_name`, ascending by declared order.
    ///
    /// No matching metadata yields an empty projection; a storage fault or a
    /// malformed entry yields `DataAccess`.
    pub async fn resolve(&self, table_name: &str) -> Result<Projection> {
        let dict = &self.dictionary;
        let statement = Statement::select(&dict.table)
            .columns([
                &dict.table_name_column,
                &dict.field_name_column,
                &dict.active_column,
                &dict.order_column,
            ])
            .filter_eq(&dict.table_name_column, Param::Text(table_name.to_string()))
            .order_by_asc(&dict.order_column);

        let rows = self.gateway.query_rows(&statement).await?;

        // The active flag is filtered here rather than in SQL: deployments type it
        // as BOOLEAN or as a 0/1 integer, and only `get_bool` accepts both.
        // Duplicate field names keep their lowest order.
        let columns = rows
            .iter()
            .map(|row| ColumnMetadataEntry::from_row(row, dict))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .filter(|entry| entry.active)
            .sorted_by_key(|entry| entry.order)
            .unique_by(|entry| entry.field_name.clone())
            .map(|entry| {
                Identifier::new(entry.field_name).map_err(|e| {
                    error!(table = table_name, "rejected metadata column: {}", e);
                    integrity(&e.to_string())
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(table = table_name, columns = columns.len(), "projection resolved");
        Ok(Projection::new(table_name, columns))
    }
}

fn integrity(message: &str) -> RosterError {
    RosterError::DataAccess(format!("column metadata: {}", message))
}
