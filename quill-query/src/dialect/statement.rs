//! Insert, update and lookup statements.

use tracing::debug;

use super::Dialect;
use crate::attributes::AttributeMap;
use crate::error::{QueryError, QueryResult};
use crate::meta::TableMeta;
use crate::sql::{write_literal, write_placeholders};
use crate::value::Value;

impl Dialect {
    /// Column list and values for a row with no attributes.
    fn write_empty_row(&self, sql: &mut String, meta: &TableMeta) {
        match self {
            Self::MySql => sql.push_str("() VALUES ()"),
            Self::Oracle => {
                sql.push('(');
                sql.push_str(&meta.id_name);
                sql.push_str(") VALUES (");
                sql.push_str(meta.id_generator_code.as_deref().unwrap_or("NULL"));
                sql.push(')');
            }
            _ => sql.push_str("DEFAULT VALUES"),
        }
    }

    fn write_columns<'a, I>(&self, sql: &mut String, columns: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let style = self.quote_style();
        for (i, column) in columns.into_iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            style.write(sql, column);
        }
    }

    /// `INSERT` with literal values, columns in attribute order.
    ///
    /// When the table has a key generator and the attributes carry no key
    /// value, the key column is added with the generator expression.
    pub fn insert(&self, meta: &TableMeta, attributes: &AttributeMap) -> QueryResult<String> {
        meta.check_columns(attributes.keys())?;

        let mut sql = String::with_capacity(64);
        sql.push_str("INSERT INTO ");
        sql.push_str(&meta.table);
        sql.push(' ');

        let generated = meta.id_generator_code.as_deref().filter(|_| {
            attributes
                .get(&meta.id_name)
                .is_none_or(Value::is_null)
        });
        let entries: Vec<(&str, &Value)> = attributes
            .iter()
            .filter(|(key, _)| generated.is_none() || !meta.is_id(key))
            .collect();

        if entries.is_empty() && generated.is_none() {
            self.write_empty_row(&mut sql, meta);
            debug!(dialect = %self, sql = %sql, "formed insert");
            return Ok(sql);
        }

        sql.push('(');
        if generated.is_some() {
            sql.push_str(&meta.id_name);
            if !entries.is_empty() {
                sql.push_str(", ");
            }
        }
        self.write_columns(&mut sql, entries.iter().map(|(key, _)| *key));
        sql.push_str(") VALUES (");
        if let Some(code) = generated {
            sql.push_str(code);
            if !entries.is_empty() {
                sql.push_str(", ");
            }
        }
        for (i, (key, value)) in entries.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            write_literal(&mut sql, key, value).map_err(|e| e.with_table(&meta.table))?;
        }
        sql.push(')');

        debug!(dialect = %self, sql = %sql, "formed insert");
        Ok(sql)
    }

    /// `INSERT` with `?` placeholders for `columns`.
    ///
    /// With `returning_id`, PostgreSQL appends `RETURNING <pk>`; other dialects
    /// leave key retrieval to the driver.
    pub fn insert_parametrized(&self, meta: &TableMeta, columns: &[&str], returning_id: bool) -> String {
        let mut sql = String::with_capacity(64);
        sql.push_str("INSERT INTO ");
        sql.push_str(&meta.table);
        sql.push(' ');

        if columns.is_empty() {
            self.write_empty_row(&mut sql, meta);
        } else {
            let generated = meta
                .id_generator_code
                .as_deref()
                .filter(|_| !columns.iter().any(|c| meta.is_id(c)));
            sql.push('(');
            if generated.is_some() {
                sql.push_str(&meta.id_name);
                sql.push_str(", ");
            }
            self.write_columns(&mut sql, columns.iter().copied());
            sql.push_str(") VALUES (");
            if let Some(code) = generated {
                sql.push_str(code);
                sql.push_str(", ");
            }
            write_placeholders(&mut sql, columns.len());
            sql.push(')');
        }

        if returning_id && *self == Self::PostgreSql {
            sql.push_str(" RETURNING ");
            sql.push_str(&meta.id_name);
        }
        sql
    }

    /// `UPDATE ... SET col = literal, ... WHERE <pk> = <pk value>`.
    pub fn update(&self, meta: &TableMeta, attributes: &AttributeMap) -> QueryResult<String> {
        meta.check_columns(attributes.keys())?;
        let id = attributes
            .get(&meta.id_name)
            .ok_or_else(|| QueryError::missing_primary_key(&meta.table, &meta.id_name))?;
        let rest = attributes.without(&meta.id_name);
        if rest.is_empty() {
            return Err(QueryError::empty_attributes(&meta.table));
        }

        let style = self.quote_style();
        let mut sql = String::with_capacity(64);
        sql.push_str("UPDATE ");
        sql.push_str(&meta.table);
        sql.push_str(" SET ");
        for (i, (key, value)) in rest.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            style.write(&mut sql, key);
            sql.push_str(" = ");
            write_literal(&mut sql, key, value).map_err(|e| e.with_table(&meta.table))?;
        }
        sql.push_str(" WHERE ");
        sql.push_str(&meta.id_name);
        sql.push_str(" = ");
        write_literal(&mut sql, &meta.id_name, id).map_err(|e| e.with_table(&meta.table))?;

        debug!(dialect = %self, sql = %sql, "formed update");
        Ok(sql)
    }

    /// `UPDATE ... SET col = ?, ... WHERE <pk> = ?`.
    pub fn update_parametrized(&self, meta: &TableMeta, columns: &[&str]) -> QueryResult<String> {
        meta.check_columns(columns.iter().copied())?;
        let columns: Vec<&str> = columns.iter().copied().filter(|c| !meta.is_id(c)).collect();
        if columns.is_empty() {
            return Err(QueryError::empty_attributes(&meta.table));
        }

        let style = self.quote_style();
        let mut sql = String::with_capacity(64);
        sql.push_str("UPDATE ");
        sql.push_str(&meta.table);
        sql.push_str(" SET ");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            style.write(&mut sql, column);
            sql.push_str(" = ?");
        }
        sql.push_str(" WHERE ");
        sql.push_str(&meta.id_name);
        sql.push_str(" = ?");
        Ok(sql)
    }

    /// `SELECT <pk> FROM <table> WHERE <pk> = ?`.
    pub fn select_exists(&self, meta: &TableMeta) -> String {
        format!(
            "SELECT {id} FROM {table} WHERE {id} = ?",
            id = meta.id_name,
            table = meta.table
        )
    }

    /// `SELECT * FROM <table>[ WHERE <predicate>]`.
    pub fn select_star(&self, table: &str, predicate: Option<&str>) -> String {
        match predicate {
            Some(predicate) => format!("SELECT * FROM {} WHERE {}", table, predicate),
            None => format!("SELECT * FROM {}", table),
        }
    }

    /// `SELECT * FROM <table> WHERE a = ? AND b = ? ...`.
    pub fn select_star_parametrized(&self, table: &str, columns: &[&str]) -> String {
        let mut sql = format!("SELECT * FROM {}", table);
        for (i, column) in columns.iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            sql.push_str(column);
            sql.push_str(" = ?");
        }
        sql
    }

    /// `SELECT COUNT(*) FROM <table>[ WHERE <predicate>]`.
    pub fn count(&self, table: &str, predicate: Option<&str>) -> String {
        match predicate {
            Some(predicate) => format!("SELECT COUNT(*) FROM {} WHERE {}", table, predicate),
            None => format!("SELECT COUNT(*) FROM {}", table),
        }
    }

    /// `DELETE FROM <table> WHERE <pk> = ?`.
    pub fn delete_by_id(&self, meta: &TableMeta) -> String {
        format!("DELETE FROM {} WHERE {} = ?", meta.table, meta.id_name)
    }
}
