//! Table and association descriptors supplied by the mapping layer.

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};

/// Table metadata needed to build statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    /// Table name.
    pub table: String,
    /// Primary key column.
    pub id_name: String,
    /// Known columns, in table order. Empty means any column is accepted.
    pub columns: Vec<String>,
    /// SQL expression producing a new key (e.g. `people_seq.nextval`).
    pub id_generator_code: Option<String>,
}

impl TableMeta {
    /// Create metadata for a table keyed by `id`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            id_name: "id".to_string(),
            columns: Vec::new(),
            id_generator_code: None,
        }
    }

    /// Set the primary key column.
    pub fn id_name(mut self, id_name: impl Into<String>) -> Self {
        self.id_name = id_name.into();
        self
    }

    /// Set the column list.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the key generator expression.
    pub fn id_generator(mut self, code: impl Into<String>) -> Self {
        self.id_generator_code = Some(code.into());
        self
    }

    /// Check whether `name` is the primary key, ignoring case.
    pub fn is_id(&self, name: &str) -> bool {
        self.id_name.eq_ignore_ascii_case(name)
    }

    /// Check whether `name` is a declared column or the primary key, ignoring case.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.is_empty()
            || self.is_id(name)
            || self.columns.iter().any(|c| c.eq_ignore_ascii_case(name))
    }

    /// Fail with `UnknownColumn` on the first name the table does not declare.
    pub fn check_columns<'a, I>(&self, names: I) -> QueryResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        match names.into_iter().find(|name| !self.has_column(name)) {
            Some(name) => Err(QueryError::unknown_column(&self.table, name)),
            None => Ok(()),
        }
    }
}

/// A many-to-many relationship through a join table.
///
/// `source_fk` and `target_fk` are columns of the join table pointing at the
/// source and target tables' keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManyToMany {
    /// Source table.
    pub source: String,
    /// Target table.
    pub target: String,
    /// Join table.
    pub join: String,
    /// Join-table column referencing the source key.
    pub source_fk: String,
    /// Join-table column referencing the target key.
    pub target_fk: String,
    /// Primary key of the target table.
    pub target_pk: String,
    /// Primary key of the source table.
    pub source_pk: String,
}

impl ManyToMany {
    /// Create an association whose target key is `id`.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        join: impl Into<String>,
        source_fk: impl Into<String>,
        target_fk: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            join: join.into(),
            source_fk: source_fk.into(),
            target_fk: target_fk.into(),
            target_pk: "id".to_string(),
            source_pk: "id".to_string(),
        }
    }

    /// Override the target primary key.
    pub fn target_pk(mut self, pk: impl Into<String>) -> Self {
        self.target_pk = pk.into();
        self
    }

    /// Override the source primary key.
    pub fn source_pk(mut self, pk: impl Into<String>) -> Self {
        self.source_pk = pk.into();
        self
    }

    /// The same join table seen from the target side.
    pub fn inverse(&self) -> Self {
        Self {
            source: self.target.clone(),
            target: self.source.clone(),
            join: self.join.clone(),
            source_fk: self.target_fk.clone(),
            target_fk: self.source_fk.clone(),
            target_pk: self.source_pk.clone(),
            source_pk: self.target_pk.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_check_columns() {
        let people = TableMeta::new("people").columns(["name", "last_name"]);
        assert!(people.check_columns(["ID", "Name", "last_name"]).is_ok());

        let err = people.check_columns(["name", "nickname"]).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownColumn);
        assert_eq!(err.context.field.as_deref(), Some("nickname"));

        let open = TableMeta::new("people");
        assert!(open.check_columns(["anything"]).is_ok());
    }

    #[test]
    fn test_inverse_swaps_sides() {
        let assoc = ManyToMany::new("doctors", "patients", "doctors_patients", "doctor_id", "patient_id")
            .target_pk("patient_no");
        let inverse = assoc.inverse();
        assert_eq!(inverse.source, "patients");
        assert_eq!(inverse.target, "doctors");
        assert_eq!(inverse.source_fk, "patient_id");
        assert_eq!(inverse.target_fk, "doctor_id");
        assert_eq!(inverse.target_pk, "id");
        assert_eq!(inverse.source_pk, "patient_no");
        assert_eq!(inverse.inverse(), assoc);
    }
}
