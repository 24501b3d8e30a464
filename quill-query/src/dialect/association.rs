//! Many-to-many association queries.

use super::Dialect;
use crate::meta::ManyToMany;
use crate::sql::write_placeholders;

impl Dialect {
    /// Select the targets of several source rows through the join table.
    ///
    /// Each returned row carries the source key it belongs to under
    /// `source_alias`, so one query can fill the associations of `id_count`
    /// parents.
    ///
    /// ```rust
    /// use quill_query::{Dialect, ManyToMany};
    ///
    /// let assoc = ManyToMany::new("doctors", "patients", "doctors_patients", "doctor_id", "patient_id");
    /// assert_eq!(
    ///     Dialect::Default.select_many_to_many(&assoc, "the_parent_record_id", 2),
    ///     "SELECT patients.*, t.doctor_id AS the_parent_record_id FROM patients \
    ///      INNER JOIN doctors_patients t ON patients.id = t.patient_id WHERE t.doctor_id IN (?, ?)"
    /// );
    /// ```
    pub fn select_many_to_many(&self, assoc: &ManyToMany, source_alias: &str, id_count: usize) -> String {
        let mut sql = format!(
            "SELECT {target}.*, t.{source_fk} AS {alias} FROM {target} INNER JOIN {join} t ON {target}.{target_pk} = t.{target_fk} WHERE t.{source_fk} IN (",
            target = assoc.target,
            source_fk = assoc.source_fk,
            alias = source_alias,
            join = assoc.join,
            target_pk = assoc.target_pk,
            target_fk = assoc.target_fk,
        );
        write_placeholders(&mut sql, id_count.max(1));
        sql.push(')');
        sql
    }

    /// Remove one link from the join table.
    pub fn delete_many_to_many(&self, assoc: &ManyToMany) -> String {
        format!(
            "DELETE FROM {} WHERE {} = ? AND {} = ?",
            assoc.join, assoc.source_fk, assoc.target_fk
        )
    }

    /// Add one link to the join table.
    pub fn insert_many_to_many(&self, assoc: &ManyToMany) -> String {
        format!(
            "INSERT INTO {} ({}, {}) VALUES (?, ?)",
            assoc.join, assoc.source_fk, assoc.target_fk
        )
    }
}
