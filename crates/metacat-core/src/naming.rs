//! Physical name allocation and object name validation.
//!
//! Tables are named `tab_<letter><NN>` and columns `col_<letter><digit>`.
//! Both allocators scan letters in the outer loop and suffixes in the inner
//! loop, and reserve the chosen name before returning it so a session never
//! hands out the same name twice.

use crate::configuration::Configuration;
use crate::error::Error;
use crate::lister::TableLister;
use crate::model::Fields;
use std::collections::{HashMap, HashSet};
use tracing::debug;

const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// Lowercase Ukrainian letters accepted in object names.
const CYRILLIC: &str = "абвгґдеєжзиіїйклмнопрстуфхцчшщьюя";

fn column_candidates() -> impl Iterator<Item = String> {
    ALPHABET
        .iter()
        .flat_map(|&letter| (1..=9).map(move |n| format!("col_{}{}", letter as char, n)))
}

fn table_candidates() -> impl Iterator<Item = String> {
    ALPHABET
        .iter()
        .flat_map(|&letter| (1..=99).map(move |n| format!("tab_{}{:02}", letter as char, n)))
}

/// Physical names handed out during a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameReservations {
    tables: HashSet<String>,
    columns: HashMap<String, HashSet<String>>,
}

impl NameReservations {
    /// Reserve a table name. Returns false if it was already reserved.
    pub fn reserve_table(&mut self, table: impl Into<String>) -> bool {
        self.tables.insert(table.into())
    }

    /// Check whether a table name was reserved.
    pub fn is_table_reserved(&self, table: &str) -> bool {
        self.tables.contains(table)
    }

    /// Reserve a column name within a table. Returns false if it was already
    /// reserved.
    pub fn reserve_column(&mut self, table: &str, column: impl Into<String>) -> bool {
        self.columns
            .entry(table.to_string())
            .or_default()
            .insert(column.into())
    }

    /// Check whether a column name was reserved within `table`.
    pub fn is_column_reserved(&self, table: &str, column: &str) -> bool {
        self.columns
            .get(table)
            .is_some_and(|columns| columns.contains(column))
    }

    /// Allocate a column name for `table` that is neither reserved nor used
    /// by `existing_fields`.
    pub fn allocate_column_name(
        &mut self,
        table: &str,
        existing_fields: &Fields,
    ) -> Result<String, Error> {
        let used: HashSet<&str> = existing_fields
            .values()
            .map(|f| f.name_in_table.as_str())
            .collect();

        let name = column_candidates()
            .find(|c| !self.is_column_reserved(table, c) && !used.contains(c.as_str()))
            .ok_or_else(|| Error::AllocationExhausted {
                what: format!("columns of {table}"),
            })?;

        self.reserve_column(table, name.clone());
        debug!(table, column = %name, "allocated column name");
        Ok(name)
    }
}

impl Configuration {
    /// Allocate a column name for `table`. See
    /// [`NameReservations::allocate_column_name`].
    ///
    /// When `existing_fields` belongs to this catalog, call the method on
    /// `self.reservations` directly to keep the borrows apart.
    pub fn allocate_column_name(
        &mut self,
        table: &str,
        existing_fields: &Fields,
    ) -> Result<String, Error> {
        self.reservations.allocate_column_name(table, existing_fields)
    }

    /// Allocate a table name unused by the session, by live storage and by
    /// this catalog.
    pub async fn allocate_table_name(&mut self, lister: &dyn TableLister) -> Result<String, Error> {
        let live: HashSet<String> = lister.list_tables().await?.into_iter().collect();

        let name = {
            let in_catalog: HashSet<&str> = self.all_tables().into_iter().collect();
            table_candidates().find(|c| {
                !self.reservations.is_table_reserved(c)
                    && !live.contains(c)
                    && !in_catalog.contains(c.as_str())
            })
        }
        .ok_or_else(|| Error::AllocationExhausted {
            what: "tables".to_string(),
        })?;

        self.reservations.reserve_table(name.clone());
        debug!(table = %name, live_tables = live.len(), "allocated table name");
        Ok(name)
    }
}

/// Outcome of [`validate_object_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameValidation {
    /// The trimmed input. Invalid characters are kept.
    pub name: String,
    /// Problems found, in input order.
    pub errors: Vec<String>,
}

impl NameValidation {
    /// Check whether no problem was found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors joined by newlines; empty when the name is valid.
    pub fn message(&self) -> String {
        self.errors.join("\n")
    }
}

fn is_allowed(c: char) -> bool {
    if c.is_ascii_alphanumeric() || c == '_' {
        return true;
    }
    c.to_lowercase().all(|l| CYRILLIC.contains(l))
}

/// Check that `name` is usable as a schema object name.
///
/// Reports every offending character with its position; does not alter the
/// name.
pub fn validate_object_name(name: &str) -> NameValidation {
    let name = name.trim().to_string();
    let mut errors = Vec::new();

    match name.chars().next() {
        None => errors.push("Name is empty".to_string()),
        Some(first) if first.is_ascii_digit() => {
            errors.push("Name must start with a letter".to_string())
        }
        Some(_) => {}
    }

    for (position, c) in name.chars().enumerate() {
        if !is_allowed(c) {
            errors.push(format!("Invalid character '{c}' at position {position}"));
        }
    }

    NameValidation { name, errors }
}
