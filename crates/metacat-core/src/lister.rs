//! Live-storage table listing.
//!
//! The catalog never talks to the backing store itself. Table-name
//! allocation asks a [`TableLister`] once for the tables that physically exist.

use crate::error::Error;
use async_trait::async_trait;

/// Source of the table names currently present in physical storage.
#[async_trait]
pub trait TableLister: Send + Sync {
    /// List the tables of the backing store.
    async fn list_tables(&self) -> Result<Vec<String>, Error>;
}

/// A lister over a fixed set of names.
#[derive(Debug, Clone, Default)]
pub struct StaticTableLister {
    tables: Vec<String>,
}

impl StaticTableLister {
    /// Create a lister over a fixed set of table names.
    pub fn new(tables: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            tables: tables.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl TableLister for StaticTableLister {
    async fn list_tables(&self) -> Result<Vec<String>, Error> {
        Ok(self.tables.clone())
    }
}
