//! Command execution against a catalog document.

use crate::formatter::Formatter;
use crate::Command;
use metacat_core::search::UsageFormat;
use metacat_core::{
    validate_object_name, Configuration, QualifiedName, StaticTableLister, Store, StoreConfig,
};
use thiserror::Error;
use tracing::debug;

/// Execution errors.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// Catalog engine error.
    #[error("{0}")]
    Core(#[from] metacat_core::Error),

    /// The checked name is not usable. Carries the formatted report.
    #[error("{0}")]
    InvalidName(String),

    /// `init` refused to overwrite an existing document.
    #[error("catalog already exists at {0}")]
    AlreadyExists(String),
}

/// Execute a command and return formatted output.
pub async fn execute(
    config: &StoreConfig,
    command: &Command,
    formatter: &dyn Formatter,
) -> Result<String, ExecuteError> {
    let store = Store::new(config.clone());
    debug!(path = %store.path().display(), ?command, "executing");

    match command {
        Command::Init { name, force } => {
            if store.path().exists() && !force {
                return Err(ExecuteError::AlreadyExists(store.path().display().to_string()));
            }
            let mut conf = Configuration::empty_default();
            if let Some(name) = name {
                conf.info.name = name.clone();
            }
            store.save(&mut conf)?;
            Ok(formatter.format_message(&format!(
                "created catalog '{}' at {}",
                conf.info.name,
                store.path().display()
            )))
        }
        Command::Summary => {
            let conf = store.load_existing()?;
            Ok(formatter.format_summary(&conf))
        }
        Command::Deps { pointer } => {
            let conf = store.load_existing()?;
            let records = conf.find_dependencies(pointer)?;
            Ok(formatter.format_dependencies(&records))
        }
        Command::Usages { pointer, columns } => {
            let conf = store.load_existing()?;
            let format = if *columns {
                UsageFormat::Column
            } else {
                UsageFormat::Label
            };
            let usages = conf.find_pointer_usages(pointer, format)?;
            Ok(formatter.format_list("Usage", &usages))
        }
        Command::EnumUsages { pointer } => {
            let conf = store.load_existing()?;
            let target = if pointer.contains('.') {
                pointer.clone()
            } else {
                QualifiedName::enumeration(pointer.as_str()).to_string()
            };
            let records = conf.find_enum_usages(&target)?;
            Ok(formatter.format_dependencies(&records))
        }
        Command::CheckName { name } => {
            let validation = validate_object_name(name);
            let output = formatter.format_validation(&validation);
            if validation.is_valid() {
                Ok(output)
            } else {
                Err(ExecuteError::InvalidName(output))
            }
        }
        Command::AllocTable { live, count } => {
            let mut conf = store.load_existing()?;
            let lister = StaticTableLister::new(live.iter().cloned());
            let mut names = Vec::with_capacity(*count);
            for _ in 0..*count {
                names.push(conf.allocate_table_name(&lister).await?);
            }
            Ok(formatter.format_list("Table", &names))
        }
        Command::Dangling => {
            let conf = store.load_existing()?;
            Ok(formatter.format_dangling(&conf.find_dangling_pointers()))
        }
    }
}
