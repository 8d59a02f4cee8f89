//! Output formatters for command results.

use clap::ValueEnum;
use comfy_table::{Cell, Table};
use metacat_core::{Configuration, DanglingPointer, DependencyRecord, NameValidation};
use serde_json::json;

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Object counts per section.
    fn format_summary(&self, conf: &Configuration) -> String;

    /// Structured dependency records.
    fn format_dependencies(&self, records: &[DependencyRecord]) -> String;

    /// A single-column listing.
    fn format_list(&self, header: &str, items: &[String]) -> String;

    /// Outcome of a name check.
    fn format_validation(&self, validation: &NameValidation) -> String;

    /// Unresolvable references.
    fn format_dangling(&self, dangling: &[DanglingPointer]) -> String;

    /// A simple message.
    fn format_message(&self, message: &str) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

fn section_counts(conf: &Configuration) -> Vec<(&'static str, usize)> {
    vec![
        ("Constants", conf.constants_blocks.values().map(|b| b.constants.len()).sum()),
        ("Catalogs", conf.catalogs.len()),
        ("Documents", conf.documents.len()),
        ("Enumerations", conf.enumerations.len()),
        ("Journals", conf.journals.len()),
        ("InformationRegisters", conf.information_registers.len()),
        ("AccumulationRegisters", conf.accumulation_registers.len()),
    ]
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_summary(&self, conf: &Configuration) -> String {
        let mut table = Table::new();
        table.set_header(vec!["Section", "Objects"]);
        for (section, count) in section_counts(conf) {
            table.add_row(vec![Cell::new(section), Cell::new(count)]);
        }
        format!("{} ({})\n{}", conf.info.name, conf.info.subtitle, table)
    }

    fn format_dependencies(&self, records: &[DependencyRecord]) -> String {
        if records.is_empty() {
            return "No dependencies".to_string();
        }
        let mut table = Table::new();
        table.set_header(vec!["Group", "Object", "Table part", "Field", "Column"]);
        for record in records {
            table.add_row(vec![
                record.group_name.clone(),
                record.object_name.clone(),
                record.table_part_name.clone().unwrap_or_default(),
                record.field_name.clone(),
                format!("{}.{}", record.table, record.field.name_in_table),
            ]);
        }
        table.to_string()
    }

    fn format_list(&self, header: &str, items: &[String]) -> String {
        if items.is_empty() {
            return "No results".to_string();
        }
        let mut table = Table::new();
        table.set_header(vec![header]);
        for item in items {
            table.add_row(vec![item]);
        }
        table.to_string()
    }

    fn format_validation(&self, validation: &NameValidation) -> String {
        if validation.is_valid() {
            format!("'{}' is a valid name", validation.name)
        } else {
            validation.message()
        }
    }

    fn format_dangling(&self, dangling: &[DanglingPointer]) -> String {
        if dangling.is_empty() {
            return "No dangling references".to_string();
        }
        let mut table = Table::new();
        table.set_header(vec!["Location", "Target", "Reason"]);
        for d in dangling {
            table.add_row(vec![&d.location, &d.pointer, &d.reason]);
        }
        table.to_string()
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_summary(&self, conf: &Configuration) -> String {
        let mut sections = serde_json::Map::new();
        for (section, count) in section_counts(conf) {
            sections.insert(section.to_string(), count.into());
        }
        json!({
            "name": conf.info.name,
            "subtitle": conf.info.subtitle,
            "sections": sections,
        })
        .to_string()
    }

    fn format_dependencies(&self, records: &[DependencyRecord]) -> String {
        serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_list(&self, _header: &str, items: &[String]) -> String {
        serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_validation(&self, validation: &NameValidation) -> String {
        json!({
            "name": validation.name,
            "valid": validation.is_valid(),
            "errors": validation.errors,
        })
        .to_string()
    }

    fn format_dangling(&self, dangling: &[DanglingPointer]) -> String {
        serde_json::to_string_pretty(dangling).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_message(&self, message: &str) -> String {
        json!({ "message": message }).to_string()
    }
}
