//! Inspect command - shows what a schema file parses to.

use crate::cli::{Cli, InspectArgs, InspectFormat};
use crate::commands::load_config;
use yamlstruct_core::{error::Result, session::Converter, types::TableDefinition};

/// Runs the inspect command.
pub fn run(cli: &Cli, args: InspectArgs) -> Result<()> {
    let config = load_config(cli)?;
    let output = Converter::new(&config).inspect_file(&args.path)?;
    println!("{}", render_table(&output.table, args.format)?);
    Ok(())
}

fn render_table(table: &TableDefinition, format: InspectFormat) -> Result<String> {
    match format {
        InspectFormat::Json => Ok(serde_json::to_string_pretty(table)?),
        InspectFormat::Pretty => Ok(pretty_table(table)),
    }
}

fn pretty_table(table: &TableDefinition) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n=== {} ({}) ===\n\n",
        table.source_name, table.struct_name
    ));
    output.push_str(&format!("Description:  {}\n", table.description));
    output.push_str(&format!("Primary keys: {}\n", table.primary_keys));
    output.push_str(&format!("Columns:      {}\n\n", table.columns.len()));

    for (index, column) in table.columns.iter().enumerate() {
        output.push_str(&format!(
            "  {:>2}. {:<24} {:<8} len {:<5} {}{} //{}\n",
            index + 1,
            column.json_name,
            column.column_type,
            column.length,
            if column.fixed_length { "fixed " } else { "" },
            if column.nullable { "nullable" } else { "required" },
            column.chinese_name
        ));
    }

    output
}
