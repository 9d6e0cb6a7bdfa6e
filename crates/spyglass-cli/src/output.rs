//! Table, JSON, and CSV rendering for flattened records.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use anyhow::Context;
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use serde_json::Value;

use spyglass_graphql::ResponseRecord;

/// Print records as a table, or pretty JSON when `json` is set.
pub fn print_records<R: ResponseRecord>(records: &[R], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("(no records)");
        return Ok(());
    }
    println!("{}", records_table(records)?);
    Ok(())
}

/// Build a table whose columns are the union of all flattened keys.
pub fn records_table<R: ResponseRecord>(records: &[R]) -> anyhow::Result<Table> {
    let rows = flatten_all(records)?;
    let columns = column_union(&rows);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(columns.clone());
    for row in &rows {
        table.add_row(
            columns
                .iter()
                .map(|column| row.get(column).map_or_else(String::new, cell_text)),
        );
    }
    Ok(table)
}

/// Write records as CSV with a stable header: the sorted union of all
/// flattened keys. Cells absent from a record stay empty.
pub fn write_csv<R: ResponseRecord, W: Write>(records: &[R], writer: W) -> anyhow::Result<()> {
    let rows = flatten_all(records)?;
    let columns = column_union(&rows);

    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(&columns)?;
    for row in &rows {
        csv.write_record(
            columns
                .iter()
                .map(|column| row.get(column).map_or_else(String::new, cell_text)),
        )?;
    }
    csv.flush().context("flushing CSV output")?;
    Ok(())
}

fn flatten_all<R: ResponseRecord>(
    records: &[R],
) -> anyhow::Result<Vec<BTreeMap<String, Value>>> {
    records
        .iter()
        .map(|record| record.flatten().context("flattening record"))
        .collect()
}

fn column_union(rows: &[BTreeMap<String, Value>]) -> Vec<String> {
    rows.iter()
        .flat_map(|row| row.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    struct Row {
        id: String,
        #[serde(default)]
        attributes: Value,
    }

    impl ResponseRecord for Row {}

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: "span-1".to_string(),
                attributes: json!({"llm": {"model_name": "gpt-x"}}),
            },
            Row {
                id: "span-2".to_string(),
                attributes: json!({"retrieval": {"documents": 4}}),
            },
        ]
    }

    #[test]
    fn csv_header_is_the_sorted_key_union() {
        let mut out = Vec::new();
        write_csv(&rows(), &mut out).expect("csv");
        let text = String::from_utf8(out).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("attributes.llm.model_name,attributes.retrieval.documents,id")
        );
        assert_eq!(lines.next(), Some("gpt-x,,span-1"));
        assert_eq!(lines.next(), Some(",4,span-2"));
    }

    #[test]
    fn table_renders_one_row_per_record() {
        let table = records_table(&rows()).expect("table");
        let rendered = table.to_string();
        assert!(rendered.contains("span-1"));
        assert!(rendered.contains("gpt-x"));
    }
}
