use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::plain;

/// Columns shown when listing saved records; the full record is in JSON output.
const RECORD_COLUMNS: [&str; 8] = [
    "id",
    "client_id",
    "prix_bien",
    "total_financer",
    "mensualite",
    "interets_total",
    "salaire_minimum",
    "date_financement",
];

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    if let Some(Value::Object(result)) = value.get("result") {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in result {
            builder.push_record([key.clone(), plain(val)]);
        }
        println!("{}", Table::from(builder));
    } else if let Some(Value::Array(records)) = value.get("results") {
        print_records(records);
    } else {
        println!("{}", value);
    }

    print_warnings(value);

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_records(records: &[Value]) {
    if records.is_empty() {
        println!("(no simulations)");
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(RECORD_COLUMNS);
    for record in records {
        builder.push_record(
            RECORD_COLUMNS
                .iter()
                .map(|col| record.get(*col).map(plain).unwrap_or_default()),
        );
    }
    println!("{}", Table::from(builder));
}

fn print_warnings(value: &Value) {
    let Some(Value::Array(warnings)) = value.get("warnings") else {
        return;
    };
    if warnings.is_empty() {
        return;
    }
    println!("\nWarnings:");
    for w in warnings.iter().filter_map(Value::as_str) {
        println!("  - {}", w);
    }
}
