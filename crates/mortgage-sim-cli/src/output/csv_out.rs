use serde_json::{Map, Value};
use std::io;

use super::plain;

/// Write output as CSV to stdout.
///
/// A single simulation becomes `field,value` rows; a batch becomes one row
/// per saved record with the record keys as header.
pub fn print_csv(value: &Value) {
    let mut wtr = csv::Writer::from_writer(io::stdout().lock());

    let written = match (value.get("result"), value.get("results")) {
        (Some(Value::Object(result)), _) => write_fields(&mut wtr, result),
        (_, Some(Value::Array(records))) => write_records(&mut wtr, records),
        _ => match value {
            Value::Object(map) => write_fields(&mut wtr, map),
            other => wtr.write_record([plain(other)]),
        },
    };

    if let Err(e) = written.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        eprintln!("CSV output error: {}", e);
    }
}

fn write_fields<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    map: &Map<String, Value>,
) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in map {
        wtr.write_record([key.as_str(), &plain(val)])?;
    }
    Ok(())
}

fn write_records<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    records: &[Value],
) -> csv::Result<()> {
    let Some(Value::Object(first)) = records.first() else {
        return Ok(());
    };
    let headers: Vec<&String> = first.keys().collect();
    wtr.write_record(&headers)?;

    for record in records {
        let row: Vec<String> = headers
            .iter()
            .map(|h| record.get(h.as_str()).map(plain).unwrap_or_default())
            .collect();
        wtr.write_record(&row)?;
    }
    Ok(())
}
