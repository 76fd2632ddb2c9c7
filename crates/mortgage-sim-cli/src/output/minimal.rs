use serde_json::Value;

use super::plain;

/// Print only the monthly payment.
///
/// A single simulation prints the bare amount; a batch prints one
/// `id: amount` line per saved record.
pub fn print_minimal(value: &Value) {
    if let Some(result) = value.get("result") {
        println!("{}", plain(result.get("mensualite").unwrap_or(result)));
        return;
    }

    if let Some(Value::Array(records)) = value.get("results") {
        for record in records {
            let id = record.get("id").map(plain).unwrap_or_default();
            let payment = record.get("mensualite").map(plain).unwrap_or_default();
            println!("{}: {}", id, payment);
        }
        return;
    }

    println!("{}", plain(value));
}
