use std::io::Read;
use std::process::ExitCode;

use serde_json::{json, Map, Value as Json};

use toml_decode::datetime::DateTime;
use toml_decode::{Table, Value};

/// toml-test decoder harness: reads TOML from stdin, writes the JSON
/// projection to stdout, exits non-zero if the document doesn't parse.
fn main() -> ExitCode {
    let mut input = Vec::new();
    if std::io::stdin().read_to_end(&mut input).is_err() {
        eprintln!("Error reading from stdin");
        return ExitCode::FAILURE;
    }

    match toml_decode::parse_bytes(&input) {
        Ok(table) => {
            println!("{}", Json::Object(project_table(&table)));
            ExitCode::SUCCESS
        }
        Err(err) => {
            match std::str::from_utf8(&input) {
                Ok(text) => eprintln!("{}\n{}", err.diagnostics(text), err.kind),
                Err(_) => eprintln!("{err}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn project_table(table: &Table) -> Map<String, Json> {
    table
        .iter()
        .map(|(key, value)| (key.clone(), project_value(value)))
        .collect()
}

fn project_value(value: &Value) -> Json {
    match value {
        Value::Table(table) => Json::Object(project_table(table)),
        Value::Array(values) => Json::Array(values.iter().map(project_value).collect()),
        Value::String(s) => scalar("string", s.clone()),
        Value::Integer(v) => scalar("integer", v.to_string()),
        Value::Float(v) => {
            let mut repr = format!("{v:?}");
            repr.make_ascii_lowercase();
            scalar("float", repr)
        }
        Value::Bool(v) => scalar("bool", v.to_string()),
        Value::OffsetDateTime(date, time, offset) => scalar(
            "datetime",
            DateTime::OffsetDateTime(*date, *time, *offset).to_string(),
        ),
        Value::LocalDateTime(date, time) => scalar(
            "datetime-local",
            DateTime::LocalDateTime(*date, *time).to_string(),
        ),
        Value::LocalDate(date) => scalar("date-local", DateTime::LocalDate(*date).to_string()),
        Value::LocalTime(time) => scalar("time-local", DateTime::LocalTime(*time).to_string()),
    }
}

fn scalar(ty: &str, value: String) -> Json {
    json!({ "type": ty, "value": value })
}
