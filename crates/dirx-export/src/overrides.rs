//! Post-encoding field overrides.
//!
//! Rewrites individual columns of an already-encoded CSV table. Overrides
//! are gated by an attribute allow-list and silently skip fields that are
//! not present as columns; the table structure never changes.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ExportError, ExportResult};

/// Options for [`apply_overrides`].
#[derive(Debug, Clone, Default)]
pub struct OverrideOptions {
    /// Field-to-replacement mapping; `None` leaves the input untouched.
    pub override_map: Option<Map<String, Value>>,
    /// Allow-list of fields the override map is permitted to touch.
    pub attributes: Vec<String>,
}

/// Apply the configured overrides to every row of `csv_text`.
///
/// Without an override map the input is returned byte-identical. Otherwise
/// the table is parsed, each allow-listed override field that exists as a
/// column is set on every row, and the table is re-serialized in the same
/// dialect so the output stays re-parseable.
pub fn apply_overrides(csv_text: &str, options: &OverrideOptions) -> ExportResult<String> {
    let Some(overrides) = &options.override_map else {
        return Ok(csv_text.to_string());
    };

    debug!(overrides = overrides.len(), "applying field overrides");

    let mut reader = csv::ReaderBuilder::new().from_reader(csv_text.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ExportError::MalformedCsv(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| ExportError::MalformedCsv(e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    for (field, value) in overrides {
        if !options.attributes.iter().any(|a| a == field) {
            continue;
        }
        // Fields that are not columns are silently skipped.
        let Some(index) = headers.iter().position(|h| h == field) else {
            continue;
        };
        let cell = value_to_cell(value);
        for row in &mut rows {
            row[index] = cell.clone();
        }
    }

    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(&headers)
        .map_err(|e| ExportError::InvalidInput(format!("CSV write error: {e}")))?;
    for row in &rows {
        writer
            .write_record(row)
            .map_err(|e| ExportError::InvalidInput(format!("CSV write error: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::InvalidInput(format!("CSV write error: {e}")))?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidInput(format!("CSV write error: {e}")))
}

/// Render an override value as CSV cell text.
///
/// JSON strings are used raw; other values keep their JSON rendering, so
/// numbers and booleans appear in canonical form and arrays stay JSON
/// literals. Null clears the cell.
fn value_to_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const INPUT: &str = "a,b,c,d\n1,2,,\n3,4,,\n";

    fn options(map: Value, attributes: &[&str]) -> OverrideOptions {
        let Value::Object(map) = map else {
            panic!("override fixture must be a JSON object");
        };
        OverrideOptions {
            override_map: Some(map),
            attributes: attributes.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn overrides_allow_listed_columns_on_every_row() {
        let result = apply_overrides(INPUT, &options(json!({"c": 3, "d": "asd"}), &["c", "d"]));
        assert_eq!(result.unwrap(), "a,b,c,d\n1,2,3,asd\n3,4,3,asd\n");
    }

    #[test]
    fn skips_overrides_not_present_in_attributes() {
        let result = apply_overrides(INPUT, &options(json!({"c": 3, "d": "asd"}), &["d"]));
        assert_eq!(result.unwrap(), "a,b,c,d\n1,2,,asd\n3,4,,asd\n");
    }

    #[test]
    fn no_override_map_returns_input_byte_identical() {
        let result = apply_overrides(INPUT, &OverrideOptions::default());
        assert_eq!(result.unwrap(), INPUT);
    }

    #[test]
    fn unknown_columns_are_silently_skipped() {
        let result = apply_overrides(INPUT, &options(json!({"e": 3, "f": "asd"}), &["e"]));
        assert_eq!(result.unwrap(), INPUT);
    }

    #[test]
    fn override_values_keep_json_rendering() {
        let result = apply_overrides(
            "a,b\nx,y\n",
            &options(json!({"a": true, "b": ["1", "2"]}), &["a", "b"]),
        );
        assert_eq!(result.unwrap(), "a,b\ntrue,\"[\"\"1\"\",\"\"2\"\"]\"\n");
    }

    #[test]
    fn null_override_clears_the_column() {
        let result = apply_overrides("a,b\nx,y\n", &options(json!({"b": null}), &["b"]));
        assert_eq!(result.unwrap(), "a,b\nx,\n");
    }

    #[test]
    fn inconsistent_row_width_is_malformed() {
        let err = apply_overrides("a,b\n1\n", &options(json!({"a": 1}), &["a"])).unwrap_err();
        assert!(matches!(err, ExportError::MalformedCsv(_)));
    }

    #[test]
    fn unbalanced_quote_is_malformed() {
        let err =
            apply_overrides("a,b\n\"1,2\n3,4\n", &options(json!({"a": 1}), &["a"])).unwrap_err();
        assert!(matches!(err, ExportError::MalformedCsv(_)));
    }

    #[test]
    fn quoted_fields_survive_a_round_trip() {
        let input = "name,notes\n\"Holmes, Mycroft\",\"said \"\"hi\"\"\"\n";
        let result = apply_overrides(input, &options(json!({"none": 1}), &["none"]));
        assert_eq!(result.unwrap(), input);
    }
}
