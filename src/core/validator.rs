/*
 * Validates tally documents against a fixed JSON Schema before they are
 * accepted from disk or written to it. The schema is embedded in the binary and
 * compiled once per process. Extra properties are allowed at both levels; only
 * the required fields and their types are checked.
 */
use jsonschema::Validator;
use serde_json::Value;
use std::sync::OnceLock;

const TALLY_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "Tally list",
  "type": "object",
  "required": ["title", "entries"],
  "properties": {
    "title": { "type": "string" },
    "entries": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["name", "value", "last_updated"],
        "properties": {
          "name": { "type": "string" },
          "value": { "type": "integer" },
          "last_updated": { "type": "number" }
        }
      }
    }
  }
}"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    pub violations: Vec<String>,
}

impl SchemaError {
    pub fn new(violations: Vec<String>) -> Self {
        SchemaError { violations }
    }
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Data validation failed: {}", self.violations.join("; "))
    }
}

impl std::error::Error for SchemaError {}

fn compiled_validator() -> Result<&'static Validator, SchemaError> {
    static VALIDATOR: OnceLock<Result<Validator, String>> = OnceLock::new();
    let compiled = VALIDATOR.get_or_init(|| {
        let schema: Value = serde_json::from_str(TALLY_SCHEMA)
            .map_err(|e| format!("Failed to parse tally schema: {e}"))?;
        Validator::new(&schema).map_err(|e| format!("Failed to compile tally schema: {e}"))
    });
    compiled
        .as_ref()
        .map_err(|message| SchemaError::new(vec![message.clone()]))
}

/*
 * Checks `document` against the tally schema. All violations are collected,
 * each prefixed with the JSON pointer of the offending value when it is not the
 * document root.
 */
pub fn validate(document: &Value) -> Result<(), SchemaError> {
    let validator = compiled_validator()?;
    let violations: Vec<String> = validator
        .iter_errors(document)
        .map(|error| {
            let path = error.instance_path.to_string();
            if path.is_empty() {
                error.to_string()
            } else {
                format!("{path}: {error}")
            }
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        log::debug!(
            "Validator: Document rejected with {} violation(s).",
            violations.len()
        );
        Err(SchemaError::new(violations))
    }
}
