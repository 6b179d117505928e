use serde_json::Value;

use crate::spec::form::FormConfig;

/// JSON Schema describing the configuration document.
pub fn config_schema() -> Result<Value, serde_json::Error> {
    serde_json::to_value(schemars::schema_for!(FormConfig))
}
