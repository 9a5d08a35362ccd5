use crate::errors::Result;

/// Serializes a value to pretty JSON with canonical error handling.
pub fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Serializes a value to a JSON tree, used when callers need to embed extra fields.
pub fn to_json_value<T: serde::Serialize>(value: &T) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_output_is_indented() {
        let value = serde_json::json!({"key": "value"});
        let json = to_pretty_json(&value).expect("serialize");
        assert!(json.contains("\n  \"key\": \"value\""));
    }

    #[test]
    fn json_value_keeps_fields() {
        #[derive(serde::Serialize)]
        struct Sample {
            id: u32,
        }

        let value = to_json_value(&Sample { id: 7 }).expect("serialize");
        assert_eq!(value["id"], 7);
    }
}
