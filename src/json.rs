//! File-or-inline disambiguation for JSON command arguments.

use serde_json::Value;

use crate::errors::Error;
use crate::prelude::Result;
use crate::types::{Permission, SignedTransaction};

/// Parse an argument that is either inline JSON or a path to a JSON file.
///
/// Input whose first non-whitespace character is `{` or `[` is always
/// treated as inline JSON, even if a file of that name exists. This
/// heuristic is documented behavior: an argument can be both valid JSON and
/// a valid filename, and the leading brace wins.
pub fn value_from_file_or_inline(arg: &str) -> Result<Value> {
    if looks_inline(arg) {
        return serde_json::from_str(arg)
            .map_err(|err| Error::Validation(format!("failed to parse inline JSON: {err}")));
    }
    let text = std::fs::read_to_string(arg)
        .map_err(|err| Error::Validation(format!("cannot read {arg}: {err}")))?;
    serde_json::from_str(&text)
        .map_err(|err| Error::Validation(format!("failed to parse JSON in {arg}: {err}")))
}

fn looks_inline(arg: &str) -> bool {
    matches!(arg.trim_start().chars().next(), Some('{') | Some('['))
}

pub fn permission_from_arg(arg: &str) -> Result<Permission> {
    let value = value_from_file_or_inline(arg)?;
    serde_json::from_value(value)
        .map_err(|err| Error::Validation(format!("failed to parse permission JSON: {err}")))
}

pub fn signed_transaction_from_arg(arg: &str) -> Result<SignedTransaction> {
    let value = value_from_file_or_inline(arg)?;
    serde_json::from_value(value)
        .map_err(|err| Error::Validation(format!("failed to parse transaction JSON: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inline_objects_and_arrays_win_over_files() {
        assert_eq!(
            value_from_file_or_inline(r#"  {"a": 1}"#).unwrap(),
            json!({"a": 1})
        );
        assert_eq!(value_from_file_or_inline("[1, 2]").unwrap(), json!([1, 2]));
    }

    #[test]
    fn non_json_input_falls_back_to_the_filesystem() {
        let dir = std::env::temp_dir().join("quillc-json-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("perm.json");
        std::fs::write(&path, r#"{"name": "issue", "threshold": 1, "authorizers": []}"#).unwrap();

        let perm = permission_from_arg(path.to_str().unwrap()).unwrap();
        assert_eq!(perm.name, "issue");
        assert_eq!(perm.threshold, 1);
    }

    #[test]
    fn missing_file_is_a_validation_error() {
        let err = value_from_file_or_inline("/nonexistent/path.json").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("/nonexistent/path.json"));
    }

    #[test]
    fn malformed_inline_json_is_a_validation_error() {
        let err = value_from_file_or_inline("{not json").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
