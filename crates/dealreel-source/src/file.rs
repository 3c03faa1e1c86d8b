//! Loading raw records previously dumped to a JSON file.

use std::path::Path;

use dealreel_extract::RawRecord;
use serde_json::Value;

use crate::error::SourceError;

/// Reads raw mapping records from `path`.
///
/// Accepts either a top-level JSON array or an object with an `items` array
/// (the catalog search response shape). Elements are passed through as-is;
/// non-object elements are left for the extractor to reject.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be read and
/// [`SourceError::Deserialize`] if it is not JSON of either accepted shape.
pub fn load_raw_records(path: &Path) -> Result<Vec<RawRecord>, SourceError> {
    let content = std::fs::read_to_string(path).map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_raw_records(&content, &path.display().to_string())
}

fn parse_raw_records(content: &str, context: &str) -> Result<Vec<RawRecord>, SourceError> {
    let deserialize_err = |source| SourceError::Deserialize {
        context: context.to_owned(),
        source,
    };

    let value: Value = serde_json::from_str(content).map_err(deserialize_err)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(deserialize_err(serde::de::Error::custom(
                    "expected an \"items\" array",
                )))
            }
        },
        _ => {
            return Err(deserialize_err(serde::de::Error::custom(
                "expected a JSON array or an object with an \"items\" array",
            )))
        }
    };

    Ok(items.into_iter().map(RawRecord::from).collect())
}
