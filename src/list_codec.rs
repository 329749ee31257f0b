//! JSON codec for persisted code lists (`["USA","CAN"]`).
//! Order is preserved exactly; de-duplication is the stores' job.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("stored list is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Strict decode: anything but a JSON array of strings is an error.
pub fn try_decode(raw: &str) -> Result<Vec<String>, DecodeError> {
    Ok(serde_json::from_str::<Vec<String>>(raw)?)
}

/// Lenient decode used on every read path. Missing or corrupt data is an empty list.
pub fn decode(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match try_decode(raw) {
        Ok(codes) => codes,
        Err(err) => {
            tracing::debug!(error = %err, "discarding unreadable stored list");
            Vec::new()
        }
    }
}

pub fn encode(codes: &[String]) -> String {
    // Vec<String> -> JSON cannot fail; the fallback keeps the signature infallible.
    serde_json::to_string(codes).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn missing_value_is_empty() {
        assert!(decode(None).is_empty());
    }

    #[test]
    fn malformed_text_is_empty() {
        assert!(decode(Some("not json")).is_empty());
        assert!(decode(Some("")).is_empty());
        assert!(decode(Some("[\"USA\"")).is_empty());
    }

    #[test]
    fn wrong_json_shape_is_empty() {
        assert!(decode(Some("{}")).is_empty());
        assert!(decode(Some("[1,2,3]")).is_empty());
        assert!(decode(Some("\"USA\"")).is_empty());
        assert!(try_decode("null").is_err());
    }

    #[test]
    fn encodes_as_plain_json_array() {
        assert_eq!(encode(&list(&["USA", "CAN"])), r#"["USA","CAN"]"#);
        assert_eq!(encode(&[]), "[]");
    }

    #[test]
    fn round_trip_preserves_order() {
        for sample in [
            list(&[]),
            list(&["USA"]),
            list(&["ZWE", "ARG", "FRA", "DEU"]),
            list(&["a\"quote", "back\\slash", "ünï"]),
        ] {
            let raw = encode(&sample);
            assert_eq!(decode(Some(&raw)), sample);
        }
    }

    #[test]
    fn decode_does_not_dedup_or_sort() {
        assert_eq!(
            decode(Some(r#"["CAN","USA","CAN"]"#)),
            list(&["CAN", "USA", "CAN"])
        );
    }
}
