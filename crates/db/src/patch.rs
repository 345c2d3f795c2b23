//! Partial-update helpers.
//!
//! Update DTOs use `Option<T>` for "leave unchanged when absent". Nullable
//! columns that clients must be able to clear use `Option<Option<T>>`:
//!
//! | JSON              | Value            | Effect         |
//! |-------------------|------------------|----------------|
//! | field absent      | `None`           | unchanged      |
//! | `"field": null`   | `Some(None)`     | set to `NULL`  |
//! | `"field": 5`      | `Some(Some(5))`  | set to `5`     |

use serde::{Deserialize, Deserializer};

/// Deserialize a present field (including `null`) as `Some(..)`.
///
/// Use together with `#[serde(default)]` so absent fields become `None`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "super::double_option")]
        assigned_to: Option<Option<i64>>,
    }

    #[test]
    fn absent_null_and_value_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"assigned_to": null}"#).unwrap();
        let value: Patch = serde_json::from_str(r#"{"assigned_to": 7}"#).unwrap();

        assert_eq!(absent.assigned_to, None);
        assert_eq!(null.assigned_to, Some(None));
        assert_eq!(value.assigned_to, Some(Some(7)));
    }
}
