//! Audit trail action names and detail redaction.
//!
//! Handlers write one audit row per mutation. The helpers here keep the
//! vocabulary consistent and make sure credentials never land in `details`.

/// Known action names for audit log entries.
pub mod actions {
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
    pub const LOGIN: &str = "login";
    pub const LOGOUT: &str = "logout";
    pub const MEMBER_ADD: &str = "member_add";
    pub const MEMBER_UPDATE: &str = "member_update";
    pub const MEMBER_REMOVE: &str = "member_remove";
    pub const THUMBNAIL_UPLOAD: &str = "thumbnail_upload";
}

/// Fields that are redacted from audit details before storage.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "token",
    "secret",
    "authorization",
    "credential",
];

/// Redact sensitive fields from a JSON value, recursing into objects and arrays.
///
/// Replaces the value of any key containing one of [`SENSITIVE_FIELDS`]
/// (case-insensitive) with `"[REDACTED]"`.
pub fn redact_sensitive_fields(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut redacted = serde_json::Map::new();
            for (key, val) in map {
                let lower_key = key.to_lowercase();
                if SENSITIVE_FIELDS.iter().any(|f| lower_key.contains(f)) {
                    redacted.insert(
                        key.clone(),
                        serde_json::Value::String("[REDACTED]".to_string()),
                    );
                } else {
                    redacted.insert(key.clone(), redact_sensitive_fields(val));
                }
            }
            serde_json::Value::Object(redacted)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(redact_sensitive_fields).collect())
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn redacts_nested_credentials() {
        let input = json!({
            "email": "a@studio.test",
            "new_password": "hunter2hunter2",
            "nested": { "refresh_token": "abc", "name": "x" },
            "list": [{ "Secret": "s" }]
        });
        let out = redact_sensitive_fields(&input);
        assert_eq!(out["email"], "a@studio.test");
        assert_eq!(out["new_password"], "[REDACTED]");
        assert_eq!(out["nested"]["refresh_token"], "[REDACTED]");
        assert_eq!(out["nested"]["name"], "x");
        assert_eq!(out["list"][0]["Secret"], "[REDACTED]");
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(redact_sensitive_fields(&json!(5)), json!(5));
        assert_eq!(redact_sensitive_fields(&json!(null)), json!(null));
    }
}
