//! Ordered version-code lists held by playlists.

use std::collections::HashSet;

use crate::error::CoreError;

/// Maximum number of versions in a single playlist.
pub const MAX_PLAYLIST_VERSIONS: usize = 500;

/// Remove duplicate codes, keeping the first occurrence of each.
pub fn dedupe(codes: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    codes
        .iter()
        .filter(|c| seen.insert(c.as_str()))
        .cloned()
        .collect()
}

/// Append `new` codes that are not already in `existing`, preserving order.
pub fn merge_codes(existing: &[String], new: &[String]) -> Vec<String> {
    let mut merged = existing.to_vec();
    merged.extend(new.iter().cloned());
    dedupe(&merged)
}

/// Drop every code in `remove` from `existing`.
pub fn remove_codes(existing: &[String], remove: &[String]) -> Vec<String> {
    let remove: HashSet<&str> = remove.iter().map(String::as_str).collect();
    existing
        .iter()
        .filter(|c| !remove.contains(c.as_str()))
        .cloned()
        .collect()
}

/// Enforce the playlist size limit.
pub fn check_size(codes: &[String]) -> Result<(), CoreError> {
    if codes.len() > MAX_PLAYLIST_VERSIONS {
        return Err(CoreError::Validation(format!(
            "A playlist may hold at most {MAX_PLAYLIST_VERSIONS} versions"
        )));
    }
    Ok(())
}

/// Codes in `requested` that are missing from `found`.
pub fn missing_codes(requested: &[String], found: &[String]) -> Vec<String> {
    let found: HashSet<&str> = found.iter().map(String::as_str).collect();
    requested
        .iter()
        .filter(|c| !found.contains(c.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        assert_eq!(dedupe(&codes(&["b", "a", "b", "c", "a"])), codes(&["b", "a", "c"]));
    }

    #[test]
    fn merge_appends_only_new_codes() {
        let merged = merge_codes(&codes(&["v1", "v2"]), &codes(&["v2", "v3", "v3"]));
        assert_eq!(merged, codes(&["v1", "v2", "v3"]));
    }

    #[test]
    fn remove_preserves_order_of_rest() {
        let left = remove_codes(&codes(&["v1", "v2", "v3", "v4"]), &codes(&["v3", "v1", "zz"]));
        assert_eq!(left, codes(&["v2", "v4"]));
    }

    #[test]
    fn size_limit() {
        let many: Vec<String> = (0..=MAX_PLAYLIST_VERSIONS).map(|i| format!("v{i}")).collect();
        assert!(check_size(&many).is_err());
        assert!(check_size(&many[..MAX_PLAYLIST_VERSIONS]).is_ok());
    }

    #[test]
    fn missing_codes_reports_unknowns_in_request_order() {
        let missing = missing_codes(&codes(&["a", "b", "c"]), &codes(&["b"]));
        assert_eq!(missing, codes(&["a", "c"]));
    }
}
