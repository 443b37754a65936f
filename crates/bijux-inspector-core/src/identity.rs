// SPDX-License-Identifier: Apache-2.0

//! Dataset identity derivation.
//!
//! A dataset id is a pure function of where the rows came from, how many rows
//! were loaded and which headers were seen, so reloading the same file yields
//! the same id and the registry upserts in place.

use crate::sha256_hex;

pub const DATASET_ID_PREFIX: &str = "ds_";
pub const TEXT_SOURCE_HASH_CHARS: usize = 20_000;
pub const LABEL_MAX_CHARS: usize = 80;

/// Source key for inline text. Only the first 20k chars feed the hash.
#[must_use]
pub fn text_source_key(text: &str) -> String {
    let head: String = text.chars().take(TEXT_SOURCE_HASH_CHARS).collect();
    let mut digest = sha256_hex(head.as_bytes());
    digest.truncate(16);
    format!("text:{digest}")
}

#[must_use]
pub fn path_source_key(path: &str) -> String {
    format!("path:{path}")
}

#[must_use]
pub fn dataset_id_for(source_key: &str, headers: &[String], row_count: usize) -> String {
    let base = format!("{source_key}\n{row_count}\n{}", headers.join("|"));
    let mut digest = sha256_hex(base.as_bytes());
    digest.truncate(16);
    format!("{DATASET_ID_PREFIX}{digest}")
}

/// Display label derived from a source key, truncated with an ellipsis past 80 chars.
#[must_use]
pub fn label_for(source_key: &str) -> String {
    if source_key.chars().count() <= LABEL_MAX_CHARS {
        return source_key.to_string();
    }
    let mut out: String = source_key.chars().take(LABEL_MAX_CHARS - 3).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_id_is_stable_and_prefixed() {
        let headers = vec!["Name".to_string(), "Age".to_string()];
        let a = dataset_id_for("path:/tmp/a.csv", &headers, 2);
        let b = dataset_id_for("path:/tmp/a.csv", &headers, 2);
        assert_eq!(a, b);
        assert!(a.starts_with(DATASET_ID_PREFIX));
        assert_eq!(a.len(), DATASET_ID_PREFIX.len() + 16);
    }

    #[test]
    fn dataset_id_changes_with_row_count_or_headers() {
        let headers = vec!["Name".to_string()];
        let base = dataset_id_for("path:x", &headers, 2);
        assert_ne!(base, dataset_id_for("path:x", &headers, 3));
        assert_ne!(base, dataset_id_for("path:x", &["Other".to_string()], 2));
    }

    #[test]
    fn long_labels_are_truncated() {
        let long = format!("path:{}", "a".repeat(200));
        let label = label_for(&long);
        assert_eq!(label.chars().count(), LABEL_MAX_CHARS - 2);
        assert!(label.ends_with('…'));
        assert_eq!(label_for("path:short.csv"), "path:short.csv");
    }

    #[test]
    fn text_key_ignores_content_past_hash_window() {
        let base = "x".repeat(TEXT_SOURCE_HASH_CHARS);
        let a = text_source_key(&format!("{base}tail-a"));
        let b = text_source_key(&format!("{base}tail-b"));
        assert_eq!(a, b);
        assert!(a.starts_with("text:"));
    }
}
