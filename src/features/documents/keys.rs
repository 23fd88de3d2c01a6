//! Storage key derivation.
//!
//! Keys are never persisted; every access re-derives them from the record.

use uuid::Uuid;

use crate::features::documents::models::Visibility;

/// Derive the bucket key `"<folder>/<id>-<display name>"` for a document
pub fn derive_key(visibility: Visibility, id: Uuid, display_name: &str) -> String {
    format!("{}/{}-{}", visibility.folder(), id, display_name.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_layout() {
        let id = Uuid::parse_str("0b4e7c9a-2f1d-4c3b-9a8e-5d6f7a8b9c0d").unwrap();
        assert_eq!(
            derive_key(Visibility::Student, id, " notes.pdf "),
            "student/0b4e7c9a-2f1d-4c3b-9a8e-5d6f7a8b9c0d-notes.pdf"
        );
        assert!(derive_key(Visibility::Public, id, "a.txt").starts_with("public/"));
        assert!(derive_key(Visibility::Teacher, id, "a.txt").starts_with("teacher/"));
    }

    #[test]
    fn test_deterministic() {
        let id = Uuid::new_v4();
        assert_eq!(
            derive_key(Visibility::Teacher, id, "exam.docx"),
            derive_key(Visibility::Teacher, id, "exam.docx")
        );
    }

    #[test]
    fn test_distinct_inputs_give_distinct_keys() {
        let ids = [Uuid::new_v4(), Uuid::new_v4()];
        let names = ["report.pdf", "report.txt", "notes.pdf"];

        let mut keys = HashSet::new();
        let mut count = 0;
        for visibility in Visibility::ALL {
            for id in ids {
                for name in names {
                    keys.insert(derive_key(visibility, id, name));
                    count += 1;
                }
            }
        }
        assert_eq!(keys.len(), count);
    }
}
