//! Content hashes recorded at publish time.
//!
//! Both hashes are lowercase hex SHA-256. The source hash is taken over the
//! JSON serialization of the tree; attribute maps serialize with sorted keys,
//! so equal trees always hash equally.

use canon_tree::Node;
use sha2::{Digest, Sha256};

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Hash of published storage markup.
#[must_use]
pub fn content_hash(markup: &str) -> String {
    sha256_hex(markup.as_bytes())
}

/// Hash of a standard's source tree.
///
/// # Errors
///
/// Returns an error if the tree cannot be serialized.
pub fn source_hash(source: &Node) -> Result<String, serde_json::Error> {
    Ok(sha256_hex(&serde_json::to_vec(source)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_content_hash_known_value() {
        assert_eq!(
            content_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_source_hash_ignores_attribute_order() {
        let a: Node = serde_json::from_value(json!({
            "type": "doc",
            "content": [{"type": "panel", "attrs": {"panelType": "info", "x": 1}, "content": []}]
        }))
        .unwrap();
        let b: Node = serde_json::from_value(json!({
            "type": "doc",
            "content": [{"type": "panel", "attrs": {"x": 1, "panelType": "info"}, "content": []}]
        }))
        .unwrap();
        assert_eq!(source_hash(&a).unwrap(), source_hash(&b).unwrap());
    }

    #[test]
    fn test_source_hash_changes_with_text() {
        let a = Node::doc(vec![Node::paragraph(vec![Node::text("v1")])]);
        let b = Node::doc(vec![Node::paragraph(vec![Node::text("v2")])]);
        assert_ne!(source_hash(&a).unwrap(), source_hash(&b).unwrap());
    }
}
