//! Deterministic content addressing.

use sha2::{Digest, Sha256};

const SEPARATOR: &str = ".";

/// Returns the lowercase hex SHA-256 digest of `data` joined with `.`.
///
/// ```
/// use mesg_service_core::hash::calculate;
///
/// assert_eq!(calculate(&["a", "b"]), calculate(&["a.b"]));
/// ```
pub fn calculate<S: AsRef<str>>(data: &[S]) -> String {
    let mut hasher = Sha256::new();
    for (i, part) in data.iter().enumerate() {
        if i > 0 {
            hasher.update(SEPARATOR);
        }
        hasher.update(part.as_ref());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_separator() {
        assert_eq!(
            calculate(&["a", "b"]),
            "2e7336dc8eba87ef472df568c35482abf2575dc3e5eac0c5c62b8ffaeac2c934"
        );
    }

    #[test]
    fn empty_input_hashes_empty_string() {
        let empty: [&str; 0] = [];
        assert_eq!(
            calculate(&empty),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn accepts_owned_strings() {
        let parts = vec![
            String::from("service"),
            String::from("task"),
            String::from("log"),
        ];
        assert_eq!(
            calculate(&parts),
            "6f74942fad294485593756019ca0f0cfd7f2509b86bb11f77956a58e6b8820af"
        );
    }
}
