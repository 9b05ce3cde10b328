use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Short deterministic fingerprint of a record id, used to disambiguate
/// sibling name collisions and to name collection placeholders.
pub fn fingerprint(id: &RecordId) -> String {
    let hex = blake3::hash(id.as_str().as_bytes()).to_hex().to_string();
    hex[..8].to_string()
}

/// Normalize a title into a path segment: lowercase, alphanumerics kept,
/// everything else collapsed to single dashes.
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            dash = false;
        } else if !dash && !out.is_empty() {
            out.push('-');
            dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("untitled");
    }
    out
}

#[cfg(test)]
#[path = "../tests/model/ids_tests.rs"]
mod tests;
