//! The registry of label prefixes used to namespace point ids.

use std::collections::BTreeSet;

use thiserror::Error;

/// Maximum length of a normalized prefix.
pub const MAX_PREFIX_LEN: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrefixError {
    #[error("prefix must contain 1-{MAX_PREFIX_LEN} alphanumeric characters")]
    Invalid,
    #[error("prefix '{0}' already exists")]
    Duplicate(String),
}

/// Set of valid prefixes. Zero prefixes is a valid, default state; point
/// creation then defaults to the unprefixed form.
#[derive(Clone, Debug, Default)]
pub struct PrefixRegistry {
    prefixes: BTreeSet<String>,
}

impl PrefixRegistry {
    /// Trim, uppercase and strip non-alphanumeric characters.
    pub fn normalize(raw: &str) -> String {
        raw.trim()
            .to_uppercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect()
    }

    /// Normalize and insert a prefix. Returns the normalized form, or an
    /// error (without mutation) when the result is empty, too long, or
    /// already present.
    pub fn add(&mut self, raw: &str) -> Result<String, PrefixError> {
        let prefix = Self::normalize(raw);
        if prefix.is_empty() || prefix.len() > MAX_PREFIX_LEN {
            return Err(PrefixError::Invalid);
        }
        if !self.prefixes.insert(prefix.clone()) {
            return Err(PrefixError::Duplicate(prefix));
        }
        Ok(prefix)
    }

    /// Remove a prefix from the registry. Cascading deletion of points
    /// under the prefix is the caller's job (see `Document::remove_prefix`);
    /// confirmation for that cascade is a caller precondition.
    pub fn remove(&mut self, prefix: &str) -> bool {
        self.prefixes.remove(prefix)
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.prefixes.contains(prefix)
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// All prefixes in lexicographic order.
    pub fn list_sorted(&self) -> Vec<String> {
        self.prefixes.iter().cloned().collect()
    }

    pub fn first(&self) -> Option<&str> {
        self.prefixes.iter().next().map(String::as_str)
    }

    /// Total replacement from a history snapshot.
    pub fn replace_all(&mut self, prefixes: impl IntoIterator<Item = String>) {
        self.prefixes = prefixes.into_iter().collect();
    }
}
