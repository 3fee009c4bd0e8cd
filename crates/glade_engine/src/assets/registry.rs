//! Generic keyed asset registry

use std::collections::HashMap;

use log::trace;
use thiserror::Error;

/// Registry errors
#[derive(Debug, Error)]
pub enum AssetError {
    /// An asset is already registered under the name
    #[error("an asset named '{0}' is already registered")]
    DuplicateName(String),

    /// No asset is registered under the name
    #[error("no asset named '{0}' is registered")]
    NotFound(String),
}

/// Name-keyed asset store
///
/// Registration rejects duplicates, removal rejects unknown names; plain
/// lookup returns `Option` so callers can install fallbacks.
#[derive(Debug)]
pub struct Registry<T> {
    entries: HashMap<String, T>,
}

impl<T> Registry<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register an asset under a name
    pub fn register(&mut self, name: impl Into<String>, asset: T) -> Result<(), AssetError> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(AssetError::DuplicateName(name));
        }
        trace!("registered asset '{name}'");
        self.entries.insert(name, asset);
        Ok(())
    }

    /// Look up an asset by name
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    /// Look up an asset mutably by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.entries.get_mut(name)
    }

    /// Whether an asset is registered under the name
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate over all registered assets
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(name, asset)| (name.as_str(), asset))
    }

    /// Remove and return the named asset
    pub fn remove(&mut self, name: &str) -> Result<T, AssetError> {
        self.entries
            .remove(name)
            .ok_or_else(|| AssetError::NotFound(name.to_string()))
    }

    /// Number of registered assets
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
