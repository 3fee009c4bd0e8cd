//! Scenegraph node

use std::collections::{HashMap, HashSet};

use log::debug;

use super::component::ComponentKind;
use super::graph::{ComponentKey, NodeKey};

/// A vertex in the scenegraph
///
/// Owns its name, an ordered child list (names unique among siblings), a
/// component registry keyed by [`ComponentKind`], and layer/tag name sets.
/// The parent reference is a bare key; structural mutation goes through
/// [`SceneTree`](super::SceneTree), which keeps both sides of every relation
/// in agreement.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    components: HashMap<ComponentKind, Vec<ComponentKey>>,
    layers: HashSet<String>,
    tags: HashSet<String>,
}

impl Node {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            components: HashMap::new(),
            layers: HashSet::new(),
            tags: HashSet::new(),
        }
    }

    /// The node's name, unique among its current siblings
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The parent node, if attached
    pub const fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeKey>) {
        self.parent = parent;
    }

    /// The ordered child keys
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeKey> {
        &mut self.children
    }

    /// Keys of all components of the given kind, in attachment order
    pub fn component_keys(&self, kind: ComponentKind) -> &[ComponentKey] {
        self.components.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Whether at least one component of the given kind is attached
    pub fn has_component(&self, kind: ComponentKind) -> bool {
        !self.component_keys(kind).is_empty()
    }

    pub(crate) fn register_component(&mut self, kind: ComponentKind, key: ComponentKey) {
        self.components.entry(kind).or_default().push(key);
    }

    pub(crate) fn unregister_component(&mut self, kind: ComponentKind, key: ComponentKey) {
        if let Some(keys) = self.components.get_mut(&kind) {
            keys.retain(|existing| *existing != key);
            if keys.is_empty() {
                self.components.remove(&kind);
            }
        }
    }

    pub(crate) fn all_component_keys(&self) -> impl Iterator<Item = ComponentKey> + '_ {
        self.components.values().flatten().copied()
    }

    /// Add the node to a named layer
    pub fn add_layer(&mut self, layer: &str) {
        if !self.layers.insert(layer.to_string()) {
            debug!("node '{}' is already on layer '{layer}'", self.name);
        }
    }

    /// Remove the node from a named layer
    pub fn remove_layer(&mut self, layer: &str) {
        if !self.layers.remove(layer) {
            debug!("node '{}' is not on layer '{layer}'", self.name);
        }
    }

    /// Whether the node is on the named layer
    pub fn has_layer(&self, layer: &str) -> bool {
        self.layers.contains(layer)
    }

    /// Iterate over the node's layers
    pub fn layers(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(String::as_str)
    }

    /// Attach a free-form tag
    pub fn add_tag(&mut self, tag: &str) {
        if !self.tags.insert(tag.to_string()) {
            debug!("node '{}' already has tag '{tag}'", self.name);
        }
    }

    /// Remove a free-form tag
    pub fn remove_tag(&mut self, tag: &str) {
        if !self.tags.remove(tag) {
            debug!("node '{}' does not have tag '{tag}'", self.name);
        }
    }

    /// Whether the node carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Iterate over the node's tags
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_and_tags_are_sets() {
        let mut node = Node::new("probe");

        node.add_layer("background");
        node.add_layer("background");
        assert_eq!(node.layers().count(), 1);
        assert!(node.has_layer("background"));

        node.remove_layer("background");
        assert!(!node.has_layer("background"));

        node.add_tag("pickable");
        assert!(node.has_tag("pickable"));
        node.remove_tag("pickable");
        assert_eq!(node.tags().count(), 0);
    }
}
