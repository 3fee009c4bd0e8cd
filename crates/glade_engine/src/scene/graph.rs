//! Scene tree: arena storage and structural operations
//!
//! The tree is the sole owner of nodes and components. Back references in
//! both directions (node → parent, component → container) are generational
//! keys into the arenas, so removing an element can never leave a dangling
//! pointer, only a stale key that fails lookup.

use log::{debug, trace};
use slotmap::SlotMap;

use crate::foundation::math::{Mat4, Mat4Ext};

use super::component::{Component, ComponentData, ComponentKind};
use super::error::SceneError;
use super::node::Node;
use super::SceneResult;

slotmap::new_key_type! {
    /// Stable handle to a node in a [`SceneTree`]
    pub struct NodeKey;

    /// Stable handle to a component in a [`SceneTree`]
    pub struct ComponentKey;
}

/// Arena-owned scenegraph
///
/// All structural mutation happens through this type so the bookkeeping
/// invariants hold at every public API boundary:
///
/// - a node's parent lists the node among its children, and vice versa
/// - a component's container registers the component under its kind, and
///   vice versa
/// - sibling names are unique, singleton kinds appear at most once per node
#[derive(Debug, Default)]
pub struct SceneTree {
    nodes: SlotMap<NodeKey, Node>,
    components: SlotMap<ComponentKey, Component>,
}

impl SceneTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    // Node storage ---------------------------------------------------------

    /// Create a parentless node
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeKey {
        let name = name.into();
        trace!("creating node '{name}'");
        self.nodes.insert(Node::new(name))
    }

    /// Borrow a node, failing on a stale key
    pub fn node(&self, key: NodeKey) -> SceneResult<&Node> {
        self.nodes
            .get(key)
            .ok_or_else(|| SceneError::NotFound("node handle is stale".to_string()))
    }

    /// Borrow a node mutably, failing on a stale key
    pub fn node_mut(&mut self, key: NodeKey) -> SceneResult<&mut Node> {
        self.nodes
            .get_mut(key)
            .ok_or_else(|| SceneError::NotFound("node handle is stale".to_string()))
    }

    /// Whether the key still refers to a live node
    pub fn contains_node(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Rename a node, re-checking sibling uniqueness
    pub fn rename_node(&mut self, key: NodeKey, name: impl Into<String>) -> SceneResult<()> {
        let name = name.into();
        let node = self.node(key)?;

        if let Some(parent) = node.parent() {
            let parent_node = self.node(parent)?;
            for sibling in parent_node.children() {
                if *sibling == key {
                    continue;
                }
                if self
                    .nodes
                    .get(*sibling)
                    .is_some_and(|existing| existing.name() == name)
                {
                    return Err(SceneError::DuplicateName {
                        parent: parent_node.name().to_string(),
                        name,
                    });
                }
            }
        }

        self.nodes[key].set_name(name);
        Ok(())
    }

    // Hierarchy ------------------------------------------------------------

    /// Attach `child` under `parent`
    ///
    /// A child that already has a parent is detached from it first, so the
    /// parent/child agreement invariant is never observably broken. Fails
    /// with [`SceneError::DuplicateName`] when a sibling of the same name
    /// exists (the sibling stays attached), and with [`SceneError::Cycle`]
    /// when `child` is `parent` itself or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeKey, child: NodeKey) -> SceneResult<()> {
        let child_name = self.node(child)?.name().to_string();
        let parent_name = self.node(parent)?.name().to_string();

        let mut probe = Some(parent);
        while let Some(current) = probe {
            if current == child {
                return Err(SceneError::Cycle {
                    parent: parent_name,
                    child: child_name,
                });
            }
            probe = self.nodes.get(current).and_then(Node::parent);
        }

        for sibling in self.nodes[parent].children() {
            if self
                .nodes
                .get(*sibling)
                .is_some_and(|existing| existing.name() == child_name)
            {
                return Err(SceneError::DuplicateName {
                    parent: parent_name,
                    name: child_name,
                });
            }
        }

        if let Some(previous) = self.nodes[child].parent() {
            if let Some(previous_node) = self.nodes.get_mut(previous) {
                previous_node.children_mut().retain(|key| *key != child);
            }
        }

        self.nodes[parent].children_mut().push(child);
        self.nodes[child].set_parent(Some(parent));
        trace!("appended '{child_name}' to '{parent_name}'");
        Ok(())
    }

    /// Look up a direct child by name
    pub fn child_by_name(&self, parent: NodeKey, name: &str) -> SceneResult<NodeKey> {
        let parent_node = self.node(parent)?;
        parent_node
            .children()
            .iter()
            .copied()
            .find(|key| {
                self.nodes
                    .get(*key)
                    .is_some_and(|node| node.name() == name)
            })
            .ok_or_else(|| {
                SceneError::NotFound(format!(
                    "no child named '{name}' in node '{}'",
                    parent_node.name()
                ))
            })
    }

    /// Detach the named child, clearing its parent reference
    ///
    /// The child stays alive in the arena and can be re-attached elsewhere.
    pub fn remove_child(&mut self, parent: NodeKey, name: &str) -> SceneResult<NodeKey> {
        let child = self.child_by_name(parent, name)?;
        self.nodes[parent].children_mut().retain(|key| *key != child);
        self.nodes[child].set_parent(None);
        trace!("removed child '{name}'");
        Ok(child)
    }

    /// Remove a node, its descendants and all of their attached components
    /// from the arenas
    pub fn remove_subtree(&mut self, root: NodeKey) -> SceneResult<()> {
        if let Some(parent) = self.node(root)?.parent() {
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.children_mut().retain(|key| *key != root);
            }
        }

        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            if let Some(node) = self.nodes.remove(key) {
                stack.extend(node.children().iter().copied());
                for component in node.all_component_keys() {
                    self.components.remove(component);
                }
                debug!("released node '{}'", node.name());
            }
        }
        Ok(())
    }

    /// Walk parent references up from `from` to the top of the whole tree
    pub fn true_root(&self, from: NodeKey) -> NodeKey {
        let mut current = from;
        while let Some(parent) = self.nodes.get(current).and_then(Node::parent) {
            current = parent;
        }
        current
    }

    // Components -----------------------------------------------------------

    /// Store a standalone component; it starts detached
    pub fn insert_component(&mut self, data: ComponentData) -> ComponentKey {
        self.components.insert(Component::new(data))
    }

    /// Store a component and attach it to `node` in one step
    ///
    /// On failure the component is not retained.
    pub fn attach_component(
        &mut self,
        node: NodeKey,
        data: ComponentData,
    ) -> SceneResult<ComponentKey> {
        let key = self.insert_component(data);
        match self.add_component(node, key) {
            Ok(()) => Ok(key),
            Err(error) => {
                self.components.remove(key);
                Err(error)
            }
        }
    }

    /// Borrow a component, failing on a stale key
    pub fn component(&self, key: ComponentKey) -> SceneResult<&Component> {
        self.components
            .get(key)
            .ok_or_else(|| SceneError::NotFound("component handle is stale".to_string()))
    }

    /// Borrow a component mutably, failing on a stale key
    pub fn component_mut(&mut self, key: ComponentKey) -> SceneResult<&mut Component> {
        self.components
            .get_mut(key)
            .ok_or_else(|| SceneError::NotFound("component handle is stale".to_string()))
    }

    /// Register the component with the node's registry and point the
    /// component back at the node
    ///
    /// Idempotent when the component is already attached to `node`.
    pub fn add_component(&mut self, node: NodeKey, component: ComponentKey) -> SceneResult<()> {
        if self.component(component)?.container() == Some(node) {
            return Ok(());
        }
        self.set_container(component, Some(node))
    }

    /// Remove the component from the node's registry and clear its
    /// back-reference
    ///
    /// Fails with [`SceneError::NotFound`] when the component is not
    /// attached to that node.
    pub fn remove_component(&mut self, node: NodeKey, component: ComponentKey) -> SceneResult<()> {
        if self.component(component)?.container() != Some(node) {
            return Err(SceneError::NotFound(format!(
                "component is not attached to node '{}'",
                self.node(node)?.name()
            )));
        }
        self.set_container(component, None)
    }

    /// Move a component to a new container (or detach it with `None`)
    ///
    /// Two-phase: both sides are validated before either is mutated, so a
    /// failure leaves the previous attachment fully intact and the error is
    /// surfaced to the caller.
    pub fn set_container(
        &mut self,
        component: ComponentKey,
        target: Option<NodeKey>,
    ) -> SceneResult<()> {
        let (kind, current) = {
            let existing = self.component(component)?;
            (existing.kind(), existing.container())
        };
        if current == target {
            return Ok(());
        }

        // Validate: the target can accept the component and the previous
        // container actually holds it.
        if let Some(new_node) = target {
            let node = self.node(new_node)?;
            if kind.is_singleton() && node.has_component(kind) {
                return Err(SceneError::DuplicateSingleton {
                    node: node.name().to_string(),
                    kind,
                });
            }
        }
        if let Some(previous) = current {
            let previous_node = self.node(previous)?;
            if !previous_node.component_keys(kind).contains(&component) {
                return Err(SceneError::NotFound(format!(
                    "component missing from the registry of node '{}'",
                    previous_node.name()
                )));
            }
        }

        // Commit: infallible from here on.
        if let Some(previous) = current {
            self.nodes[previous].unregister_component(kind, component);
        }
        if let Some(new_node) = target {
            self.nodes[new_node].register_component(kind, component);
            debug!("attached {kind} component to '{}'", self.nodes[new_node].name());
        } else {
            debug!("detached {kind} component");
        }
        self.components[component].set_container(target);
        Ok(())
    }

    /// Keys of all components of `kind` on `node` (empty for stale keys)
    pub fn components_of(&self, node: NodeKey, kind: ComponentKind) -> &[ComponentKey] {
        self.nodes
            .get(node)
            .map_or(&[], |found| found.component_keys(kind))
    }

    /// The first component of `kind` on `node`, if any
    pub fn first_component(&self, node: NodeKey, kind: ComponentKind) -> Option<ComponentKey> {
        self.components_of(node, kind).first().copied()
    }

    // Frame passes ---------------------------------------------------------

    /// Recompute world matrices for the subtree rooted at `from`, pre-order
    ///
    /// A root node's world matrix equals its local matrix; every other
    /// node's equals `parent_world * local`. Nodes without a transform pass
    /// the inherited world matrix through to their children unchanged. Call
    /// with [`true_root`](Self::true_root) to refresh the whole tree.
    pub fn update_world_matrices(&mut self, from: NodeKey) {
        let seed = self
            .nodes
            .get(from)
            .and_then(Node::parent)
            .and_then(|parent| self.first_component(parent, ComponentKind::Transform))
            .and_then(|key| self.components.get(key))
            .and_then(Component::as_transform)
            .map(|transform| *transform.world());

        let mut stack = vec![(from, seed)];
        while let Some((key, inherited)) = stack.pop() {
            let world = match self
                .first_component(key, ComponentKind::Transform)
                .and_then(|transform_key| self.components.get_mut(transform_key))
                .and_then(Component::as_transform_mut)
            {
                Some(transform) => {
                    let local = *transform.local().matrix();
                    let world = inherited.map_or(local, |parent_world| parent_world * local);
                    transform.set_world(world);
                    Some(world)
                }
                None => inherited,
            };

            if let Some(node) = self.nodes.get(key) {
                for child in node.children() {
                    stack.push((*child, world));
                }
            }
        }
    }

    /// The camera's view-projection matrix
    ///
    /// The view matrix is the inverse of the container transform's local
    /// matrix. Degrades to the bare projection when the camera has no
    /// container or the container has no transform, and to identity when the
    /// key does not refer to a camera at all.
    pub fn view_projection(&self, camera: ComponentKey) -> Mat4 {
        let Some(component) = self.components.get(camera) else {
            return Mat4::identity();
        };
        let Some(camera_data) = component.as_camera() else {
            return Mat4::identity();
        };

        let view = component
            .container()
            .and_then(|node| self.first_component(node, ComponentKind::Transform))
            .and_then(|key| self.components.get(key))
            .and_then(Component::as_transform)
            .map(|transform| transform.local().matrix().cofactor_inverse());

        match view {
            Some(view) => camera_data.projection() * view,
            None => *camera_data.projection(),
        }
    }

    /// Text outline of the subtree rooted at `root`, one node per line
    pub fn outline(&self, root: NodeKey) -> String {
        let mut output = String::new();
        self.outline_node(root, 0, &mut output);
        output
    }

    fn outline_node(&self, key: NodeKey, depth: usize, output: &mut String) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        if depth == 0 {
            output.push_str(node.name());
        } else {
            output.push('\n');
            for _ in 1..depth {
                output.push_str("   ");
            }
            output.push_str("'--");
            output.push_str(node.name());
        }
        for child in node.children() {
            self.outline_node(*child, depth + 1, output);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Vec3, Vec3Ext};
    use crate::scene::{Camera, Mesh, Pivot, Transform};
    use approx::assert_relative_eq;

    fn translated_transform(x: f32, y: f32, z: f32) -> ComponentData {
        let mut transform = Transform::new();
        transform.local_mut().translate(x, y, z);
        ComponentData::Transform(transform)
    }

    #[test]
    fn append_and_remove_child_keep_both_sides_consistent() {
        let mut tree = SceneTree::new();
        let parent = tree.create_node("parent");
        let child = tree.create_node("child");

        tree.append_child(parent, child).unwrap();
        assert_eq!(tree.node(child).unwrap().parent(), Some(parent));
        assert_eq!(tree.child_by_name(parent, "child").unwrap(), child);

        let removed = tree.remove_child(parent, "child").unwrap();
        assert_eq!(removed, child);
        assert_eq!(tree.node(child).unwrap().parent(), None);
        assert!(matches!(
            tree.child_by_name(parent, "child"),
            Err(SceneError::NotFound(_))
        ));
    }

    #[test]
    fn duplicate_sibling_name_is_rejected_and_original_stays() {
        let mut tree = SceneTree::new();
        let parent = tree.create_node("parent");
        let first = tree.create_node("twin");
        let second = tree.create_node("twin");

        tree.append_child(parent, first).unwrap();
        assert!(matches!(
            tree.append_child(parent, second),
            Err(SceneError::DuplicateName { .. })
        ));
        assert_eq!(tree.child_by_name(parent, "twin").unwrap(), first);
        assert_eq!(tree.node(second).unwrap().parent(), None);
    }

    #[test]
    fn appending_reparents_from_the_previous_parent() {
        let mut tree = SceneTree::new();
        let first = tree.create_node("first");
        let second = tree.create_node("second");
        let child = tree.create_node("child");

        tree.append_child(first, child).unwrap();
        tree.append_child(second, child).unwrap();

        assert!(tree.node(first).unwrap().children().is_empty());
        assert_eq!(tree.node(child).unwrap().parent(), Some(second));
    }

    #[test]
    fn renaming_rechecks_sibling_uniqueness() {
        let mut tree = SceneTree::new();
        let parent = tree.create_node("parent");
        let first = tree.create_node("first");
        let second = tree.create_node("second");
        tree.append_child(parent, first).unwrap();
        tree.append_child(parent, second).unwrap();

        assert!(matches!(
            tree.rename_node(second, "first"),
            Err(SceneError::DuplicateName { .. })
        ));
        assert_eq!(tree.node(second).unwrap().name(), "second");

        tree.rename_node(second, "renamed").unwrap();
        assert_eq!(tree.child_by_name(parent, "renamed").unwrap(), second);
    }

    #[test]
    fn appending_an_ancestor_is_a_cycle() {
        let mut tree = SceneTree::new();
        let root = tree.create_node("root");
        let child = tree.create_node("child");
        tree.append_child(root, child).unwrap();

        assert!(matches!(
            tree.append_child(child, root),
            Err(SceneError::Cycle { .. })
        ));
    }

    #[test]
    fn component_moves_between_nodes_atomically() {
        let mut tree = SceneTree::new();
        let first = tree.create_node("first");
        let second = tree.create_node("second");
        let mesh = tree
            .insert_component(ComponentData::Mesh(
                Mesh::from_positions(vec![0.0; 9]).unwrap(),
            ));

        tree.add_component(first, mesh).unwrap();
        assert_eq!(tree.component(mesh).unwrap().container(), Some(first));

        tree.set_container(mesh, Some(second)).unwrap();
        assert_eq!(tree.component(mesh).unwrap().container(), Some(second));
        assert!(tree.components_of(first, ComponentKind::Mesh).is_empty());
        assert_eq!(tree.components_of(second, ComponentKind::Mesh), &[mesh]);
    }

    #[test]
    fn second_singleton_is_rejected_without_side_effects() {
        let mut tree = SceneTree::new();
        let node = tree.create_node("node");
        let first = tree.insert_component(ComponentData::Transform(Transform::new()));
        let second = tree.insert_component(ComponentData::Transform(Transform::new()));

        tree.add_component(node, first).unwrap();
        assert!(matches!(
            tree.add_component(node, second),
            Err(SceneError::DuplicateSingleton { .. })
        ));

        assert_eq!(tree.components_of(node, ComponentKind::Transform), &[first]);
        assert_eq!(tree.component(second).unwrap().container(), None);
    }

    #[test]
    fn failed_move_keeps_the_previous_attachment() {
        let mut tree = SceneTree::new();
        let source = tree.create_node("source");
        let target = tree.create_node("target");
        let moving = tree.insert_component(ComponentData::Transform(Transform::new()));
        let blocking = tree.insert_component(ComponentData::Transform(Transform::new()));

        tree.add_component(source, moving).unwrap();
        tree.add_component(target, blocking).unwrap();

        assert!(tree.set_container(moving, Some(target)).is_err());
        assert_eq!(tree.component(moving).unwrap().container(), Some(source));
        assert_eq!(tree.components_of(source, ComponentKind::Transform), &[moving]);
    }

    #[test]
    fn multiple_pivots_may_coexist() {
        let mut tree = SceneTree::new();
        let node = tree.create_node("node");

        tree.attach_component(node, ComponentData::Pivot(Pivot::new()))
            .unwrap();
        tree.attach_component(node, ComponentData::Pivot(Pivot::new()))
            .unwrap();

        assert_eq!(tree.components_of(node, ComponentKind::Pivot).len(), 2);
    }

    #[test]
    fn removing_an_unattached_component_is_not_found() {
        let mut tree = SceneTree::new();
        let node = tree.create_node("node");
        let stray = tree.insert_component(ComponentData::Pivot(Pivot::new()));

        assert!(matches!(
            tree.remove_component(node, stray),
            Err(SceneError::NotFound(_))
        ));
    }

    #[test]
    fn world_matrices_accumulate_down_a_chain() {
        let mut tree = SceneTree::new();
        let root = tree.create_node("root");
        let child = tree.create_node("child");
        let grandchild = tree.create_node("grandchild");
        tree.append_child(root, child).unwrap();
        tree.append_child(child, grandchild).unwrap();

        tree.attach_component(root, translated_transform(1.0, 0.0, 0.0))
            .unwrap();
        tree.attach_component(child, translated_transform(0.0, 1.0, 0.0))
            .unwrap();
        let leaf_transform = tree
            .attach_component(grandchild, translated_transform(0.0, 0.0, 1.0))
            .unwrap();

        tree.update_world_matrices(tree.true_root(grandchild));

        let world_position = tree
            .component(leaf_transform)
            .unwrap()
            .as_transform()
            .unwrap()
            .world_position();
        assert_relative_eq!(world_position, Vec3::new(1.0, 1.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn nodes_without_transform_pass_the_world_through() {
        let mut tree = SceneTree::new();
        let root = tree.create_node("root");
        let bare = tree.create_node("bare");
        let leaf = tree.create_node("leaf");
        tree.append_child(root, bare).unwrap();
        tree.append_child(bare, leaf).unwrap();

        tree.attach_component(root, translated_transform(2.0, 0.0, 0.0))
            .unwrap();
        let leaf_transform = tree
            .attach_component(leaf, translated_transform(0.0, 3.0, 0.0))
            .unwrap();

        tree.update_world_matrices(root);

        let world_position = tree
            .component(leaf_transform)
            .unwrap()
            .as_transform()
            .unwrap()
            .world_position();
        assert_relative_eq!(world_position, Vec3::new(2.0, 3.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn view_projection_without_transform_is_the_bare_projection() {
        let mut tree = SceneTree::new();
        let holder = tree.create_node("holder");
        let mut camera = Camera::new();
        camera.project_central(1.0, 45.0);
        let expected = *camera.projection();
        let camera_key = tree
            .attach_component(holder, ComponentData::Camera(camera))
            .unwrap();

        assert_relative_eq!(tree.view_projection(camera_key), expected, epsilon = 1e-6);
    }

    #[test]
    fn view_projection_applies_the_inverse_local_transform() {
        let mut tree = SceneTree::new();
        let holder = tree.create_node("holder");
        tree.attach_component(holder, translated_transform(0.0, 0.0, 10.0))
            .unwrap();
        let mut camera = Camera::new();
        camera.project_central(1.0, 45.0);
        let projection = *camera.projection();
        let camera_key = tree
            .attach_component(holder, ComponentData::Camera(camera))
            .unwrap();

        let expected = projection * Mat4::translation(0.0, 0.0, -10.0);
        assert_relative_eq!(tree.view_projection(camera_key), expected, epsilon = 1e-4);
    }

    #[test]
    fn remove_subtree_releases_nodes_and_components() {
        let mut tree = SceneTree::new();
        let root = tree.create_node("root");
        let child = tree.create_node("child");
        tree.append_child(root, child).unwrap();
        let transform = tree
            .attach_component(child, ComponentData::Transform(Transform::new()))
            .unwrap();

        tree.remove_subtree(child).unwrap();

        assert!(!tree.contains_node(child));
        assert!(tree.component(transform).is_err());
        assert!(tree.node(root).unwrap().children().is_empty());
    }

    #[test]
    fn outline_lists_the_hierarchy() {
        let mut tree = SceneTree::new();
        let root = tree.create_node("root");
        let child = tree.create_node("child");
        let grandchild = tree.create_node("grandchild");
        tree.append_child(root, child).unwrap();
        tree.append_child(child, grandchild).unwrap();

        let outline = tree.outline(root);
        assert_eq!(outline, "root\n'--child\n   '--grandchild");
    }

    #[test]
    fn axis_constants_are_fresh_values() {
        // Regression guard for callers relying on identity.
        assert_eq!(Vec3::up(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(Vec3::forward(), Vec3::new(0.0, 0.0, 1.0));
    }
}
