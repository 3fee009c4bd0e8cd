//! Component model
//!
//! Components are attachable data units bound to at most one node at a time.
//! The variant set is closed and known at design time, so the registry key is
//! a fieldless enum rather than a runtime type name.

use std::fmt;

use super::camera::Camera;
use super::graph::NodeKey;
use super::material::MaterialRef;
use super::mesh::Mesh;
use super::transform::{Pivot, Transform};

/// Discriminant for the closed component set
///
/// Used as the key of a node's component registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Local transform affecting the node and its descendants
    Transform,
    /// Local transform applied to the mesh only
    Pivot,
    /// Vertex data for drawing
    Mesh,
    /// Reference to a material asset
    Material,
    /// Projection and view data
    Camera,
}

impl ComponentKind {
    /// Whether a node may hold at most one component of this kind
    ///
    /// The renderer only ever consumes the first transform, mesh, material
    /// and camera of a node, so duplicates of those could never take effect.
    pub const fn is_singleton(self) -> bool {
        !matches!(self, ComponentKind::Pivot)
    }

    /// Lower-case name for diagnostics
    pub const fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Transform => "transform",
            ComponentKind::Pivot => "pivot",
            ComponentKind::Mesh => "mesh",
            ComponentKind::Material => "material",
            ComponentKind::Camera => "camera",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a component
#[derive(Debug, Clone)]
pub enum ComponentData {
    /// See [`Transform`]
    Transform(Transform),
    /// See [`Pivot`]
    Pivot(Pivot),
    /// See [`Mesh`]
    Mesh(Mesh),
    /// See [`MaterialRef`]
    Material(MaterialRef),
    /// See [`Camera`]
    Camera(Camera),
}

impl ComponentData {
    /// The discriminant of this payload
    pub const fn kind(&self) -> ComponentKind {
        match self {
            ComponentData::Transform(_) => ComponentKind::Transform,
            ComponentData::Pivot(_) => ComponentKind::Pivot,
            ComponentData::Mesh(_) => ComponentKind::Mesh,
            ComponentData::Material(_) => ComponentKind::Material,
            ComponentData::Camera(_) => ComponentKind::Camera,
        }
    }
}

/// An attachable component: payload plus container back-reference
///
/// The back-reference is a bare key, never an owning pointer; the node's
/// registry and this field are kept in agreement by
/// [`SceneTree::set_container`](super::SceneTree::set_container).
#[derive(Debug, Clone)]
pub struct Component {
    container: Option<NodeKey>,
    data: ComponentData,
}

impl Component {
    pub(crate) fn new(data: ComponentData) -> Self {
        Self {
            container: None,
            data,
        }
    }

    /// The discriminant of this component
    pub const fn kind(&self) -> ComponentKind {
        self.data.kind()
    }

    /// Whether this component's kind is singleton-flagged
    pub const fn is_singleton(&self) -> bool {
        self.kind().is_singleton()
    }

    /// The node this component is attached to, if any
    pub const fn container(&self) -> Option<NodeKey> {
        self.container
    }

    pub(crate) fn set_container(&mut self, container: Option<NodeKey>) {
        self.container = container;
    }

    /// Borrow the payload
    pub const fn data(&self) -> &ComponentData {
        &self.data
    }

    /// Borrow the payload mutably
    pub fn data_mut(&mut self) -> &mut ComponentData {
        &mut self.data
    }

    /// Downcast to a transform payload
    pub const fn as_transform(&self) -> Option<&Transform> {
        match &self.data {
            ComponentData::Transform(transform) => Some(transform),
            _ => None,
        }
    }

    /// Downcast to a mutable transform payload
    pub fn as_transform_mut(&mut self) -> Option<&mut Transform> {
        match &mut self.data {
            ComponentData::Transform(transform) => Some(transform),
            _ => None,
        }
    }

    /// Downcast to a pivot payload
    pub const fn as_pivot(&self) -> Option<&Pivot> {
        match &self.data {
            ComponentData::Pivot(pivot) => Some(pivot),
            _ => None,
        }
    }

    /// Downcast to a mutable pivot payload
    pub fn as_pivot_mut(&mut self) -> Option<&mut Pivot> {
        match &mut self.data {
            ComponentData::Pivot(pivot) => Some(pivot),
            _ => None,
        }
    }

    /// Downcast to a mesh payload
    pub const fn as_mesh(&self) -> Option<&Mesh> {
        match &self.data {
            ComponentData::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Downcast to a material reference payload
    pub const fn as_material(&self) -> Option<&MaterialRef> {
        match &self.data {
            ComponentData::Material(material) => Some(material),
            _ => None,
        }
    }

    /// Downcast to a mutable material reference payload
    pub fn as_material_mut(&mut self) -> Option<&mut MaterialRef> {
        match &mut self.data {
            ComponentData::Material(material) => Some(material),
            _ => None,
        }
    }

    /// Downcast to a camera payload
    pub const fn as_camera(&self) -> Option<&Camera> {
        match &self.data {
            ComponentData::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Downcast to a mutable camera payload
    pub fn as_camera_mut(&mut self) -> Option<&mut Camera> {
        match &mut self.data {
            ComponentData::Camera(camera) => Some(camera),
            _ => None,
        }
    }
}
