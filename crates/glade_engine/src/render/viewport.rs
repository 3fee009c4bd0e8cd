//! Viewport: binds a scenegraph root and camera to a drawing surface

use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};

use crate::assets::Assets;
use crate::foundation::math::Mat4;
use crate::scene::{
    ComponentData, ComponentKey, ComponentKind, MaterialRef, Mesh, NodeKey, SceneTree, Transform,
};

use super::api::{BufferHandle, GraphicsSurface, VertexArrayHandle};
use super::material::Material;
use super::texture::Texture;
use super::{RenderError, RenderResult};

/// Interface between a scenegraph branch, a camera and a graphics surface
///
/// Construction walks the branch once to bootstrap GPU resources; every
/// frame re-runs the walk (a no-op for already-seen nodes, so new nodes get
/// their resources lazily), propagates world matrices from the true root of
/// the whole tree, and draws the branch.
///
/// The resource maps grow as nodes are encountered and are reclaimed only by
/// an explicit [`prune`](Self::prune) after structural removals.
#[derive(Debug)]
pub struct Viewport {
    name: String,
    root: NodeKey,
    camera: ComponentKey,
    vertex_arrays: HashMap<String, VertexArrayHandle>,
    buffers: HashMap<String, BufferHandle>,
    textures: HashMap<String, Texture>,
    last_size: (u32, u32),
}

impl Viewport {
    /// Create a viewport and bootstrap resources for the branch under `root`
    ///
    /// `camera` must refer to a camera component. Nodes in the branch are
    /// guaranteed a transform component afterwards; meshed nodes get their
    /// buffers, a material (the standard fallback is created and registered
    /// lazily if needed) and, when texturing is enabled, a texture kickoff.
    pub fn new(
        name: impl Into<String>,
        root: NodeKey,
        camera: ComponentKey,
        tree: &mut SceneTree,
        assets: &mut Assets,
        surface: &mut dyn GraphicsSurface,
    ) -> RenderResult<Self> {
        let mut viewport = Self {
            name: name.into(),
            root,
            camera,
            vertex_arrays: HashMap::new(),
            buffers: HashMap::new(),
            textures: HashMap::new(),
            last_size: (0, 0),
        };
        viewport.initialize_nodes(root, tree, assets, surface)?;
        Ok(viewport)
    }

    /// The viewport's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The root of the rendered branch
    pub const fn root(&self) -> NodeKey {
        self.root
    }

    /// The camera component key
    pub const fn camera(&self) -> ComponentKey {
        self.camera
    }

    /// Render one frame
    ///
    /// Does nothing while the camera is inactive. Otherwise: adapts to
    /// surface resizes, clears, bootstraps resources for nodes added since
    /// the last frame, propagates world matrices over the whole tree and
    /// draws the branch.
    pub fn draw_scene(
        &mut self,
        tree: &mut SceneTree,
        assets: &mut Assets,
        surface: &mut dyn GraphicsSurface,
    ) -> RenderResult<()> {
        let camera = self.camera_data(tree)?;
        if !camera.is_active() {
            return Ok(());
        }
        let background = camera.background();
        let background_enabled = camera.background_enabled();
        let orthographic = camera.is_orthographic();
        let field_of_view = camera.field_of_view();

        let size = surface.surface_size();
        if size != self.last_size {
            self.last_size = size;
            let (width, height) = size;
            let camera = tree
                .component_mut(self.camera)?
                .as_camera_mut()
                .ok_or_else(|| {
                    RenderError::Assertion("viewport camera key does not hold a camera".to_string())
                })?;
            if orthographic {
                camera.project_orthographic(0.0, width as f32, height as f32, 0.0);
            } else {
                camera.project_central(width as f32 / height as f32, field_of_view);
            }
            surface.set_viewport_rect(0, 0, width, height);
            debug!("viewport '{}' resized to {width}x{height}", self.name);
        }

        surface.clear([
            background.x,
            background.y,
            background.z,
            if background_enabled { 1.0 } else { 0.0 },
        ]);
        surface.set_depth_test(true);
        surface.set_backface_culling(true);

        self.initialize_nodes(self.root, tree, assets, surface)?;

        let true_root = tree.true_root(self.root);
        tree.update_world_matrices(true_root);

        let view_projection = tree.view_projection(self.camera);
        self.draw_node(self.root, &view_projection, tree, assets, surface)
    }

    /// Bootstrap GPU resources for `node` and its descendants
    ///
    /// Idempotent: nodes whose name is already keyed in the resource maps
    /// are skipped, so re-running on an initialized branch duplicates
    /// nothing.
    pub fn initialize_nodes(
        &mut self,
        node: NodeKey,
        tree: &mut SceneTree,
        assets: &mut Assets,
        surface: &mut dyn GraphicsSurface,
    ) -> RenderResult<()> {
        if !tree.node(node)?.has_component(ComponentKind::Transform) {
            tree.attach_component(node, ComponentData::Transform(Transform::new()))?;
        }

        let name = tree.node(node)?.name().to_string();
        match tree.first_component(node, ComponentKind::Mesh) {
            Some(mesh_key) => {
                self.initialize_node_resources(&name, node, mesh_key, tree, assets, surface)?;
            }
            None => debug!("no mesh attached to node '{name}'"),
        }

        let children: Vec<NodeKey> = tree.node(node)?.children().to_vec();
        for child in children {
            self.initialize_nodes(child, tree, assets, surface)?;
        }
        Ok(())
    }

    fn initialize_node_resources(
        &mut self,
        name: &str,
        node: NodeKey,
        mesh_key: ComponentKey,
        tree: &mut SceneTree,
        assets: &mut Assets,
        surface: &mut dyn GraphicsSurface,
    ) -> RenderResult<()> {
        if self.buffers.contains_key(name) {
            return Ok(());
        }

        let buffer = surface.create_buffer()?;
        let vertex_array = surface.create_vertex_array()?;
        self.buffers.insert(name.to_string(), buffer);
        self.vertex_arrays.insert(name.to_string(), vertex_array);
        surface.bind_vertex_array(vertex_array);
        surface.bind_buffer(buffer);
        surface.upload_f32(mesh_data(tree, mesh_key)?.positions());

        if tree.first_component(node, ComponentKind::Material).is_none() {
            debug!("no material attached to node '{name}', adding the standard material");
            if !assets.materials.contains(Material::STANDARD) {
                let standard = Material::standard(surface)?;
                assets.materials.register(Material::STANDARD, standard)?;
            }
            tree.attach_component(
                node,
                ComponentData::Material(MaterialRef::new(Material::STANDARD)),
            )?;
        }

        let material_name = material_reference(tree, node)?;
        let material = assets.materials.get(&material_name).ok_or_else(|| {
            RenderError::Assertion(format!(
                "node '{name}' references unregistered material '{material_name}'"
            ))
        })?;

        let mesh = mesh_data(tree, mesh_key)?;
        surface.enable_attribute(material.shader().position_attribute(), mesh.layout());

        let color_buffer = surface.create_buffer()?;
        surface.bind_buffer(color_buffer);
        surface.upload_u8(&mesh.vertex_colors(material.color()));
        surface.enable_attribute(material.shader().color_attribute(), material.color_layout());

        if material.texture_enabled() {
            let coordinate_buffer = surface.create_buffer()?;
            surface.bind_buffer(coordinate_buffer);
            surface.upload_f32(&mesh.texture_coordinates());
            surface.enable_attribute(
                material.shader().texture_coordinate_attribute(),
                material.texture_coordinate_layout(),
            );
            let texture = Texture::begin_load(surface, material.texture_source())?;
            self.textures.insert(name.to_string(), texture);
        }
        Ok(())
    }

    fn draw_node(
        &self,
        node: NodeKey,
        view_projection: &Mat4,
        tree: &SceneTree,
        assets: &Assets,
        surface: &mut dyn GraphicsSurface,
    ) -> RenderResult<()> {
        if let Some(mesh_key) = tree.first_component(node, ComponentKind::Mesh) {
            self.draw_mesh(node, mesh_key, view_projection, tree, assets, surface)?;
        }

        for child in tree.node(node)?.children() {
            self.draw_node(*child, view_projection, tree, assets, surface)?;
        }
        Ok(())
    }

    fn draw_mesh(
        &self,
        node: NodeKey,
        mesh_key: ComponentKey,
        view_projection: &Mat4,
        tree: &SceneTree,
        assets: &Assets,
        surface: &mut dyn GraphicsSurface,
    ) -> RenderResult<()> {
        let name = tree.node(node)?.name();
        let Some(vertex_array) = self.vertex_arrays.get(name) else {
            warn!("node '{name}' has no vertex array yet, skipping draw");
            return Ok(());
        };

        let material_name = material_reference(tree, node)?;
        let Some(material) = assets.materials.get(&material_name) else {
            warn!("material '{material_name}' of node '{name}' is not registered, skipping draw");
            return Ok(());
        };

        let world = tree
            .first_component(node, ComponentKind::Transform)
            .and_then(|key| tree.component(key).ok())
            .and_then(|component| component.as_transform().map(|transform| *transform.world()))
            .unwrap_or_else(Mat4::identity);

        let effective = tree
            .first_component(node, ComponentKind::Pivot)
            .and_then(|key| tree.component(key).ok())
            .and_then(|component| component.as_pivot().map(|pivot| pivot.matrix() * world));
        let effective = effective.unwrap_or(world);

        let object_view_projection = view_projection * effective;
        let mut matrix = [0.0f32; 16];
        matrix.copy_from_slice(object_view_projection.as_slice());

        let mesh = mesh_data(tree, mesh_key)?;
        surface.use_program(material.shader().program());
        surface.bind_vertex_array(*vertex_array);
        surface.enable_attribute(material.shader().position_attribute(), mesh.layout());
        surface.upload_matrix(material.shader().matrix_uniform(), &matrix);
        surface.draw_triangles(mesh.layout().offset, mesh.vertex_count() as u32);
        Ok(())
    }

    /// Drop resource map entries for nodes no longer reachable from the root
    ///
    /// The maps only ever grow during rendering; call this after removing
    /// nodes to reclaim the bookkeeping.
    pub fn prune(&mut self, tree: &SceneTree) {
        let mut live = HashSet::new();
        let mut stack = vec![self.root];
        while let Some(key) = stack.pop() {
            if let Ok(node) = tree.node(key) {
                live.insert(node.name().to_string());
                stack.extend(node.children().iter().copied());
            }
        }

        let before = self.buffers.len();
        self.vertex_arrays.retain(|name, _| live.contains(name));
        self.buffers.retain(|name, _| live.contains(name));
        self.textures.retain(|name, _| live.contains(name));
        debug!(
            "viewport '{}' pruned {} stale resource entries",
            self.name,
            before - self.buffers.len()
        );
    }

    /// Mutable access to a node's texture, e.g. to complete a pending load
    pub fn texture_mut(&mut self, node_name: &str) -> Option<&mut Texture> {
        self.textures.get_mut(node_name)
    }

    /// Log the rendered branch as a text outline
    pub fn log_scene_graph(&self, tree: &SceneTree) {
        info!("scenegraph of viewport '{}':\n{}", self.name, tree.outline(self.root));
    }

    fn camera_data<'tree>(
        &self,
        tree: &'tree SceneTree,
    ) -> RenderResult<&'tree crate::scene::Camera> {
        tree.component(self.camera)?.as_camera().ok_or_else(|| {
            RenderError::Assertion("viewport camera key does not hold a camera".to_string())
        })
    }
}

fn mesh_data<'tree>(tree: &'tree SceneTree, mesh_key: ComponentKey) -> RenderResult<&'tree Mesh> {
    tree.component(mesh_key)?.as_mesh().ok_or_else(|| {
        RenderError::Assertion("mesh registry entry does not hold mesh data".to_string())
    })
}

fn material_reference(tree: &SceneTree, node: NodeKey) -> RenderResult<String> {
    let key = tree
        .first_component(node, ComponentKind::Material)
        .ok_or_else(|| {
            RenderError::Assertion("meshed node lost its material component".to_string())
        })?;
    tree.component(key)?
        .as_material()
        .map(|reference| reference.material().to_string())
        .ok_or_else(|| {
            RenderError::Assertion("material registry entry does not hold a reference".to_string())
        })
}
