//! End-to-end viewport tests against the headless surface

use approx::assert_relative_eq;
use glade_engine::prelude::*;

fn triangle() -> Mesh {
    Mesh::from_positions(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]).unwrap()
}

struct Stage {
    tree: SceneTree,
    assets: Assets,
    surface: HeadlessSurface,
    root: NodeKey,
    camera_key: ComponentKey,
}

/// Root with an "eye" camera child; callers hang geometry off the root.
fn stage() -> Stage {
    let mut tree = SceneTree::new();
    let root = tree.create_node("root");
    let eye = tree.create_node("eye");
    tree.append_child(root, eye).unwrap();

    let mut camera = Camera::new();
    camera.project_central(800.0 / 640.0, 45.0);
    let camera_key = tree
        .attach_component(eye, ComponentData::Camera(camera))
        .unwrap();

    Stage {
        tree,
        assets: Assets::new(),
        surface: HeadlessSurface::new(800, 640),
        root,
        camera_key,
    }
}

fn add_meshed_node(stage: &mut Stage, name: &str) -> NodeKey {
    let node = stage.tree.create_node(name);
    stage.tree.append_child(stage.root, node).unwrap();
    stage
        .tree
        .attach_component(node, ComponentData::Mesh(triangle()))
        .unwrap();
    node
}

#[test]
fn initialization_attaches_transforms_and_the_standard_material() {
    let mut stage = stage();
    let shape = add_meshed_node(&mut stage, "shape");

    Viewport::new(
        "main",
        stage.root,
        stage.camera_key,
        &mut stage.tree,
        &mut stage.assets,
        &mut stage.surface,
    )
    .unwrap();

    // Every node in the branch owns exactly one transform now.
    for key in [stage.root, shape] {
        assert_eq!(
            stage
                .tree
                .components_of(key, ComponentKind::Transform)
                .len(),
            1
        );
    }

    // The fallback material was created, registered and referenced.
    assert!(stage.assets.materials.contains(Material::STANDARD));
    let reference = stage
        .tree
        .first_component(shape, ComponentKind::Material)
        .unwrap();
    let reference = stage.tree.component(reference).unwrap();
    assert_eq!(
        reference.as_material().unwrap().material(),
        Material::STANDARD
    );

    // Vertex buffer and color buffer for the one meshed node.
    assert_eq!(stage.surface.buffer_count(), 2);
}

#[test]
fn initialization_is_idempotent() {
    let mut stage = stage();
    add_meshed_node(&mut stage, "shape");

    let mut viewport = Viewport::new(
        "main",
        stage.root,
        stage.camera_key,
        &mut stage.tree,
        &mut stage.assets,
        &mut stage.surface,
    )
    .unwrap();
    let buffers_after_init = stage.surface.buffer_count();

    viewport
        .initialize_nodes(
            stage.root,
            &mut stage.tree,
            &mut stage.assets,
            &mut stage.surface,
        )
        .unwrap();
    viewport
        .draw_scene(&mut stage.tree, &mut stage.assets, &mut stage.surface)
        .unwrap();

    assert_eq!(stage.surface.buffer_count(), buffers_after_init);
}

#[test]
fn draw_issues_one_call_per_meshed_node_with_the_composed_matrix() {
    let mut stage = stage();
    let near = add_meshed_node(&mut stage, "near");
    add_meshed_node(&mut stage, "far");

    // Give one node a distinctive world position.
    let mut viewport = Viewport::new(
        "main",
        stage.root,
        stage.camera_key,
        &mut stage.tree,
        &mut stage.assets,
        &mut stage.surface,
    )
    .unwrap();
    let transform_key = stage
        .tree
        .first_component(near, ComponentKind::Transform)
        .unwrap();
    stage
        .tree
        .component_mut(transform_key)
        .unwrap()
        .as_transform_mut()
        .unwrap()
        .local_mut()
        .translate(3.0, 0.0, -5.0);

    viewport
        .draw_scene(&mut stage.tree, &mut stage.assets, &mut stage.surface)
        .unwrap();

    let calls = stage.surface.draw_calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|call| call.first == 0 && call.count == 3));

    let view_projection = stage.tree.view_projection(stage.camera_key);
    let expected = view_projection * Mat4::translation(3.0, 0.0, -5.0);
    let uploaded = Mat4::from_column_slice(&calls[0].matrix);
    assert_relative_eq!(uploaded, expected, epsilon = 1e-4);
}

#[test]
fn pivot_composes_between_view_projection_and_world() {
    let mut stage = stage();
    let shape = add_meshed_node(&mut stage, "shape");
    let mut pivot = Pivot::new();
    pivot.translate(0.0, 2.0, 0.0);
    stage
        .tree
        .attach_component(shape, ComponentData::Pivot(pivot))
        .unwrap();

    let mut viewport = Viewport::new(
        "main",
        stage.root,
        stage.camera_key,
        &mut stage.tree,
        &mut stage.assets,
        &mut stage.surface,
    )
    .unwrap();
    viewport
        .draw_scene(&mut stage.tree, &mut stage.assets, &mut stage.surface)
        .unwrap();

    let view_projection = stage.tree.view_projection(stage.camera_key);
    let expected = view_projection * (Mat4::translation(0.0, 2.0, 0.0) * Mat4::identity());
    let uploaded = Mat4::from_column_slice(&stage.surface.draw_calls()[0].matrix);
    assert_relative_eq!(uploaded, expected, epsilon = 1e-4);
}

#[test]
fn inactive_camera_suppresses_the_frame() {
    let mut stage = stage();
    add_meshed_node(&mut stage, "shape");

    let mut viewport = Viewport::new(
        "main",
        stage.root,
        stage.camera_key,
        &mut stage.tree,
        &mut stage.assets,
        &mut stage.surface,
    )
    .unwrap();
    stage
        .tree
        .component_mut(stage.camera_key)
        .unwrap()
        .as_camera_mut()
        .unwrap()
        .activate(false);

    viewport
        .draw_scene(&mut stage.tree, &mut stage.assets, &mut stage.surface)
        .unwrap();

    assert!(stage.surface.clears().is_empty());
    assert!(stage.surface.draw_calls().is_empty());
}

#[test]
fn resize_rederives_the_projection_and_viewport_rect() {
    let mut stage = stage();
    add_meshed_node(&mut stage, "shape");

    let mut viewport = Viewport::new(
        "main",
        stage.root,
        stage.camera_key,
        &mut stage.tree,
        &mut stage.assets,
        &mut stage.surface,
    )
    .unwrap();
    viewport
        .draw_scene(&mut stage.tree, &mut stage.assets, &mut stage.surface)
        .unwrap();
    let projection_before = *stage
        .tree
        .component(stage.camera_key)
        .unwrap()
        .as_camera()
        .unwrap()
        .projection();

    stage.surface.set_size(1024, 768);
    viewport
        .draw_scene(&mut stage.tree, &mut stage.assets, &mut stage.surface)
        .unwrap();

    assert_eq!(
        stage.surface.viewport_rects().last(),
        Some(&(0, 0, 1024, 768))
    );
    let projection_after = *stage
        .tree
        .component(stage.camera_key)
        .unwrap()
        .as_camera()
        .unwrap()
        .projection();
    assert_ne!(projection_before, projection_after);

    // Clear color follows the camera background: opaque black by default.
    assert_eq!(stage.surface.clears().last(), Some(&[0.0, 0.0, 0.0, 1.0]));
}

#[test]
fn nodes_added_after_construction_are_bootstrapped_next_frame() {
    let mut stage = stage();

    let mut viewport = Viewport::new(
        "main",
        stage.root,
        stage.camera_key,
        &mut stage.tree,
        &mut stage.assets,
        &mut stage.surface,
    )
    .unwrap();
    assert_eq!(stage.surface.buffer_count(), 0);

    add_meshed_node(&mut stage, "latecomer");
    viewport
        .draw_scene(&mut stage.tree, &mut stage.assets, &mut stage.surface)
        .unwrap();

    assert_eq!(stage.surface.buffer_count(), 2);
    assert_eq!(stage.surface.draw_calls().len(), 1);
}

#[test]
fn textured_material_kicks_off_a_placeholder_load() {
    let mut stage = stage();
    let shape = add_meshed_node(&mut stage, "shape");

    let program = stage.surface.standard_program().unwrap();
    let mut material =
        Material::new("wood", Vec3::new(0.6, 0.4, 0.2), &mut stage.surface, program).unwrap();
    material.add_texture("wood.png");
    stage.assets.materials.register("wood", material).unwrap();
    stage
        .tree
        .attach_component(shape, ComponentData::Material(MaterialRef::new("wood")))
        .unwrap();

    let mut viewport = Viewport::new(
        "main",
        stage.root,
        stage.camera_key,
        &mut stage.tree,
        &mut stage.assets,
        &mut stage.surface,
    )
    .unwrap();

    // Placeholder is up immediately.
    let texture = viewport.texture_mut("shape").unwrap();
    assert!(!texture.is_resident());
    let handle = texture.handle();
    assert_eq!(
        stage.surface.texture_image(handle).map(|image| (image.0, image.1)),
        Some((1, 1))
    );
    assert!(!stage.surface.has_mipmaps(handle));

    // Completion rebinds, uploads and generates mipmaps.
    let pixels = vec![255u8; 2 * 2 * 4];
    viewport
        .texture_mut("shape")
        .unwrap()
        .finish_load(&mut stage.surface, 2, 2, &pixels);
    assert!(viewport.texture_mut("shape").unwrap().is_resident());
    assert_eq!(
        stage.surface.texture_image(handle).map(|image| (image.0, image.1)),
        Some((2, 2))
    );
    assert!(stage.surface.has_mipmaps(handle));
}

#[test]
fn prune_drops_resources_of_removed_branches() {
    let mut stage = stage();
    let doomed = add_meshed_node(&mut stage, "doomed");
    add_meshed_node(&mut stage, "survivor");

    let mut viewport = Viewport::new(
        "main",
        stage.root,
        stage.camera_key,
        &mut stage.tree,
        &mut stage.assets,
        &mut stage.surface,
    )
    .unwrap();

    stage.tree.remove_subtree(doomed).unwrap();
    viewport.prune(&stage.tree);
    viewport
        .draw_scene(&mut stage.tree, &mut stage.assets, &mut stage.surface)
        .unwrap();

    assert_eq!(stage.surface.draw_calls().len(), 1);
}
