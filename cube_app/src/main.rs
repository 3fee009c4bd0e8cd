//! Spinning cube demo
//!
//! Builds a three-node scene (root, cube, camera), renders a handful of
//! frames against the headless surface and logs what the renderer did.
//! Swap in a real graphics backend to put the same scene on screen.

use glade_engine::prelude::*;
use log::info;

/// Flat non-indexed triangle list for a unit cube centered at the origin.
fn cube_positions(size: f32) -> Vec<f32> {
    let half = size / 2.0;
    let faces: [[f32; 18]; 6] = [
        // front
        [
            -half, -half, half, half, -half, half, -half, half, half, //
            -half, half, half, half, -half, half, half, half, half,
        ],
        // back
        [
            half, -half, -half, -half, -half, -half, half, half, -half, //
            half, half, -half, -half, -half, -half, -half, half, -half,
        ],
        // left
        [
            -half, -half, -half, -half, -half, half, -half, half, -half, //
            -half, half, -half, -half, -half, half, -half, half, half,
        ],
        // right
        [
            half, -half, half, half, -half, -half, half, half, half, //
            half, half, half, half, -half, -half, half, half, -half,
        ],
        // top
        [
            -half, half, half, half, half, half, -half, half, -half, //
            -half, half, -half, half, half, half, half, half, -half,
        ],
        // bottom
        [
            -half, -half, -half, half, -half, -half, -half, -half, half, //
            -half, -half, half, half, -half, -half, half, -half, half,
        ],
    ];
    faces.iter().flatten().copied().collect()
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut tree = SceneTree::new();
    let mut assets = Assets::new();
    let mut surface = HeadlessSurface::new(800, 640);

    let root = tree.create_node("scene");
    assets.nodes.register("scene", root)?;

    let cube = tree.create_node("cube");
    tree.append_child(root, cube)?;
    tree.attach_component(cube, ComponentData::Mesh(Mesh::from_positions(cube_positions(2.0))?))?;
    let cube_transform = tree.attach_component(cube, ComponentData::Transform(Transform::new()))?;

    let eye = tree.create_node("eye");
    tree.append_child(root, eye)?;
    let mut eye_transform = Transform::new();
    eye_transform.local_mut().translate(0.0, 2.0, 10.0);
    eye_transform.local_mut().look_at(Vec3::zeros());
    tree.attach_component(eye, ComponentData::Transform(eye_transform))?;

    let mut camera = Camera::new();
    camera.project_central(800.0 / 640.0, 45.0);
    camera.set_background(Vec3::new(0.1, 0.1, 0.15));
    let camera_key = tree.attach_component(eye, ComponentData::Camera(camera))?;

    let mut viewports: Registry<Viewport> = Registry::new();
    let viewport = Viewport::new("main", root, camera_key, &mut tree, &mut assets, &mut surface)?;
    viewport.log_scene_graph(&tree);
    viewports.register("main", viewport)?;

    let viewport = viewports
        .get_mut("main")
        .ok_or("viewport disappeared from the registry")?;
    for frame in 0..5 {
        if let Some(transform) = tree.component_mut(cube_transform)?.as_transform_mut() {
            transform.local_mut().rotate_y(12.0);
        }
        viewport.draw_scene(&mut tree, &mut assets, &mut surface)?;
        info!(
            "frame {frame}: {} draw calls so far",
            surface.draw_calls().len()
        );
    }

    let last = surface
        .draw_calls()
        .last()
        .ok_or("renderer issued no draw calls")?;
    info!(
        "cube drawn as {} vertices, final matrix column 3 = {:?}",
        last.count,
        &last.matrix[12..16]
    );
    Ok(())
}

fn main() {
    glade_engine::foundation::logging::init();
    if let Err(error) = run() {
        log::error!("demo failed: {error}");
        std::process::exit(1);
    }
}
