use clap::Parser;
use glam::DVec3;
use log::info;

mod camera;
mod cli;
mod interval;
mod material;
mod output;
mod plane;
mod random;
mod ray;
mod scene;
mod sphere;

use camera::Camera;
use cli::Args;
use material::{Color, Material};
use output::{save_image_as_exr, save_image_as_png};
use plane::Plane;
use scene::{Light, Part, Scene, Sky, Thing};
use sphere::Sphere;

/// Build the demo scene: every surface behaviour on a ground plane, lit by
/// two sphere emitters under a dim background dome.
fn create_scene() -> Scene {
    let mut scene = Scene::new(Sky {
        color: Color::new(0.02, 0.02, 0.03),
    });

    // Ground
    scene.add_thing(Thing::new(
        vec![Part::Plane(Plane::new(DVec3::ZERO, DVec3::Y))],
        Material::diffuse(Color::new(0.5, 0.5, 0.5)),
    ));

    // Matte red sphere
    scene.add_thing(Thing::new(
        vec![Part::Sphere(Sphere::new(DVec3::new(-3.0, 1.0, 0.0), 1.0))],
        Material::diffuse(Color::new(0.75, 0.25, 0.25)),
    ));

    // Mirror
    scene.add_thing(Thing::new(
        vec![Part::Sphere(Sphere::new(DVec3::new(1.0, 1.0, -1.0), 1.0))],
        Material::mirror(),
    ));

    // Gold-ish metal
    scene.add_thing(Thing::new(
        vec![Part::Sphere(Sphere::new(DVec3::new(3.0, 1.0, 0.5), 1.0))],
        Material::metallic(Color::new(0.9, 0.7, 0.4), 12.0),
    ));

    // Glass sphere with an air bubble inside, nesting two volumes
    scene.add_thing(Thing::new(
        vec![Part::Sphere(Sphere::new(DVec3::new(0.0, 1.0, 1.5), 1.0))],
        Material::glass(1.5),
    ));
    scene.add_thing(Thing::new(
        vec![Part::Sphere(Sphere::new(DVec3::new(0.0, 1.0, 1.5), 0.45))],
        Material::glass(1.0),
    ));

    // Lacquered sphere: mostly diffuse with a mirror sheen
    scene.add_thing(Thing::new(
        vec![Part::Sphere(Sphere::new(DVec3::new(-1.4, 0.6, 2.2), 0.6))],
        Material::new(Color::new(0.2, 0.45, 0.25), 1.5, [0.7, 0.0, 0.3, 0.0]),
    ));

    // Key and fill lights
    scene.add_light(Light::new(
        vec![Sphere::new(DVec3::new(0.0, 7.0, 2.0), 1.2)],
        Color::new(12.0, 11.4, 10.8),
    ));
    scene.add_light(Light::new(
        vec![Sphere::new(DVec3::new(-6.0, 4.0, 4.0), 0.8)],
        Color::new(4.0, 4.4, 5.0),
    ));

    // Dim environment dome, visible only where nothing else is
    scene.add_light(Light::background(
        vec![Sphere::new(DVec3::ZERO, 50.0)],
        Color::new(0.17, 0.22, 0.3),
    ));

    scene
}

/// Camera framing the demo scene, configured from the command line.
fn create_camera(args: &Args) -> Camera {
    let mut camera = Camera::new();
    camera.image_width = args.width;
    camera.image_height = args.height;
    camera.samples_per_pixel = args.samples_per_pixel;
    camera.max_depth = args.max_depth;
    camera.rr_limit = args.rr_limit;
    camera.seed = args.seed;
    camera.vfov = 32.0;
    camera.lookfrom = DVec3::new(0.0, 2.5, 9.0);
    camera.lookat = DVec3::new(0.0, 1.0, 0.0);
    camera.vup = DVec3::Y;
    camera.defocus_angle = 0.3;
    camera.focus_dist = 9.0;
    camera
}

fn main() {
    let args = Args::parse();

    // The progress bar owns the terminal during a render; timestamps on top
    // of it are just noise.
    env_logger::Builder::from_default_env()
        .filter_level(args.debug_level.filter())
        .format_timestamp(None)
        .init();

    info!(
        "Lumapath - Git Version {} ({})",
        env!("GIT_HASH"),
        env!("GIT_DATE")
    );
    info!(
        "Image resolution: {}x{}, samples per pixel: {}, max depth: {}",
        args.width, args.height, args.samples_per_pixel, args.max_depth
    );

    let scene = create_scene();
    info!(
        "Scene: {} surfaces, {} emitters",
        scene.things.len(),
        scene.lights.len()
    );

    let mut camera = create_camera(&args);
    let image = camera.render(&scene);

    // Save image based on file extension
    if args.output.ends_with(".exr") {
        save_image_as_exr(&image, &args.output);
    } else if args.output.ends_with(".png") {
        save_image_as_png(&image, &args.output);
    } else {
        log::error!(
            "Unsupported file extension '{}'. Only .png and .exr formats are supported.",
            std::path::Path::new(&args.output)
                .extension()
                .unwrap_or_default()
                .to_string_lossy()
        );
        std::process::exit(1);
    }
}
