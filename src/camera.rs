//! Camera for ray generation and scene rendering.

use glam::DVec3;
use image::{ImageBuffer, Rgb};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;

use crate::material::{Color, BLACK};
use crate::random;
use crate::ray::Ray;
use crate::scene::Scene;

/// Camera for ray generation and scene rendering.
///
/// Pinhole model with a look-at basis, vertical field of view, optional
/// defocus blur, and multi-sample anti-aliasing. Rendering fans pixels out
/// across a rayon worker pool; every pixel owns an RNG stream derived from
/// the render seed, so results do not depend on thread scheduling.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Rendered image height in pixels
    pub image_height: u32,
    /// Number of random samples for each pixel (for anti-aliasing)
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces
    pub max_depth: u32,
    /// Russian-roulette limit handed to every ray, in (0, 1]
    pub rr_limit: f64,
    /// Seed every pixel RNG stream is derived from
    pub seed: u64,
    /// Vertical field of view in degrees
    pub vfov: f64,
    /// Point the camera looks from
    pub lookfrom: DVec3,
    /// Point the camera looks at
    pub lookat: DVec3,
    /// Camera-relative "up" direction
    pub vup: DVec3,
    /// Variation angle of rays through each pixel (defocus blur control)
    pub defocus_angle: f64,
    /// Distance from lookfrom to the plane of perfect focus
    pub focus_dist: f64,

    /// World position of the top-left pixel
    pixel00_loc: DVec3,
    /// Offset from pixel to pixel horizontally
    pixel_delta_u: DVec3,
    /// Offset from pixel to pixel vertically
    pixel_delta_v: DVec3,
    /// Defocus disk horizontal radius vector
    defocus_disk_u: DVec3,
    /// Defocus disk vertical radius vector
    defocus_disk_v: DVec3,
    /// Whether the derived parameters above are current
    initialized: bool,
}

impl Camera {
    /// Create a camera with default settings: 100x100 image, 50 samples per
    /// pixel, 90 degree FOV, no defocus blur.
    pub fn new() -> Self {
        Self {
            image_width: 100,
            image_height: 100,
            samples_per_pixel: 50,
            max_depth: 8,
            rr_limit: 0.25,
            seed: 0,
            vfov: 90.0,
            lookfrom: DVec3::ZERO,
            lookat: DVec3::NEG_Z,
            vup: DVec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            pixel00_loc: DVec3::ZERO,
            pixel_delta_u: DVec3::ZERO,
            pixel_delta_v: DVec3::ZERO,
            defocus_disk_u: DVec3::ZERO,
            defocus_disk_v: DVec3::ZERO,
            initialized: false,
        }
    }

    /// Render the scene, returning an HDR image with linear RGB values.
    ///
    /// Pixels are processed in parallel; each accumulates
    /// `samples_per_pixel` traced paths from its own RNG stream.
    pub fn render(&mut self, scene: &Scene) -> ImageBuffer<Rgb<f32>, Vec<f32>> {
        self.initialize();

        let mut image: ImageBuffer<Rgb<f32>, Vec<f32>> =
            ImageBuffer::new(self.image_width, self.image_height);

        info!(
            "Rendering on {} CPU cores...",
            rayon::current_num_threads()
        );
        let generation_start = std::time::Instant::now();
        let pb = ProgressBar::new(u64::from(self.image_width) * u64::from(self.image_height));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40} {pos}/{len} ETA: {eta}")
                .unwrap(),
        );

        let width = self.image_width;
        image
            .enumerate_pixels_mut()
            .par_bridge()
            .for_each(|(i, j, pixel)| {
                let pixel_index = u64::from(j) * u64::from(width) + u64::from(i);
                let mut rng = random::pixel_rng(self.seed, pixel_index);
                let color = self.pixel_color(scene, i, j, &mut rng);
                *pixel = Rgb([color.x as f32, color.y as f32, color.z as f32]);
                pb.inc(1);
            });

        pb.finish();
        info!("Image generated in {:.2?}", generation_start.elapsed());

        image
    }

    /// Average radiance over this pixel's samples. Pure in (scene, pixel,
    /// RNG): no state outside the RNG stream is touched.
    pub fn pixel_color(&self, scene: &Scene, i: u32, j: u32, rng: &mut ChaCha20Rng) -> Color {
        let mut accumulated = BLACK;
        for _ in 0..self.samples_per_pixel {
            let mut ray = self.get_ray(i, j, rng);
            ray.advance_to_next_hit(scene);
            accumulated += ray.trace(scene, rng);
        }
        accumulated / f64::from(self.samples_per_pixel)
    }

    /// Compute the derived viewport parameters from the public settings.
    fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.image_height = self.image_height.max(1);

        let center = self.lookfrom;

        // Viewport dimensions from the vertical field of view
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (f64::from(self.image_width) / f64::from(self.image_height));

        // Orthonormal camera frame
        let w = (self.lookfrom - self.lookat).normalize();
        let u = self.vup.cross(w).normalize();
        let v = w.cross(u);

        let viewport_u = viewport_width * u;
        let viewport_v = viewport_height * -v;

        self.pixel_delta_u = viewport_u / f64::from(self.image_width);
        self.pixel_delta_v = viewport_v / f64::from(self.image_height);

        let viewport_upper_left =
            center - (self.focus_dist * w) - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        let defocus_radius = self.focus_dist * (self.defocus_angle.to_radians() / 2.0).tan();
        self.defocus_disk_u = u * defocus_radius;
        self.defocus_disk_v = v * defocus_radius;

        self.initialized = true;
    }

    /// Generate a ray through a pixel, jittered within the pixel square and
    /// optionally across the defocus disk.
    fn get_ray<R: Rng>(&self, i: u32, j: u32, rng: &mut R) -> Ray {
        let offset_x = rng.random::<f64>() - 0.5;
        let offset_y = rng.random::<f64>() - 0.5;
        let pixel_sample = self.pixel00_loc
            + ((f64::from(i) + offset_x) * self.pixel_delta_u)
            + ((f64::from(j) + offset_y) * self.pixel_delta_v);

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.lookfrom
        } else {
            let p = random::in_unit_disk(rng);
            self.lookfrom + (p.x * self.defocus_disk_u) + (p.y * self.defocus_disk_v)
        };
        let ray_direction = (pixel_sample - ray_origin).normalize();

        Ray::new(
            ray_origin,
            ray_direction,
            self.max_depth as i32,
            self.rr_limit,
        )
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
