use std::error::Error;
use std::f32::consts::PI;
use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant};

mod camera;
mod color;
mod display;
mod framebuffer;
mod math;
mod mesh;
mod obj;
mod projector;
mod rasterizer;
mod scene;
mod texture;

use crate::camera::Camera;
use crate::color::Color;
use crate::display::{blit, Display, TerminalDisplay, WindowDisplay};
use crate::framebuffer::Framebuffer;
use crate::math::Point;
use crate::mesh::Mesh;
use crate::scene::Scene;
use crate::texture::TextureImage;

const WIDTH: usize = 800;
const HEIGHT: usize = 600;
const CAMERA_START: Point = Point::new(0.0, -5.0, 0.0);

struct Args {
    obj: Option<PathBuf>,
    texture: Option<PathBuf>,
    term: bool,
    wireframe: bool,
    normals: bool,
    vertices: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        obj: None,
        texture: None,
        term: false,
        wireframe: false,
        normals: false,
        vertices: false,
    };

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--term" => args.term = true,
            "--wireframe" => args.wireframe = true,
            "--normals" => args.normals = true,
            "--vertices" => args.vertices = true,
            "--texture" => args.texture = it.next().map(PathBuf::from),
            other => args.obj = Some(PathBuf::from(other)),
        }
    }

    args
}

// Fallback model when no file is given: a torus of major radius 2.
fn torus(texture: TextureImage) -> Mesh {
    Mesh::surface(
        |s, t| {
            Point::new(
                s.sin() * (2.0 + t.cos()),
                s.cos() * (2.0 + t.cos()),
                -t.sin(),
            )
        },
        (0.0, 2.0 * PI),
        (0.0, 2.0 * PI),
        48,
        24,
        texture,
    )
}

fn run() -> Result<(), Box<dyn Error>> {
    // Stdout belongs to the terminal backend, so diagnostics go to a file.
    simplelog::WriteLogger::init(
        log::LevelFilter::Info,
        simplelog::Config::default(),
        File::create("softras.log")?,
    )?;

    let args = parse_args();

    let texture = match &args.texture {
        Some(path) => TextureImage::from_png_file(path)?,
        None => TextureImage::solid(Color::white()),
    };

    let mesh = match &args.obj {
        Some(path) => {
            let mut mesh = obj::load_obj(path, texture)?;
            // Center loaded models on the origin at a comfortable size.
            mesh.translate(-mesh.centroid());
            let radius = mesh
                .points
                .iter()
                .fold(0.0f32, |acc, p| acc.max(p.norm()));
            if radius > 0.0 {
                mesh.scale_about(Point::origin(), 2.5 / radius);
            }
            mesh
        }
        None => torus(texture),
    };

    let (width, height) = if args.term {
        TerminalDisplay::max_resolution()?
    } else {
        (WIDTH, HEIGHT)
    };

    let camera = Camera::new(width, height, 60.0, 80.0, 1.0, CAMERA_START);
    let mut scene = Scene::new(camera);
    scene.layers.wireframe = args.wireframe;
    scene.layers.normals = args.normals;
    scene.layers.vertices = args.vertices;
    scene.add_mesh(mesh);

    let mut display: Box<dyn Display> = if args.term {
        Box::new(TerminalDisplay::new(width, height)?)
    } else {
        Box::new(WindowDisplay::new(width, height, scene.background)?)
    };

    let mut fb = Framebuffer::new(width, height);
    let mut frame_times = Duration::new(0, 0);
    let mut frames = 0u32;

    while !display.should_close() {
        let t0 = Instant::now();

        scene.render(&mut fb);
        blit(display.as_mut(), &fb)?;

        let motion = display.poll_motion();
        if motion.reset {
            scene.camera.reset(CAMERA_START);
        } else {
            scene.camera.translate(motion.side, motion.forward, 0.0);
            scene.camera.rotate_k(motion.yaw);
            scene.camera.rotate_i(motion.pitch);
            scene.camera.rotate_j(motion.roll);
        }

        if let Some(mesh) = scene.meshes_mut().first_mut() {
            let centroid = mesh.centroid();
            mesh.rot_z_about(centroid, 0.01);
            mesh.rot_x_about(centroid, 0.007);
            mesh.rot_y_about(centroid, 0.004);
        }

        frame_times += t0.elapsed();
        frames += 1;
        if frames % 100 == 0 {
            log::info!("frame time avg: {:?}", frame_times / frames);
        }

        std::thread::sleep(Duration::from_millis(15));
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("softras: {}", e);
        std::process::exit(1);
    }
}
