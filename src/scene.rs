use crate::camera::Camera;
use crate::color::Color;
use crate::framebuffer::Framebuffer;
use crate::math::Point;
use crate::mesh::Mesh;
use crate::rasterizer::RenderContext;

/// Which render passes run for each mesh.
#[derive(Debug, Clone, Copy)]
pub struct Layers {
    pub solid: bool,
    pub wireframe: bool,
    pub normals: bool,
    pub vertices: bool,
}

impl Default for Layers {
    fn default() -> Self {
        Self {
            solid: true,
            wireframe: false,
            normals: false,
            vertices: false,
        }
    }
}

/// Owns the meshes, the camera and the light for a render session.
pub struct Scene {
    meshes: Vec<Mesh>,
    pub camera: Camera,
    light: Point,
    pub background: Color,
    pub layers: Layers,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            meshes: Vec::new(),
            camera,
            light: Point::new(1.0, -0.5, -2.0).normalize(),
            background: Color::grey(128),
            layers: Layers::default(),
        }
    }

    /// The light direction is kept unit-length so the shading scalar stays in
    /// its designed range.
    pub fn set_light(&mut self, light: Point) {
        self.light = light.normalize();
    }

    pub fn light(&self) -> Point {
        self.light
    }

    pub fn add_mesh(&mut self, mesh: Mesh) {
        self.meshes.push(mesh);
    }

    pub fn remove_mesh(&mut self) -> Option<Mesh> {
        self.meshes.pop()
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn meshes_mut(&mut self) -> &mut Vec<Mesh> {
        &mut self.meshes
    }

    /// Render one frame into `fb`: clear both buffers, then run the enabled
    /// layers over every mesh in insertion order.
    pub fn render(&self, fb: &mut Framebuffer) {
        fb.clear(self.background);
        let mut ctx = RenderContext {
            fb,
            light: self.light,
        };
        if self.layers.solid {
            for mesh in &self.meshes {
                mesh.draw_solid(&self.camera, &mut ctx);
            }
        }
        if self.layers.wireframe {
            for mesh in &self.meshes {
                mesh.wireframe(&self.camera, &mut ctx, Color::red());
            }
        }
        if self.layers.normals {
            for mesh in &self.meshes {
                mesh.draw_normals(&self.camera, &mut ctx, Color::green());
            }
        }
        if self.layers.vertices {
            for mesh in &self.meshes {
                mesh.draw_vertices(&self.camera, &mut ctx, Color::blue());
            }
        }
    }
}
