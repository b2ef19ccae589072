use crate::camera::Camera;
use crate::color::Color;
use crate::math::{Point, EPSILON};
use crate::projector;
use crate::rasterizer::RenderContext;
use crate::texture::{TextureImage, Uv};

/// Indices of one face corner into the mesh's point/normal/UV tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexRef {
    pub point: usize,
    pub normal: usize,
    pub uv: usize,
}

/// One triangle. The vertex order encodes facing: counter-clockwise in
/// screen space after projection means front-facing.
#[derive(Debug, Clone, Copy)]
pub struct Face {
    pub vertices: [VertexRef; 3],
}

/// Indexed triangle mesh with its texture image. The centroid (mean of the
/// points) follows every affine operation and serves as the default pivot.
pub struct Mesh {
    pub points: Vec<Point>,
    pub normals: Vec<Point>,
    pub uvs: Vec<Uv>,
    pub faces: Vec<Face>,
    pub texture: TextureImage,
    centroid: Point,
}

impl Mesh {
    pub fn new(
        points: Vec<Point>,
        normals: Vec<Point>,
        uvs: Vec<Uv>,
        faces: Vec<Face>,
        texture: TextureImage,
    ) -> Self {
        let centroid = centroid_of(&points);
        Self {
            points,
            normals,
            uvs,
            faces,
            texture,
            centroid,
        }
    }

    pub fn centroid(&self) -> Point {
        self.centroid
    }

    pub fn translate(&mut self, d: Point) {
        for p in &mut self.points {
            *p += d;
        }
        self.centroid += d;
    }

    pub fn scale_about(&mut self, center: Point, factor: f32) {
        for p in &mut self.points {
            *p = p.scale_about(center, factor);
        }
        self.centroid = self.centroid.scale_about(center, factor);
    }

    pub fn rot_x_about(&mut self, pivot: Point, angle: f32) {
        for p in &mut self.points {
            *p = p.rot_x_about(pivot, angle);
        }
        // Normals are directions: they rotate about the origin, untouched by
        // the pivot.
        for n in &mut self.normals {
            *n = n.rot_x_about(Point::origin(), angle);
        }
        self.centroid = self.centroid.rot_x_about(pivot, angle);
    }

    pub fn rot_y_about(&mut self, pivot: Point, angle: f32) {
        for p in &mut self.points {
            *p = p.rot_y_about(pivot, angle);
        }
        for n in &mut self.normals {
            *n = n.rot_y_about(Point::origin(), angle);
        }
        self.centroid = self.centroid.rot_y_about(pivot, angle);
    }

    pub fn rot_z_about(&mut self, pivot: Point, angle: f32) {
        for p in &mut self.points {
            *p = p.rot_z_about(pivot, angle);
        }
        for n in &mut self.normals {
            *n = n.rot_z_about(Point::origin(), angle);
        }
        self.centroid = self.centroid.rot_z_about(pivot, angle);
    }

    /// Shaded, textured rendering: one projected triangle per face.
    pub fn draw_solid(&self, camera: &Camera, ctx: &mut RenderContext) {
        for face in &self.faces {
            let [a, b, c] = face.vertices;
            projector::project_triangle(
                camera,
                ctx,
                [self.points[a.point], self.points[b.point], self.points[c.point]],
                &self.texture,
                [self.uvs[a.uv], self.uvs[b.uv], self.uvs[c.uv]],
                [
                    self.normals[a.normal],
                    self.normals[b.normal],
                    self.normals[c.normal],
                ],
            );
        }
    }

    /// All three edges of every face as segments.
    pub fn wireframe(&self, camera: &Camera, ctx: &mut RenderContext, color: Color) {
        for face in &self.faces {
            for k in 0..3 {
                let a = face.vertices[k].point;
                let b = face.vertices[(k + 1) % 3].point;
                projector::project_segment(camera, ctx, self.points[a], self.points[b], color);
            }
        }
    }

    /// Every point of the mesh as a single pixel.
    pub fn draw_vertices(&self, camera: &Camera, ctx: &mut RenderContext, color: Color) {
        for &p in &self.points {
            projector::project_vertex(camera, ctx, p, color);
        }
    }

    /// A short segment along each face vertex's normal.
    pub fn draw_normals(&self, camera: &Camera, ctx: &mut RenderContext, color: Color) {
        for face in &self.faces {
            for vertex in &face.vertices {
                let p = self.points[vertex.point];
                let tip = p + self.normals[vertex.normal] * 0.1;
                projector::project_segment(camera, ctx, p, tip, color);
            }
        }
    }

    /// Tessellate the parametric surface `f(s, t)` into a grid of
    /// `precision_s` x `precision_t` vertices. Normals come from the cross
    /// product of central finite differences, with a wider diagonal stencil
    /// as fallback where the surface is locally degenerate.
    pub fn surface<F>(
        f: F,
        (min_s, max_s): (f32, f32),
        (min_t, max_t): (f32, f32),
        precision_s: usize,
        precision_t: usize,
        texture: TextureImage,
    ) -> Self
    where
        F: Fn(f32, f32) -> Point,
    {
        debug_assert!(precision_s >= 2 && precision_t >= 2);
        let ds = (max_s - min_s) / (precision_s - 1) as f32;
        let dt = (max_t - min_t) / (precision_t - 1) as f32;

        let mut points = Vec::with_capacity(precision_s * precision_t);
        let mut normals = Vec::with_capacity(precision_s * precision_t);

        for row in 0..precision_t {
            let t = min_t + row as f32 * dt;
            for col in 0..precision_s {
                let s = min_s + col as f32 * ds;
                points.push(f(s, t));

                let du = f(s - ds, t) - f(s + ds, t);
                let dv = f(s, t + dt) - f(s, t - dt);
                let mut normal = du.cross(dv);
                if normal.norm() < EPSILON {
                    let diag = f(s + ds, t + dt) - f(s - ds, t - dt);
                    normal = diag.cross(dv);
                }
                normals.push(normal.normalize());
            }
        }

        let uvs = vec![
            Uv::new(0.0, 0.0),
            Uv::new(0.0, 1.0),
            Uv::new(1.0, 0.0),
            Uv::new(1.0, 1.0),
        ];

        let mut faces = Vec::with_capacity(2 * (precision_s - 1) * (precision_t - 1));
        for row in 0..precision_t - 1 {
            for col in 0..precision_s - 1 {
                let p = row * precision_s + col;
                let corner = |point, uv| VertexRef {
                    point,
                    normal: point,
                    uv,
                };
                faces.push(Face {
                    vertices: [
                        corner(p, 1),
                        corner(p + 1, 3),
                        corner(p + precision_s, 0),
                    ],
                });
                faces.push(Face {
                    vertices: [
                        corner(p + precision_s, 0),
                        corner(p + 1, 3),
                        corner(p + 1 + precision_s, 2),
                    ],
                });
            }
        }

        Self::new(points, normals, uvs, faces, texture)
    }
}

fn centroid_of(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::origin();
    }
    let mut sum = Point::origin();
    for &p in points {
        sum += p;
    }
    sum * (1.0 / points.len() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::framebuffer::{Framebuffer, DEPTH_CLEAR};
    use crate::math::Coord;

    fn quad_mesh() -> Mesh {
        // Two triangles in the plane y = 5, facing the camera at the origin.
        let points = vec![
            Point::new(-1.0, 5.0, 1.0),
            Point::new(1.0, 5.0, 1.0),
            Point::new(1.0, 5.0, -1.0),
            Point::new(-1.0, 5.0, -1.0),
        ];
        let normals = vec![Point::new(0.0, -1.0, 0.0)];
        let uvs = vec![
            Uv::new(0.0, 0.0),
            Uv::new(1.0, 0.0),
            Uv::new(1.0, 1.0),
            Uv::new(0.0, 1.0),
        ];
        let at = |point, uv| VertexRef {
            point,
            normal: 0,
            uv,
        };
        let faces = vec![
            Face {
                vertices: [at(0, 0), at(1, 1), at(2, 2)],
            },
            Face {
                vertices: [at(0, 0), at(2, 2), at(3, 3)],
            },
        ];
        Mesh::new(points, normals, uvs, faces, TextureImage::solid(Color::white()))
    }

    fn test_camera() -> Camera {
        Camera::new(100, 100, 90.0, 90.0, 1.0, Point::origin())
    }

    fn count_written(fb: &Framebuffer) -> usize {
        let mut n = 0;
        for h in 0..fb.height() as i32 {
            for w in 0..fb.width() as i32 {
                if fb.depth_at(Coord::new(w, h)) != DEPTH_CLEAR {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn centroid_is_mean_of_points() {
        let mesh = quad_mesh();
        assert_eq!(mesh.centroid(), Point::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn translate_moves_points_and_centroid() {
        let mut mesh = quad_mesh();
        mesh.translate(Point::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.centroid(), Point::new(1.0, 7.0, 3.0));
        assert_eq!(mesh.points[0], Point::new(0.0, 7.0, 4.0));
        // Directions are unaffected by translation.
        assert_eq!(mesh.normals[0], Point::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn scale_keeps_centroid_when_pivoting_there() {
        let mut mesh = quad_mesh();
        let centroid = mesh.centroid();
        mesh.scale_about(centroid, 2.0);
        assert_eq!(mesh.centroid(), centroid);
        assert_eq!(mesh.points[0], Point::new(-2.0, 5.0, 2.0));
        assert_eq!(mesh.normals[0], Point::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn rotation_turns_normals_as_directions() {
        let mut mesh = quad_mesh();
        let pivot = mesh.centroid();
        mesh.rot_z_about(pivot, std::f32::consts::PI);
        // The normal rotated about the origin, not about the pivot.
        assert!((mesh.normals[0] - Point::new(0.0, 1.0, 0.0)).norm() < 1e-6);
        // The centroid is on the rotation axis through the pivot.
        assert!((mesh.centroid() - pivot).norm() < 1e-6);
    }

    #[test]
    fn solid_draw_covers_pixels() {
        let camera = test_camera();
        let mut fb = Framebuffer::new(100, 100);
        fb.clear(Color::black());
        let mesh = quad_mesh();
        let mut ctx = RenderContext {
            fb: &mut fb,
            // Light opposite the quad's normal: full shade.
            light: Point::new(0.0, 1.0, 0.0),
        };
        mesh.draw_solid(&camera, &mut ctx);
        assert!(count_written(&fb) > 0);
        assert_eq!(fb.pixel_at(Coord::new(50, 50)), Color::white());
        assert!((fb.depth_at(Coord::new(50, 50)) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn reversed_faces_draw_nothing() {
        let camera = test_camera();
        let mut fb = Framebuffer::new(100, 100);
        fb.clear(Color::black());
        let mut mesh = quad_mesh();
        for face in &mut mesh.faces {
            face.vertices.swap(1, 2);
        }
        let mut ctx = RenderContext {
            fb: &mut fb,
            light: Point::new(0.0, 1.0, 0.0),
        };
        mesh.draw_solid(&camera, &mut ctx);
        assert_eq!(count_written(&fb), 0);
    }

    #[test]
    fn wireframe_draws_all_three_edges() {
        let camera = test_camera();
        let mut fb = Framebuffer::new(100, 100);
        fb.clear(Color::black());

        // A single off-center triangle; each edge must leave pixels.
        let points = vec![
            Point::new(-1.0, 5.0, 1.0),
            Point::new(1.0, 5.0, 1.0),
            Point::new(1.0, 5.0, -1.0),
        ];
        let at = |point| VertexRef {
            point,
            normal: 0,
            uv: 0,
        };
        let mesh = Mesh::new(
            points,
            vec![Point::new(0.0, -1.0, 0.0)],
            vec![Uv::new(0.0, 0.0)],
            vec![Face {
                vertices: [at(0), at(1), at(2)],
            }],
            TextureImage::solid(Color::white()),
        );
        let mut ctx = RenderContext {
            fb: &mut fb,
            light: Point::new(0.0, 1.0, 0.0),
        };
        mesh.wireframe(&camera, &mut ctx, Color::red());

        // Vertices project to (40, 40), (60, 40), (60, 60): the edge pixels
        // of all three sides must be present, including the closing diagonal.
        assert_eq!(fb.pixel_at(Coord::new(50, 40)), Color::red());
        assert_eq!(fb.pixel_at(Coord::new(60, 50)), Color::red());
        assert_eq!(fb.pixel_at(Coord::new(50, 50)), Color::red());
    }

    #[test]
    fn vertices_draw_one_pixel_each() {
        let camera = test_camera();
        let mut fb = Framebuffer::new(100, 100);
        fb.clear(Color::black());
        let mesh = quad_mesh();
        let mut ctx = RenderContext {
            fb: &mut fb,
            light: Point::new(0.0, 1.0, 0.0),
        };
        mesh.draw_vertices(&camera, &mut ctx, Color::blue());
        assert_eq!(count_written(&fb), 4);
        assert_eq!(fb.pixel_at(Coord::new(40, 40)), Color::blue());
    }

    #[test]
    fn surface_grid_dimensions() {
        // A flat sheet: normals are well-defined everywhere.
        let mesh = Mesh::surface(
            |s, t| Point::new(s, 5.0, t),
            (-1.0, 1.0),
            (-1.0, 1.0),
            5,
            4,
            TextureImage::solid(Color::white()),
        );
        assert_eq!(mesh.points.len(), 20);
        assert_eq!(mesh.normals.len(), 20);
        assert_eq!(mesh.uvs.len(), 4);
        assert_eq!(mesh.faces.len(), 2 * 4 * 3);
        // All normals are unit-length and parallel to y.
        for n in &mesh.normals {
            assert!((n.norm() - 1.0).abs() < 1e-5);
            assert!(n.x.abs() < 1e-5 && n.z.abs() < 1e-5);
        }
        // Face indices are in bounds.
        for face in &mesh.faces {
            for v in &face.vertices {
                assert!(v.point < mesh.points.len());
                assert!(v.normal < mesh.normals.len());
                assert!(v.uv < mesh.uvs.len());
            }
        }
    }
}
