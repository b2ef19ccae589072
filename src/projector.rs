use crate::camera::Camera;
use crate::color::Color;
use crate::math::Point;
use crate::rasterizer::{self, RenderContext};
use crate::texture::{TextureImage, Uv};

/// One triangle corner on its way through projection: world position, view
/// depth and the attributes that survive clipping.
#[derive(Debug, Clone, Copy)]
struct ProjVertex {
    point: Point,
    depth: f32,
    uv: Uv,
    normal: Point,
}

impl ProjVertex {
    fn new(camera: &Camera, point: Point, uv: Uv, normal: Point) -> Self {
        Self {
            point,
            depth: camera.depth_of(point),
            uv,
            normal,
        }
    }
}

// Linear interpolation of position, depth and attributes along an edge.
// k must come from the edge originating at `from` so that k is in [0, 1].
fn lerp(from: &ProjVertex, to: &ProjVertex, k: f32) -> ProjVertex {
    ProjVertex {
        point: from.point + (to.point - from.point) * k,
        depth: from.depth + (to.depth - from.depth) * k,
        uv: from.uv + (to.uv - from.uv) * k,
        normal: from.normal + (to.normal - from.normal) * k,
    }
}

#[derive(Debug)]
enum ClipResult {
    Outside,
    Inside,
    Clipped(Vec<[ProjVertex; 3]>),
}

// Clip a triangle against the near plane. Vertices with depth strictly
// greater than `nearplan` are visible; the dispatch rotates the triangle so
// the solitary-side vertex comes first, which keeps the winding of every
// emitted triangle consistent with the input.
fn clip_near(nearplan: f32, verts: &[ProjVertex; 3]) -> ClipResult {
    let visible = [
        verts[0].depth > nearplan,
        verts[1].depth > nearplan,
        verts[2].depth > nearplan,
    ];

    let rotated = |first: usize| {
        [
            verts[first],
            verts[(first + 1) % 3],
            verts[(first + 2) % 3],
        ]
    };

    match visible.iter().filter(|&&v| v).count() {
        3 => ClipResult::Inside,
        0 => ClipResult::Outside,
        1 => {
            // Anchor P is the only visible vertex; pull Q and R back to the
            // plane along the edges PQ and PR.
            let first = visible.iter().position(|&v| v).unwrap_or(0);
            let [p, q, r] = rotated(first);
            let k_q = (nearplan - p.depth) / (q.depth - p.depth);
            let k_r = (nearplan - p.depth) / (r.depth - p.depth);
            ClipResult::Clipped(vec![[p, lerp(&p, &q, k_q), lerp(&p, &r, k_r)]])
        }
        _ => {
            // Anchor X is the only occluded vertex; the visible quadrilateral
            // (Y, Z, and the two plane intersections) splits in two.
            let first = visible.iter().position(|&v| !v).unwrap_or(0);
            let [x, y, z] = rotated(first);
            let k_y = (nearplan - x.depth) / (y.depth - x.depth);
            let k_z = (nearplan - x.depth) / (z.depth - x.depth);
            let y2 = lerp(&x, &y, k_y);
            let z2 = lerp(&x, &z, k_z);
            ClipResult::Clipped(vec![[y2, z, z2], [y2, y, z]])
        }
    }
}

fn emit(camera: &Camera, ctx: &mut RenderContext, verts: &[ProjVertex; 3], texture: &TextureImage) {
    let o = camera.frame().o;
    let coords = [
        camera.project_coord(verts[0].point - o, verts[0].depth),
        camera.project_coord(verts[1].point - o, verts[1].depth),
        camera.project_coord(verts[2].point - o, verts[2].depth),
    ];
    rasterizer::draw_triangle(
        ctx,
        coords,
        [verts[0].depth, verts[1].depth, verts[2].depth],
        texture,
        [verts[0].uv, verts[1].uv, verts[2].uv],
        [verts[0].normal, verts[1].normal, verts[2].normal],
    );
}

/// Plot a single world-space point, discarded when at or behind the near
/// plane.
pub fn project_vertex(camera: &Camera, ctx: &mut RenderContext, p: Point, color: Color) {
    let op = p - camera.frame().o;
    let depth = camera.frame().j.dot(op);
    if depth > camera.nearplan() {
        let coord = camera.project_coord(op, depth);
        rasterizer::draw_pixel(ctx, coord, depth, color);
    }
}

/// Project a world-space segment, clipping it against the near plane. A
/// clipped endpoint is rasterized at depth `nearplan`, where its screen
/// coordinate was computed.
pub fn project_segment(camera: &Camera, ctx: &mut RenderContext, a: Point, b: Point, color: Color) {
    let o = camera.frame().o;
    let oa = a - o;
    let ob = b - o;
    let depth_a = camera.frame().j.dot(oa);
    let depth_b = camera.frame().j.dot(ob);
    let nearplan = camera.nearplan();

    if depth_a >= nearplan && depth_b >= nearplan {
        let t = camera.project_coord(oa, depth_a);
        let u = camera.project_coord(ob, depth_b);
        rasterizer::draw_segment(ctx, t, u, depth_a, depth_b, color);
    } else if depth_a < nearplan && depth_b >= nearplan {
        let s = camera.project_point(a, b);
        let t = camera.project_coord(s, nearplan);
        let u = camera.project_coord(ob, depth_b);
        rasterizer::draw_segment(ctx, t, u, nearplan, depth_b, color);
    } else if depth_a >= nearplan && depth_b < nearplan {
        let s = camera.project_point(a, b);
        let t = camera.project_coord(oa, depth_a);
        let u = camera.project_coord(s, nearplan);
        rasterizer::draw_segment(ctx, t, u, depth_a, nearplan, color);
    }
}

/// Project a world-space triangle, splitting it against the near plane into
/// one or two screen-space triangles with interpolated attributes.
pub fn project_triangle(
    camera: &Camera,
    ctx: &mut RenderContext,
    points: [Point; 3],
    texture: &TextureImage,
    uvs: [Uv; 3],
    normals: [Point; 3],
) {
    let verts = [
        ProjVertex::new(camera, points[0], uvs[0], normals[0]),
        ProjVertex::new(camera, points[1], uvs[1], normals[1]),
        ProjVertex::new(camera, points[2], uvs[2], normals[2]),
    ];

    match clip_near(camera.nearplan(), &verts) {
        ClipResult::Outside => {}
        ClipResult::Inside => emit(camera, ctx, &verts, texture),
        ClipResult::Clipped(triangles) => {
            for triangle in &triangles {
                emit(camera, ctx, triangle, texture);
            }
        }
    }
}
