use crate::color::Color;
use crate::framebuffer::Framebuffer;
use crate::math::{Coord, Point};
use crate::texture::{TextureImage, Uv};

mod bounding_box;

use crate::rasterizer::bounding_box::PixelBoundingBox;

/// Everything the rasterizer writes or reads during a frame: the render
/// target and the global light direction, threaded explicitly instead of
/// living in process-wide state.
pub struct RenderContext<'a> {
    pub fb: &'a mut Framebuffer,
    pub light: Point,
}

/// Plot a single point with the depth test.
pub fn draw_pixel(ctx: &mut RenderContext, a: Coord, depth: f32, color: Color) {
    ctx.fb.write_pixel(a, depth, color);
}

/// Bresenham segment from `a` to `b`, stepping along the major axis. Depth is
/// interpolated perspective-correctly from the normalized line parameter.
/// A zero-length segment plots exactly one pixel.
pub fn draw_segment(
    ctx: &mut RenderContext,
    a: Coord,
    b: Coord,
    depth_a: f32,
    depth_b: f32,
    color: Color,
) {
    ctx.fb.write_pixel(a, depth_a, color);

    let mut dw = b.w - a.w;
    let mut dh = b.h - a.h;
    let w_incr = if dw > 0 { 1 } else { -1 };
    let h_incr = if dh > 0 { 1 } else { -1 };
    let mut m = a;

    if dw.abs() > dh.abs() {
        let mut error = dw;
        dw *= 2;
        dh *= 2;
        while m.w != b.w {
            m.w += w_incr;
            let alpha = (m.w - a.w) as f32 / (b.w - a.w) as f32;
            let depth_m = perspective_depth(depth_a, depth_b, alpha);
            error -= h_incr * dh;
            if error <= 0 {
                m.h += h_incr;
                error += w_incr * dw;
            }
            ctx.fb.write_pixel(m, depth_m, color);
        }
    } else {
        let mut error = dh;
        dh *= 2;
        dw *= 2;
        while m.h != b.h {
            m.h += h_incr;
            let alpha = (m.h - a.h) as f32 / (b.h - a.h) as f32;
            let depth_m = perspective_depth(depth_a, depth_b, alpha);
            error -= w_incr * dw;
            if error <= 0 {
                m.w += w_incr;
                error += h_incr * dh;
            }
            ctx.fb.write_pixel(m, depth_m, color);
        }
    }
}

// Depth along a segment is the harmonic interpolation of the endpoint
// depths: linear in screen space corresponds to 1/depth linear in the world.
fn perspective_depth(depth_a: f32, depth_b: f32, alpha: f32) -> f32 {
    depth_a * depth_b / ((1.0 - alpha) * depth_b + alpha * depth_a)
}

/// Scan-convert a screen-space triangle with depth test, texturing and
/// per-vertex shading.
///
/// Triangles that are clockwise in screen coordinates (or degenerate) are
/// culled: front-facing means counter-clockwise after projection. Depth,
/// shade and UV are all interpolated perspective-correctly; the UVs are
/// wrap-addressed into the texture and the fetched texel is scaled by the
/// interpolated shade.
pub fn draw_triangle(
    ctx: &mut RenderContext,
    coords: [Coord; 3],
    depths: [f32; 3],
    texture: &TextureImage,
    uvs: [Uv; 3],
    normals: [Point; 3],
) {
    let [a, b, c] = coords;
    let ab = b - a;
    let bc = c - b;
    if ab.cross(bc) <= 0 {
        return;
    }

    let bb = PixelBoundingBox::new(&coords, ctx.fb.width(), ctx.fb.height());

    let ac = c - a;
    let det = ab.cross(ac) as f32;

    let [depth_a, depth_b, depth_c] = depths;

    // Per-vertex shade: 1 when the normal opposes the light, 0 when they are
    // parallel. Deliberately unclamped.
    let light = ctx.light;
    let shade_of = |normal: Point| 1.0 - (normal + light).norm() / 2.0;
    let shade_a = shade_of(normals[0]);
    let shade_b = shade_of(normals[1]);
    let shade_c = shade_of(normals[2]);

    let shade_abc = shade_a * shade_b * shade_c;
    let shade_ab = shade_a * shade_b;
    let shade_bc = shade_b * shade_c;
    let shade_ca = shade_c * shade_a;

    let depth_abc = depth_a * depth_b * depth_c;
    let depth_ab = depth_a * depth_b;
    let depth_bc = depth_b * depth_c;
    let depth_ca = depth_c * depth_a;

    // UVs pre-divided by depth; the division by the interpolated 1/depth
    // happens per pixel.
    let u = uvs[0] * (1.0 / depth_a);
    let v = uvs[1] * (1.0 / depth_b);
    let w = uvs[2] * (1.0 / depth_c);

    let inside = |m: Coord| {
        ab.cross(m - a) >= 0 && bc.cross(m - b) >= 0 && (m - c).cross(ac) >= 0
    };

    for h in bb.min_h..=bb.max_h {
        let mut m = Coord::new(bb.min_w, h);
        // Runs per row are contiguous: skip to the first covered pixel, then
        // scan until the first miss.
        while m.w <= bb.max_w && !inside(m) {
            m.w += 1;
        }
        while m.w <= bb.max_w && inside(m) {
            // Barycentric weights: gamma belongs to A, beta to B, alpha to C.
            let alpha = ab.cross(m - a) as f32 / det;
            let beta = (m - a).cross(ac) as f32 / det;
            let gamma = 1.0 - alpha - beta;

            let depth_m =
                depth_abc / (gamma * depth_bc + beta * depth_ca + alpha * depth_ab);

            if ctx.fb.depth_test(m, depth_m) {
                let shade =
                    shade_abc / (gamma * shade_bc + beta * shade_ca + alpha * shade_ab);

                let inv_depth = gamma / depth_a + beta / depth_b + alpha / depth_c;
                let nu = (gamma * u.u + beta * v.u + alpha * w.u) / inv_depth;
                let nv = (gamma * u.v + beta * v.v + alpha * w.v) / inv_depth;

                let texel = texture.sample(nu, nv);
                ctx.fb.set_pixel(m, texel * shade);
                ctx.fb.set_depth(m, depth_m);
            }
            m.w += 1;
        }
    }
}
