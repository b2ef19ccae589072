use crate::math::{Coord, Point};

/// Oriented orthonormal basis. `j` is the view direction along which depth is
/// measured, `i` points right, `k` points up; (i, j, k) is right-handed.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub o: Point,
    pub i: Point,
    pub j: Point,
    pub k: Point,
}

impl Frame {
    pub fn reset(origin: Point) -> Self {
        Self {
            o: origin,
            i: Point::new(1.0, 0.0, 0.0),
            j: Point::new(0.0, 1.0, 0.0),
            k: Point::new(0.0, 0.0, 1.0),
        }
    }
}

/// Pinhole camera: a [`Frame`] plus intrinsics. Field-of-view angles are full
/// angles in degrees.
#[derive(Debug, Clone)]
pub struct Camera {
    frame: Frame,
    width: usize,
    height: usize,
    nearplan: f32,
    w_coef: f32,
    h_coef: f32,
}

impl Camera {
    pub fn new(
        width: usize,
        height: usize,
        wfov: f32,
        hfov: f32,
        nearplan: f32,
        origin: Point,
    ) -> Self {
        assert!(nearplan > 0.0, "near plane must be in front of the camera");
        let w_coef = width as f32 / (2.0 * (wfov.to_radians() / 2.0).tan());
        // The negation flips h to grow downwards, the screen convention.
        let h_coef = -(height as f32) / (2.0 * (hfov.to_radians() / 2.0).tan());
        Self {
            frame: Frame::reset(origin),
            width,
            height,
            nearplan,
            w_coef,
            h_coef,
        }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn nearplan(&self) -> f32 {
        self.nearplan
    }

    pub fn reset(&mut self, origin: Point) {
        self.frame = Frame::reset(origin);
    }

    /// Move the origin along the camera's own axes.
    pub fn translate(&mut self, di: f32, dj: f32, dk: f32) {
        let f = &mut self.frame;
        f.o += f.i * di + f.j * dj + f.k * dk;
    }

    /// Pitch: rotate the basis about the local right axis.
    pub fn rotate_i(&mut self, angle: f32) {
        let f = &mut self.frame;
        f.j = f.j.rotate_around(f.i, angle);
        f.k = f.k.rotate_around(f.i, angle);
        self.orthonormalize();
    }

    /// Roll: rotate the basis about the view axis.
    pub fn rotate_j(&mut self, angle: f32) {
        let f = &mut self.frame;
        f.i = f.i.rotate_around(f.j, angle);
        f.k = f.k.rotate_around(f.j, angle);
        self.orthonormalize();
    }

    /// Yaw: rotate the basis about the local up axis.
    pub fn rotate_k(&mut self, angle: f32) {
        let f = &mut self.frame;
        f.i = f.i.rotate_around(f.k, angle);
        f.j = f.j.rotate_around(f.k, angle);
        self.orthonormalize();
    }

    // Rebuild an exact orthonormal right-handed basis from j and k, absorbing
    // the drift accumulated by repeated rotations.
    fn orthonormalize(&mut self) {
        let f = &mut self.frame;
        f.j = f.j.normalize();
        f.i = f.j.cross(f.k).normalize();
        f.k = f.i.cross(f.j);
    }

    /// Distance of `p` along the view axis.
    pub fn depth_of(&self, p: Point) -> f32 {
        self.frame.j.dot(p - self.frame.o)
    }

    /// Intersection of the line AB with the near plane, relative to the
    /// camera origin. Only meaningful when A and B lie on opposite sides of
    /// the plane (the denominator is their depth difference).
    pub fn project_point(&self, a: Point, b: Point) -> Point {
        let ab = b - a;
        let k = (self.nearplan - self.frame.j.dot(a - self.frame.o)) / self.frame.j.dot(ab);
        a + ab * k - self.frame.o
    }

    /// Screen coordinate of the camera-relative vector `oa` at the given
    /// depth, rounded to the nearest pixel.
    pub fn project_coord(&self, oa: Point, depth: f32) -> Coord {
        let w = self.w_coef * self.frame.i.dot(oa) / depth + self.width as f32 / 2.0;
        let h = self.h_coef * self.frame.k.dot(oa) / depth + self.height as f32 / 2.0;
        Coord::new(w.round() as i32, h.round() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_camera() -> Camera {
        Camera::new(100, 100, 90.0, 90.0, 1.0, Point::origin())
    }

    fn assert_orthonormal(f: &Frame) {
        assert!((f.i.norm() - 1.0).abs() < 1e-5);
        assert!((f.j.norm() - 1.0).abs() < 1e-5);
        assert!((f.k.norm() - 1.0).abs() < 1e-5);
        assert!(f.i.dot(f.j).abs() < 1e-5);
        assert!(f.j.dot(f.k).abs() < 1e-5);
        assert!(f.k.dot(f.i).abs() < 1e-5);
        // Right-handed: i x j = k.
        assert!((f.i.cross(f.j) - f.k).norm() < 1e-5);
    }

    #[test]
    fn centered_point_projects_to_screen_center() {
        let camera = test_camera();
        let a = Point::new(0.0, 5.0, 0.0);
        let oa = a - camera.frame().o;
        let depth = camera.depth_of(a);
        assert_eq!(depth, 5.0);
        assert_eq!(camera.project_coord(oa, depth), Coord::new(50, 50));
    }

    #[test]
    fn horizontal_offsets_project_symmetrically() {
        let camera = test_camera();
        let left = Point::new(-1.0, 5.0, 0.0);
        let right = Point::new(1.0, 5.0, 0.0);
        assert_eq!(camera.project_coord(left, 5.0), Coord::new(40, 50));
        assert_eq!(camera.project_coord(right, 5.0), Coord::new(60, 50));
        // Up in world space is up on screen, i.e. a smaller h.
        let up = Point::new(0.0, 5.0, 1.0);
        assert_eq!(camera.project_coord(up, 5.0), Coord::new(50, 40));
    }

    #[test]
    fn near_plane_intersection() {
        let camera = test_camera();
        let a = Point::new(0.0, 2.0, 0.0);
        let b = Point::new(0.0, 0.5, 0.0);
        let s = camera.project_point(a, b);
        // The intersection sits exactly on the plane j . s = nearplan.
        assert!((camera.frame().j.dot(s) - camera.nearplan()).abs() < 1e-6);
        assert!((s - Point::new(0.0, 1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn basis_stays_orthonormal_under_pose_changes() {
        let mut camera = test_camera();
        for step in 0..50 {
            match step % 3 {
                0 => camera.rotate_i(0.3),
                1 => camera.rotate_k(-0.2),
                _ => camera.rotate_j(0.15),
            }
            camera.translate(0.1, -0.2, 0.05);
            assert_orthonormal(camera.frame());
        }
    }

    #[test]
    fn yaw_turns_view_towards_old_right() {
        let mut camera = test_camera();
        // Turning about +k (up) by -90 degrees points j at the old i.
        camera.rotate_k(-std::f32::consts::FRAC_PI_2);
        assert!((camera.frame().j - Point::new(1.0, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn translate_moves_along_local_axes() {
        let mut camera = test_camera();
        camera.rotate_k(-std::f32::consts::FRAC_PI_2);
        camera.translate(0.0, 2.0, 0.0);
        // Forward is now world +x.
        assert!((camera.frame().o - Point::new(2.0, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn projection_roundtrip_within_one_pixel() {
        let camera = test_camera();
        for &p in &[
            Point::new(0.3, 4.0, -0.7),
            Point::new(-1.2, 6.5, 0.4),
            Point::new(2.0, 9.0, 2.0),
        ] {
            let depth = camera.depth_of(p);
            let coord = camera.project_coord(p - camera.frame().o, depth);
            // Reconstruct the view ray from the pixel and walk it back out.
            let w_coef = 50.0;
            let h_coef = -50.0;
            let di = (coord.w as f32 - 50.0) / w_coef * depth;
            let dk = (coord.h as f32 - 50.0) / h_coef * depth;
            let back = Point::new(di, depth, dk);
            let again = camera.project_coord(back, depth);
            assert!((again.w - coord.w).abs() <= 1);
            assert!((again.h - coord.h).abs() <= 1);
        }
    }
}
