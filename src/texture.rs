use std::error::Error;
use std::fmt;
use std::fs::File;
use std::ops::{Add, Mul, Sub};
use std::path::Path;

use crate::color::Color;

/// Texture coordinate. Components are unrestricted; wrap-around addressing is
/// applied at sampling time.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Uv {
    pub u: f32,
    pub v: f32,
}

impl Uv {
    pub const fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }
}

impl Add for Uv {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.u + other.u, self.v + other.v)
    }
}

impl Sub for Uv {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.u - other.u, self.v - other.v)
    }
}

impl Mul<f32> for Uv {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self::Output {
        Self::new(self.u * scalar, self.v * scalar)
    }
}

#[derive(Debug)]
pub enum TextureError {
    Io(std::io::Error),
    Decode(png::DecodingError),
    Format(&'static str),
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::Io(e) => write!(f, "texture io error: {}", e),
            TextureError::Decode(e) => write!(f, "texture decode error: {}", e),
            TextureError::Format(what) => write!(f, "unsupported texture format: {}", what),
        }
    }
}

impl Error for TextureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TextureError::Io(e) => Some(e),
            TextureError::Decode(e) => Some(e),
            TextureError::Format(_) => None,
        }
    }
}

impl From<std::io::Error> for TextureError {
    fn from(e: std::io::Error) -> Self {
        TextureError::Io(e)
    }
}

impl From<png::DecodingError> for TextureError {
    fn from(e: png::DecodingError) -> Self {
        TextureError::Decode(e)
    }
}

/// RGB texel grid. (0, 0) is the upper left corner.
#[derive(Debug, Clone)]
pub struct TextureImage {
    width: usize,
    height: usize,
    texels: Vec<Color>,
}

impl TextureImage {
    pub fn new(width: usize, height: usize, texels: Vec<Color>) -> Self {
        debug_assert_eq!(texels.len(), width * height);
        Self {
            width,
            height,
            texels,
        }
    }

    /// 1x1 texture of a single color, the placeholder for untextured meshes.
    pub fn solid(color: Color) -> Self {
        Self::new(1, 1, vec![color])
    }

    pub fn from_png_file(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let file = File::open(path)?;
        let decoder = png::Decoder::new(file);
        let (info, mut reader) = decoder.read_info()?;
        if info.bit_depth != png::BitDepth::Eight {
            return Err(TextureError::Format("only 8-bit channels are supported"));
        }
        let channels = match info.color_type {
            png::ColorType::RGB => 3,
            png::ColorType::RGBA => 4,
            _ => return Err(TextureError::Format("only RGB and RGBA images are supported")),
        };

        let mut buf = vec![0u8; info.buffer_size()];
        reader.next_frame(&mut buf)?;

        let texels = buf
            .chunks(channels)
            .map(|texel| Color::new(texel[0], texel[1], texel[2]))
            .collect();

        Ok(Self::new(info.width as usize, info.height as usize, texels))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn texel(&self, x: usize, y: usize) -> Color {
        debug_assert!(x < self.width && y < self.height);
        self.texels[x + y * self.width]
    }

    /// Wrap-addressed sampling: only the fractional part of each coordinate
    /// is used, so shifting UVs by whole texture periods changes nothing.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let x = (frac(u) * self.width as f32) as usize;
        let y = (frac(v) * self.height as f32) as usize;
        self.texel(x.min(self.width - 1), y.min(self.height - 1))
    }
}

/// Fractional part, always in [0, 1).
fn frac(t: f32) -> f32 {
    t - t.floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> TextureImage {
        // 2x2 checker: white in the top-left and bottom-right corners.
        TextureImage::new(
            2,
            2,
            vec![
                Color::white(),
                Color::black(),
                Color::black(),
                Color::white(),
            ],
        )
    }

    #[test]
    fn frac_is_positive() {
        assert_eq!(frac(1.25), 0.25);
        assert_eq!(frac(-0.75), 0.25);
        assert_eq!(frac(0.0), 0.0);
        assert_eq!(frac(-3.0), 0.0);
    }

    #[test]
    fn sample_wraps() {
        let tex = checker();
        // UV (1.25, -0.75) lands on the same texel as (0.25, 0.25).
        assert_eq!(tex.sample(1.25, -0.75), tex.texel(0, 0));
        assert_eq!(tex.sample(1.25, -0.75), tex.sample(0.25, 0.25));
    }

    #[test]
    fn integer_uv_shift_is_invisible() {
        let tex = checker();
        for &(u, v) in &[(0.1, 0.9), (0.6, 0.4), (0.75, 0.75)] {
            assert_eq!(tex.sample(u, v), tex.sample(u + 3.0, v - 2.0));
        }
    }

    #[test]
    fn sample_corners() {
        let tex = checker();
        assert_eq!(tex.sample(0.0, 0.0), Color::white());
        assert_eq!(tex.sample(0.9, 0.0), Color::black());
        assert_eq!(tex.sample(0.0, 0.9), Color::black());
        assert_eq!(tex.sample(0.9, 0.9), Color::white());
    }

    #[test]
    fn solid_samples_everywhere() {
        let tex = TextureImage::solid(Color::red());
        assert_eq!(tex.sample(0.0, 0.0), Color::red());
        assert_eq!(tex.sample(-7.3, 123.9), Color::red());
    }
}
