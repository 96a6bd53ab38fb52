//! In-memory pixel buffers.
//!
//! [`PixelBuffer`] is the only image representation the engine understands:
//! a fixed-size grid of 8-bit RGBA pixels in row-major order. Decoding image
//! files into a buffer is the caller's job (the `image` feature provides
//! conversions for callers that use the `image` crate).

use serde::{Deserialize, Serialize};

use crate::error::{Result, StegoError};

/// A single 8-bit RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque pixel.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Gray pixel with all three color channels set to `v`.
    pub const fn gray(v: u8) -> Self {
        Self::opaque(v, v, v)
    }

    /// Unpack an `0xAARRGGBB` value (Android `Bitmap` layout).
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Pack into an `0xAARRGGBB` value.
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Read one color channel.
    #[inline]
    pub fn channel(&self, channel: Channel) -> u8 {
        match channel {
            Channel::Red => self.r,
            Channel::Green => self.g,
            Channel::Blue => self.b,
        }
    }

    #[inline]
    pub fn channel_mut(&mut self, channel: Channel) -> &mut u8 {
        match channel {
            Channel::Red => &mut self.r,
            Channel::Green => &mut self.g,
            Channel::Blue => &mut self.b,
        }
    }
}

/// Color channel selector. Alpha is never a carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// Channels in embedding order.
    pub const RGB: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];
}

/// Owned, mutable grid of RGBA pixels with fixed dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    /// Create a buffer filled with a single pixel value.
    pub fn new(width: u32, height: u32, fill: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    /// Build a buffer from per-pixel values in row-major order.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(StegoError::DimensionMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a buffer from interleaved RGBA bytes (canvas `ImageData` layout).
    pub fn from_rgba(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(StegoError::DimensionMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Rgba::new(p[0], p[1], p[2], p[3]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a buffer from packed `0xAARRGGBB` values (Android `getPixels` layout).
    pub fn from_argb(width: u32, height: u32, argb: &[u32]) -> Result<Self> {
        Self::from_pixels(width, height, argb.iter().copied().map(Rgba::from_argb).collect())
    }

    /// Build a buffer pixel by pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgba) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Pixel at `(x, y)`. Panics if out of bounds, like slice indexing.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Rgba {
        self.pixels[self.index(x, y)]
    }

    /// Pixels in row-major order.
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }

    /// One row of pixels.
    pub fn row(&self, y: u32) -> &[Rgba] {
        let start = self.index(0, y);
        &self.pixels[start..start + self.width as usize]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [Rgba] {
        let start = self.index(0, y);
        let width = self.width as usize;
        &mut self.pixels[start..start + width]
    }

    /// Interleaved RGBA bytes.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| [p.r, p.g, p.b, p.a])
            .collect()
    }

    /// Packed `0xAARRGGBB` values.
    pub fn to_argb(&self) -> Vec<u32> {
        self.pixels.iter().map(|p| p.to_argb()).collect()
    }
}

#[cfg(feature = "image")]
mod image_interop {
    use image::{DynamicImage, RgbaImage};

    use super::{PixelBuffer, Rgba};

    impl From<&RgbaImage> for PixelBuffer {
        fn from(img: &RgbaImage) -> Self {
            PixelBuffer::from_fn(img.width(), img.height(), |x, y| {
                let p = img.get_pixel(x, y).0;
                Rgba::new(p[0], p[1], p[2], p[3])
            })
        }
    }

    impl From<RgbaImage> for PixelBuffer {
        fn from(img: RgbaImage) -> Self {
            PixelBuffer::from(&img)
        }
    }

    impl From<&DynamicImage> for PixelBuffer {
        fn from(img: &DynamicImage) -> Self {
            PixelBuffer::from(img.to_rgba8())
        }
    }

    impl PixelBuffer {
        /// Convert into an `image::RgbaImage` for encoding to a file format.
        pub fn into_rgba_image(self) -> RgbaImage {
            let (width, height) = (self.width, self.height);
            let bytes = self.to_rgba_bytes();
            // Length is width * height * 4 by construction.
            RgbaImage::from_raw(width, height, bytes)
                .unwrap_or_else(|| RgbaImage::new(width, height))
        }
    }
}
