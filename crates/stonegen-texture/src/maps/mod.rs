//! PBR texture map generators.
//!
//! Each module derives one 8-bit raster from the structure map.

mod albedo;
mod height;
mod normal;
mod roughness;

pub use albedo::AlbedoGenerator;
pub use height::HeightGenerator;
pub use normal::NormalGenerator;
pub use roughness::RoughnessGenerator;

use crate::error::{buffer_len, try_alloc, GenerateError};

/// An 8-bit, 3-channel raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbRaster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data (RGB, row-major).
    pub data: Vec<u8>,
}

impl RgbRaster {
    /// Allocate a black raster.
    pub fn try_new(width: u32, height: u32, what: &'static str) -> Result<Self, GenerateError> {
        let len = buffer_len(width, height, 3, what)?;
        Ok(Self {
            width,
            height,
            data: try_alloc(len, 0u8, what)?,
        })
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.data.len() / 3
    }
}

/// An 8-bit, single-channel raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayRaster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data (row-major).
    pub data: Vec<u8>,
}

impl GrayRaster {
    /// Allocate a black raster.
    pub fn try_new(width: u32, height: u32, what: &'static str) -> Result<Self, GenerateError> {
        let len = buffer_len(width, height, 1, what)?;
        Ok(Self {
            width,
            height,
            data: try_alloc(len, 0u8, what)?,
        })
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.data.len()
    }
}

/// The four maps of a material set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MapKind {
    Albedo,
    Normal,
    Roughness,
    Height,
}

impl MapKind {
    /// All maps in export order.
    pub const ALL: [MapKind; 4] = [
        MapKind::Albedo,
        MapKind::Normal,
        MapKind::Roughness,
        MapKind::Height,
    ];

    /// Name used in exported file names.
    pub fn file_label(self) -> &'static str {
        match self {
            MapKind::Albedo => "Albedo",
            MapKind::Normal => "Normal",
            MapKind::Roughness => "Roughness",
            MapKind::Height => "Height",
        }
    }

    /// Channels per pixel.
    pub fn channels(self) -> usize {
        match self {
            MapKind::Albedo | MapKind::Normal => 3,
            MapKind::Roughness | MapKind::Height => 1,
        }
    }
}

impl std::fmt::Display for MapKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_label())
    }
}

/// Borrowed view of one map of a set.
#[derive(Debug, Clone, Copy)]
pub enum MapRef<'a> {
    Rgb(&'a RgbRaster),
    Gray(&'a GrayRaster),
}

impl MapRef<'_> {
    /// Raw bytes of the raster.
    pub fn bytes(&self) -> &[u8] {
        match self {
            MapRef::Rgb(r) => &r.data,
            MapRef::Gray(r) => &r.data,
        }
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            MapRef::Rgb(r) => (r.width, r.height),
            MapRef::Gray(r) => (r.width, r.height),
        }
    }
}

/// Albedo, normal, roughness and height rasters of identical size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialMapSet {
    pub albedo: RgbRaster,
    pub normal: RgbRaster,
    pub roughness: GrayRaster,
    pub height: GrayRaster,
}

impl MaterialMapSet {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.albedo.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.albedo.height
    }

    /// Borrow one map.
    pub fn map(&self, kind: MapKind) -> MapRef<'_> {
        match kind {
            MapKind::Albedo => MapRef::Rgb(&self.albedo),
            MapKind::Normal => MapRef::Rgb(&self.normal),
            MapKind::Roughness => MapRef::Gray(&self.roughness),
            MapKind::Height => MapRef::Gray(&self.height),
        }
    }
}

/// Round to the nearest 8-bit level, clamping to [0, 255].
#[inline]
pub(crate) fn quantize(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
