use crate::foundation::error::{ViewfinderError, ViewfinderResult};

pub use kurbo::{Point, Rect, Vec2};

/// Interpolation policy used when resampling the input image to the surface
/// size.
///
/// Exactly two policies exist; there is nothing else to configure about the
/// resample step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplerMode {
    /// Bilinear interpolation. The default.
    #[default]
    Linear,
    /// Nearest-neighbor sampling, for pixel-exact inspection.
    Nearest,
}

/// Axis-aligned crop rectangle in integer pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> ViewfinderResult<Self> {
        if width == 0 || height == 0 {
            return Err(ViewfinderError::validation(
                "CropRect width/height must be > 0",
            ));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Clamp this rect to an image of `bounds` size. Returns `None` when the
    /// rect lies entirely outside the image.
    pub fn intersect(self, bounds: SurfaceSize) -> Option<Self> {
        if self.x >= bounds.width || self.y >= bounds.height {
            return None;
        }
        let width = self.width.min(bounds.width - self.x);
        let height = self.height.min(bounds.height - self.y);
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            x: self.x,
            y: self.y,
            width,
            height,
        })
    }
}

/// Drawable extent of a render surface (or of a frame), in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> ViewfinderResult<Self> {
        if width == 0 || height == 0 {
            return Err(ViewfinderError::validation(
                "SurfaceSize width/height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// The surface extent as an f64 drawable region with origin (0,0).
    pub fn to_rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}
