use anyhow::Context as _;

use crate::foundation::{
    core::SurfaceSize,
    error::{ViewfinderError, ViewfinderResult},
};

/// A renderable image as RGBA8 pixels.
///
/// Frames are **premultiplied alpha** throughout the pipeline. The
/// `premultiplied` flag makes this explicit at API boundaries; a blit target
/// that needs straight alpha must unpremultiply itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgba {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRgba {
    /// Wrap an RGBA8 buffer, validating its length against the dimensions.
    pub fn from_rgba8(
        width: u32,
        height: u32,
        data: Vec<u8>,
        premultiplied: bool,
    ) -> ViewfinderResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| ViewfinderError::validation("frame buffer size overflow"))?;
        if data.len() != expected {
            return Err(ViewfinderError::validation(format!(
                "frame buffer length {} does not match {}x{}x4",
                data.len(),
                width,
                height
            )));
        }
        if width == 0 || height == 0 {
            return Err(ViewfinderError::validation("frame width/height must be > 0"));
        }
        Ok(Self {
            width,
            height,
            data,
            premultiplied,
        })
    }

    /// An opaque single-color frame, mostly useful in tests and fixtures.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> ViewfinderResult<Self> {
        let px = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| ViewfinderError::validation("frame buffer size overflow"))?;
        let mut data = Vec::with_capacity(px * 4);
        for _ in 0..px {
            data.extend_from_slice(&rgba);
        }
        Self::from_rgba8(width, height, data, true)
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize {
            width: self.width,
            height: self.height,
        }
    }
}

/// Decode an encoded image (PNG, JPEG, ...) into a premultiplied frame.
pub fn decode_frame(bytes: &[u8]) -> ViewfinderResult<FrameRgba> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut data = rgba.into_raw();
    premultiply_rgba8_in_place(&mut data);

    FrameRgba::from_rgba8(width, height, data, true)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}
