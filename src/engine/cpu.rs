use crate::{
    engine::{ImageEngine, blur::blur_rgba8},
    filter::{FilterChain, PlanOp, PointOp, normalize_chain},
    foundation::{
        core::{SamplerMode, SurfaceSize},
        error::{ViewfinderError, ViewfinderResult},
    },
    frame::FrameRgba,
};

/// Portable CPU engine.
///
/// Resampling goes through `image::imageops`; point color ops run on straight
/// (unpremultiplied) values per pixel; blur runs as a separable pass over the
/// premultiplied buffer.
#[derive(Debug, Default)]
pub struct CpuEngine;

impl CpuEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ImageEngine for CpuEngine {
    fn composite(
        &mut self,
        input: &FrameRgba,
        sampler: SamplerMode,
        target: SurfaceSize,
        chain: &FilterChain,
    ) -> ViewfinderResult<FrameRgba> {
        let mut frame = resample(input, sampler, target)?;

        let plan = normalize_chain(chain);

        if let Some(crop) = plan.crop {
            let clamped = crop.intersect(frame.size()).ok_or_else(|| {
                ViewfinderError::validation("crop rectangle lies outside the frame")
            })?;
            frame = crop_frame(&frame, clamped.x, clamped.y, clamped.width, clamped.height)?;
        }

        for op in &plan.ops {
            match op {
                PlanOp::Point(run) => apply_point_run(&mut frame.data, run),
                PlanOp::Blur { radius_px, sigma } => {
                    frame.data =
                        blur_rgba8(&frame.data, frame.width, frame.height, *radius_px, *sigma)?;
                }
            }
        }

        Ok(frame)
    }
}

fn resample(
    input: &FrameRgba,
    sampler: SamplerMode,
    target: SurfaceSize,
) -> ViewfinderResult<FrameRgba> {
    if input.width == target.width && input.height == target.height {
        return Ok(input.clone());
    }

    let src = image::RgbaImage::from_raw(input.width, input.height, input.data.clone())
        .ok_or_else(|| ViewfinderError::pipeline("frame buffer does not match its dimensions"))?;

    let filter = match sampler {
        SamplerMode::Linear => image::imageops::FilterType::Triangle,
        SamplerMode::Nearest => image::imageops::FilterType::Nearest,
    };
    let resized = image::imageops::resize(&src, target.width, target.height, filter);

    FrameRgba::from_rgba8(
        target.width,
        target.height,
        resized.into_raw(),
        input.premultiplied,
    )
}

fn crop_frame(frame: &FrameRgba, x: u32, y: u32, width: u32, height: u32) -> ViewfinderResult<FrameRgba> {
    let src_stride = frame.width as usize * 4;
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for row in y..y + height {
        let start = row as usize * src_stride + x as usize * 4;
        data.extend_from_slice(&frame.data[start..start + width as usize * 4]);
    }
    FrameRgba::from_rgba8(width, height, data, frame.premultiplied)
}

fn apply_point_run(data: &mut [u8], run: &[PointOp]) {
    for px in data.chunks_exact_mut(4) {
        let a = f32::from(px[3]) / 255.0;
        if a <= 0.0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }

        // Work on straight values; premultiplied channels never exceed alpha,
        // but rounding can overshoot slightly, hence the clamp.
        let mut r = (f32::from(px[0]) / 255.0 / a).min(1.0);
        let mut g = (f32::from(px[1]) / 255.0 / a).min(1.0);
        let mut b = (f32::from(px[2]) / 255.0 / a).min(1.0);

        for op in run {
            (r, g, b) = apply_point_op(*op, r, g, b);
        }

        px[0] = ((r.clamp(0.0, 1.0) * a) * 255.0).round() as u8;
        px[1] = ((g.clamp(0.0, 1.0) * a) * 255.0).round() as u8;
        px[2] = ((b.clamp(0.0, 1.0) * a) * 255.0).round() as u8;
    }
}

fn apply_point_op(op: PointOp, r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    match op {
        PointOp::Brightness(v) => (r * v, g * v, b * v),
        PointOp::Contrast(v) => (
            (r - 0.5) * v + 0.5,
            (g - 0.5) * v + 0.5,
            (b - 0.5) * v + 0.5,
        ),
        PointOp::Saturation(v) => {
            let luma = luma709(r, g, b);
            (
                luma + (r - luma) * v,
                luma + (g - luma) * v,
                luma + (b - luma) * v,
            )
        }
        PointOp::Grayscale => {
            let luma = luma709(r, g, b);
            (luma, luma, luma)
        }
        PointOp::Invert => (1.0 - r, 1.0 - g, 1.0 - b),
    }
}

fn luma709(r: f32, g: f32, b: f32) -> f32 {
    0.2126 * r + 0.7152 * g + 0.0722 * b
}
