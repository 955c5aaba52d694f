//! The image-processing engine seam.
//!
//! The view layer treats the engine as a black box: an image plus an ordered
//! filter chain goes in, a composited image comes out. [`CpuEngine`] is the
//! portable implementation; hosts with platform frameworks can supply their
//! own.

mod blur;
pub mod cpu;

use crate::{
    filter::FilterChain,
    foundation::{
        core::{SamplerMode, SurfaceSize},
        error::ViewfinderResult,
    },
    frame::FrameRgba,
};

pub use cpu::CpuEngine;

/// Composites an input image through a filter chain.
pub trait ImageEngine {
    /// Resample `input` to `target` under `sampler`, then apply `chain`
    /// (crop first, then steps in order). An identity chain yields the
    /// resampled input unchanged.
    fn composite(
        &mut self,
        input: &FrameRgba,
        sampler: SamplerMode,
        target: SurfaceSize,
        chain: &FilterChain,
    ) -> ViewfinderResult<FrameRgba>;
}

/// Available engine kinds.
///
/// - `Cpu` is always available.
#[derive(Clone, Copy, Debug)]
pub enum EngineKind {
    /// Portable CPU engine.
    Cpu,
}

/// Create an engine implementation.
pub fn create_engine(kind: EngineKind) -> ViewfinderResult<Box<dyn ImageEngine>> {
    match kind {
        EngineKind::Cpu => Ok(Box::new(CpuEngine::new())),
    }
}
