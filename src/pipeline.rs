use std::sync::Arc;

use crate::{
    engine::ImageEngine,
    filter::FilterChain,
    foundation::{
        core::{SamplerMode, SurfaceSize},
        error::ViewfinderResult,
    },
    frame::FrameRgba,
};

/// The filter pipeline: current input image, active filter chain, sampler
/// mode, and target size.
///
/// All properties have replace-on-write semantics: setters swap in a new
/// immutable value, nothing is mutated in place, and the composited output is
/// recomputed on demand from whatever is current. The pipeline holds no cache
/// across mutations.
pub struct FilterPipeline {
    input: Option<Arc<FrameRgba>>,
    chain: Option<FilterChain>,
    sampler: SamplerMode,
    target: SurfaceSize,
    engine: Box<dyn ImageEngine>,
}

impl FilterPipeline {
    pub fn new(target: SurfaceSize, engine: Box<dyn ImageEngine>) -> Self {
        Self {
            input: None,
            chain: None,
            sampler: SamplerMode::default(),
            target,
            engine,
        }
    }

    /// Replace the input image.
    pub fn set_input(&mut self, input: Arc<FrameRgba>) {
        self.input = Some(input);
    }

    /// Drop the input image; subsequent composite queries return `None`.
    pub fn clear_input(&mut self) {
        self.input = None;
    }

    pub fn input(&self) -> Option<&Arc<FrameRgba>> {
        self.input.as_ref()
    }

    /// Replace the active filter chain.
    pub fn set_chain(&mut self, chain: FilterChain) {
        self.chain = Some(chain);
    }

    /// Drop the filter chain; composition becomes an identity pass-through.
    pub fn clear_chain(&mut self) {
        self.chain = None;
    }

    pub fn chain(&self) -> Option<&FilterChain> {
        self.chain.as_ref()
    }

    pub fn set_sampler(&mut self, sampler: SamplerMode) {
        self.sampler = sampler;
    }

    pub fn sampler(&self) -> SamplerMode {
        self.sampler
    }

    pub fn set_target(&mut self, target: SurfaceSize) {
        self.target = target;
    }

    pub fn target(&self) -> SurfaceSize {
        self.target
    }

    /// Compute the composited output from current state.
    ///
    /// Returns `Ok(None)` when no input image is set. With an input but no
    /// chain, the output is the resampled input; with a chain, the chain
    /// applied to the resampled input.
    #[tracing::instrument(skip(self), fields(target = ?self.target, sampler = ?self.sampler))]
    pub fn composited(&mut self) -> ViewfinderResult<Option<Arc<FrameRgba>>> {
        let Some(input) = self.input.clone() else {
            return Ok(None);
        };

        let identity = FilterChain::default();
        let chain = self.chain.as_ref().unwrap_or(&identity);

        let frame = self
            .engine
            .composite(&input, self.sampler, self.target, chain)?;
        Ok(Some(Arc::new(frame)))
    }
}

impl std::fmt::Debug for FilterPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterPipeline")
            .field("has_input", &self.input.is_some())
            .field("has_chain", &self.chain.is_some())
            .field("sampler", &self.sampler)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
