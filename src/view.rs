use std::sync::Arc;

use crate::{
    display::ScreenRegion,
    engine::ImageEngine,
    filter::FilterChain,
    foundation::{
        core::{Rect, SamplerMode, SurfaceSize},
        error::ViewfinderResult,
    },
    frame::FrameRgba,
    pipeline::FilterPipeline,
    surface::{DrawOutcome, RenderSurface},
};

/// The GPU-backed view consumed as a black box: given a drawable region and a
/// composited frame, put it on screen. Implemented by the surface owner.
pub trait BlitTarget {
    fn blit(&mut self, region: Rect, frame: &FrameRgba) -> ViewfinderResult<()>;
}

/// The view adapter: a filter pipeline bound to a guarded render surface.
///
/// Mutators mark the view dirty; [`redraw`] recomputes the composited output
/// and presents it through the surface guard. A redraw with no input image,
/// or before the surface is ready, is a silent skip.
///
/// [`redraw`]: FilterView::redraw
pub struct FilterView<C: BlitTarget> {
    pipeline: FilterPipeline,
    surface: RenderSurface<C>,
    needs_redraw: bool,
}

impl<C: BlitTarget> FilterView<C> {
    pub fn new(target: SurfaceSize, engine: Box<dyn ImageEngine>) -> Self {
        Self {
            pipeline: FilterPipeline::new(target, engine),
            surface: RenderSurface::new(),
            needs_redraw: false,
        }
    }

    /// The surface guard. The host installs contexts and reports layout
    /// passes through this.
    pub fn surface(&self) -> &RenderSurface<C> {
        &self.surface
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn set_input(&mut self, input: Arc<FrameRgba>) {
        self.pipeline.set_input(input);
        self.needs_redraw = true;
    }

    pub fn clear_input(&mut self) {
        self.pipeline.clear_input();
        self.needs_redraw = true;
    }

    pub fn set_chain(&mut self, chain: FilterChain) {
        self.pipeline.set_chain(chain);
        self.needs_redraw = true;
    }

    pub fn clear_chain(&mut self) {
        self.pipeline.clear_chain();
        self.needs_redraw = true;
    }

    pub fn set_sampler(&mut self, sampler: SamplerMode) {
        self.pipeline.set_sampler(sampler);
        self.needs_redraw = true;
    }

    /// Adopt the surface's drawable extent after a resize.
    pub fn set_target(&mut self, target: SurfaceSize) {
        self.pipeline.set_target(target);
        self.needs_redraw = true;
    }

    /// Install a screen region's crop and filters as the active chain.
    pub fn apply_region(&mut self, region: &ScreenRegion) -> ViewfinderResult<()> {
        let chain = region.chain()?;
        self.pipeline.set_chain(chain);
        self.needs_redraw = true;
        Ok(())
    }

    /// Recompute the composited output and present it.
    ///
    /// Outcomes: `SkippedNoFrame` when no input image is set,
    /// `SkippedNotReady` when the surface guard refuses the dispatch, and
    /// `Presented` when the blit ran. Only a skip for surface readiness
    /// leaves the view dirty; the request is otherwise satisfied.
    pub fn redraw(&mut self) -> ViewfinderResult<DrawOutcome> {
        let Some(frame) = self.pipeline.composited()? else {
            self.needs_redraw = false;
            return Ok(DrawOutcome::SkippedNoFrame);
        };

        let region = fit_region(frame.size(), self.pipeline.target());
        let outcome = self.surface.draw_with(|ctx| ctx.blit(region, &frame))?;
        if outcome == DrawOutcome::Presented {
            self.needs_redraw = false;
        }
        Ok(outcome)
    }
}

impl<C: BlitTarget> std::fmt::Debug for FilterView<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterView")
            .field("pipeline", &self.pipeline)
            .field("surface", &self.surface)
            .field("needs_redraw", &self.needs_redraw)
            .finish()
    }
}

/// Aspect-fit `frame` into `target`, centered. Letterboxes rather than
/// stretches when the ratios differ.
fn fit_region(frame: SurfaceSize, target: SurfaceSize) -> Rect {
    let fw = f64::from(frame.width);
    let fh = f64::from(frame.height);
    let tw = f64::from(target.width);
    let th = f64::from(target.height);

    let scale = (tw / fw).min(th / fh);
    let w = fw * scale;
    let h = fh * scale;
    let x = (tw - w) / 2.0;
    let y = (th - h) / 2.0;
    Rect::new(x, y, x + w, y + h)
}
