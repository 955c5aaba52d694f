use std::sync::{Mutex, MutexGuard};

use crate::foundation::error::ViewfinderResult;

/// Result of a draw request.
///
/// Skips are not errors: a frame that is not drawn is simply not drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// The draw closure ran against the installed context.
    Presented,
    /// The surface has no context, or has not completed a layout pass since
    /// the context was installed.
    SkippedNotReady,
    /// There was nothing to draw (no composited frame available).
    SkippedNoFrame,
}

#[derive(Debug)]
struct SurfaceState<C> {
    context: Option<C>,
    ready: bool,
}

/// Guard around a render surface's (context, ready-flag) pair.
///
/// The contract: the surface must not be drawn to until the hosting layout
/// pass has run at least once after any context change, and context mutation
/// must never race a draw dispatch. Both rules are enforced by a single
/// mutex; a draw request on a surface that is not ready is a silent no-op,
/// safe to issue any number of times.
pub struct RenderSurface<C> {
    state: Mutex<SurfaceState<C>>,
}

impl<C> Default for RenderSurface<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> RenderSurface<C> {
    /// A surface with no context installed.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SurfaceState {
                context: None,
                ready: false,
            }),
        }
    }

    /// A surface with a context already installed, still awaiting its first
    /// layout pass.
    pub fn with_context(context: C) -> Self {
        Self {
            state: Mutex::new(SurfaceState {
                context: Some(context),
                ready: false,
            }),
        }
    }

    // A panicked draw closure poisons the mutex; the state itself is still
    // consistent (the flag and pointer are only written before the closure
    // runs), so recover rather than wedge every future frame.
    fn lock(&self) -> MutexGuard<'_, SurfaceState<C>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Install (or swap) the rendering context. Clears the ready flag: the
    /// surface may not be drawn to again until [`complete_layout`] runs.
    ///
    /// [`complete_layout`]: RenderSurface::complete_layout
    pub fn set_context(&self, context: C) -> Option<C> {
        let mut state = self.lock();
        state.ready = false;
        let previous = state.context.replace(context);
        tracing::debug!("render context installed; surface awaiting layout");
        previous
    }

    /// Remove the context. The surface stops being drawable until a new
    /// context is installed and laid out.
    pub fn clear_context(&self) -> Option<C> {
        let mut state = self.lock();
        state.ready = false;
        let previous = state.context.take();
        if previous.is_some() {
            tracing::debug!("render context removed");
        }
        previous
    }

    /// Record that the hosting layout pass has completed.
    ///
    /// Arms the ready flag only when a context is present; a layout pass over
    /// a context-less surface proves nothing. Returns whether the surface is
    /// now ready.
    pub fn complete_layout(&self) -> bool {
        let mut state = self.lock();
        state.ready = state.context.is_some();
        if state.ready {
            tracing::debug!("layout complete; surface ready to draw");
        }
        state.ready
    }

    pub fn is_ready(&self) -> bool {
        self.lock().ready
    }

    pub fn has_context(&self) -> bool {
        self.lock().context.is_some()
    }

    /// Dispatch a draw against the installed context.
    ///
    /// The closure runs while the state lock is held, so a context swap on
    /// another thread can never interleave with the dispatch. If the surface
    /// is not ready the request is a no-op and the closure never runs.
    pub fn draw_with<F>(&self, f: F) -> ViewfinderResult<DrawOutcome>
    where
        F: FnOnce(&mut C) -> ViewfinderResult<()>,
    {
        let mut state = self.lock();
        if !state.ready {
            return Ok(DrawOutcome::SkippedNotReady);
        }
        let Some(context) = state.context.as_mut() else {
            return Ok(DrawOutcome::SkippedNotReady);
        };
        f(context)?;
        Ok(DrawOutcome::Presented)
    }
}

impl<C> std::fmt::Debug for RenderSurface<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("RenderSurface")
            .field("has_context", &state.context.is_some())
            .field("ready", &state.ready)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_before_any_context_is_skipped() {
        let surface = RenderSurface::<u32>::new();
        let outcome = surface.draw_with(|_| panic!("must not run")).unwrap();
        assert_eq!(outcome, DrawOutcome::SkippedNotReady);
    }

    #[test]
    fn draw_before_layout_is_skipped_and_idempotent() {
        let surface = RenderSurface::with_context(0u32);
        for _ in 0..3 {
            let outcome = surface.draw_with(|_| panic!("must not run")).unwrap();
            assert_eq!(outcome, DrawOutcome::SkippedNotReady);
        }
        assert!(!surface.is_ready());
    }

    #[test]
    fn layout_arms_the_surface() {
        let surface = RenderSurface::with_context(0u32);
        assert!(surface.complete_layout());

        let mut calls = 0;
        let outcome = surface
            .draw_with(|ctx| {
                *ctx += 1;
                calls += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(outcome, DrawOutcome::Presented);
        assert_eq!(calls, 1);
    }

    #[test]
    fn layout_without_context_does_not_arm() {
        let surface = RenderSurface::<u32>::new();
        assert!(!surface.complete_layout());
        assert!(!surface.is_ready());
    }

    #[test]
    fn context_swap_clears_ready() {
        let surface = RenderSurface::with_context(1u32);
        surface.complete_layout();
        assert!(surface.is_ready());

        let previous = surface.set_context(2);
        assert_eq!(previous, Some(1));
        assert!(!surface.is_ready());
        let outcome = surface.draw_with(|_| panic!("must not run")).unwrap();
        assert_eq!(outcome, DrawOutcome::SkippedNotReady);

        surface.complete_layout();
        assert_eq!(
            surface.draw_with(|_| Ok(())).unwrap(),
            DrawOutcome::Presented
        );
    }

    #[test]
    fn clear_context_disarms() {
        let surface = RenderSurface::with_context(7u32);
        surface.complete_layout();
        assert_eq!(surface.clear_context(), Some(7));
        assert!(!surface.is_ready());
        assert!(!surface.has_context());
    }

    #[test]
    fn draw_error_keeps_surface_ready() {
        let surface = RenderSurface::with_context(0u32);
        surface.complete_layout();
        let err = surface.draw_with(|_| {
            Err(crate::foundation::error::ViewfinderError::surface("blit failed"))
        });
        assert!(err.is_err());
        assert!(surface.is_ready());
        assert_eq!(
            surface.draw_with(|_| Ok(())).unwrap(),
            DrawOutcome::Presented
        );
    }

    #[test]
    fn panicked_draw_does_not_wedge_the_lock() {
        let surface = std::sync::Arc::new(RenderSurface::with_context(0u32));
        surface.complete_layout();

        let s = surface.clone();
        let result = std::thread::spawn(move || {
            let _ = s.draw_with(|_| panic!("boom"));
        })
        .join();
        assert!(result.is_err());

        assert_eq!(
            surface.draw_with(|_| Ok(())).unwrap(),
            DrawOutcome::Presented
        );
    }
}
