//! Viewfinder binds a filter/compositing pipeline to a host-owned render
//! surface.
//!
//! The crate owns the sequencing: *what* the composited output is for the
//! current input, crop, filter chain, and sampler mode, and *when* a frame
//! may be presented. Everything heavyweight stays behind trait seams:
//!
//! - [`ImageEngine`] composites an image through an ordered filter chain
//!   ([`CpuEngine`] is the portable implementation).
//! - [`BlitTarget`] is the GPU-backed view that actually puts pixels on
//!   screen; the host implements it.
//! - [`RenderSurface`] guards the (context, ready-flag) pair so a draw can
//!   never race a context swap, and never happens before the first layout
//!   pass after one.
#![forbid(unsafe_code)]

mod foundation;

pub mod display;
pub mod engine;
pub mod filter;
pub mod frame;
pub mod pipeline;
pub mod savestate;
pub mod surface;
pub mod view;

pub use crate::foundation::core::{CropRect, Point, Rect, SamplerMode, SurfaceSize, Vec2};
pub use crate::foundation::error::{ViewfinderError, ViewfinderResult};

pub use crate::display::{DisplayLayout, ScreenRegion};
pub use crate::engine::{CpuEngine, EngineKind, ImageEngine, create_engine};
pub use crate::filter::{FilterChain, FilterInstance, FilterStep, parse_filter};
pub use crate::frame::{FrameRgba, decode_frame};
pub use crate::pipeline::FilterPipeline;
pub use crate::savestate::SaveMarker;
pub use crate::surface::{DrawOutcome, RenderSurface};
pub use crate::view::{BlitTarget, FilterView};
