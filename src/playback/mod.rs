//! Playback core: a timer-driven reveal animation over a [`Snapshot`].
//!
//! ```text
//!   Scheduler ──tick──▶ TimeSeriesAnimator ──render()──▶ DrawInstructions ──▶ Renderer
//!                            ▲
//!   LegendState ─set_filter──┘   (hover preview / sticky click)
//! ```
//!
//! Nothing in here touches egui widgets; the UI layer supplies a
//! [`Renderer`] and polls an [`IntervalTimer`].
//!
//! [`Snapshot`]: crate::data::model::Snapshot

pub mod animator;
pub mod error;
pub mod legend;
pub mod render;
pub mod timer;

#[cfg(test)]
pub(crate) mod testing;

pub use animator::{Phase, PlaybackState, Renderer, TimeSeriesAnimator};
pub use error::{PlaybackError, RenderError};
pub use legend::LegendState;
pub use render::{DrawInstructions, LegendEntry, Marker, Polyline, Transition, render};
pub use timer::{IntervalTimer, Scheduler, TimerId};
