use std::sync::Arc;
use std::time::Duration;

use super::error::{PlaybackError, RenderError};
use super::render::{DrawInstructions, Transition, render};
use super::timer::{Scheduler, TimerId};
use crate::data::filter::EntityFilter;
use crate::data::model::Snapshot;

// ---------------------------------------------------------------------------
// Renderer seam
// ---------------------------------------------------------------------------

/// Applies draw instructions to a concrete surface.
pub trait Renderer {
    fn draw(&mut self, frame: &DrawInstructions) -> Result<(), RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn draw(&mut self, frame: &DrawInstructions) -> Result<(), RenderError> {
        (**self).draw(frame)
    }
}

// ---------------------------------------------------------------------------
// Playback state
// ---------------------------------------------------------------------------

/// `Idle → Running ⇄ Paused → Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Paused,
}

/// The only mutable data of an animator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    /// Always `< snapshot.year_count()`.
    pub index: usize,
    pub phase: Phase,
    /// When `Only`, names an entity present in the snapshot.
    pub filter: EntityFilter,
}

// ---------------------------------------------------------------------------
// TimeSeriesAnimator
// ---------------------------------------------------------------------------

/// Drives a repeating cumulative-reveal animation over a [`Snapshot`].
///
/// Owns its renderer, its scheduler and at most one timer handle. Every
/// restart cancels the stored handle before starting a new one, and ticks
/// carrying any other handle are dropped, so a timer that fires after
/// `pause` or `teardown` can never touch the state.
pub struct TimeSeriesAnimator<R: Renderer, S: Scheduler> {
    snapshot: Arc<Snapshot>,
    interval: Duration,
    state: PlaybackState,
    timer: Option<TimerId>,
    renderer: R,
    scheduler: S,
}

impl<R: Renderer, S: Scheduler> TimeSeriesAnimator<R, S> {
    /// Render index 0 and start ticking every `interval`.
    pub fn initialize(
        snapshot: Arc<Snapshot>,
        interval: Duration,
        renderer: R,
        scheduler: S,
    ) -> Result<Self, PlaybackError> {
        if snapshot.year_count() == 0 || snapshot.entity_count() == 0 {
            return Err(PlaybackError::EmptyDataset {
                entities: snapshot.entity_count(),
                years: snapshot.year_count(),
            });
        }

        let mut animator = Self {
            snapshot,
            interval,
            state: PlaybackState {
                index: 0,
                phase: Phase::Running,
                filter: EntityFilter::All,
            },
            timer: None,
            renderer,
            scheduler,
        };
        animator.present(Transition::Immediate)?;
        animator.start_timer();

        log::info!(
            "Playback started: {} entities over {} years, tick {:?}",
            animator.snapshot.entity_count(),
            animator.snapshot.year_count(),
            interval
        );
        Ok(animator)
    }

    // -- Accessors --

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn index(&self) -> usize {
        self.state.index
    }

    pub fn current_year(&self) -> i32 {
        self.snapshot.years()[self.state.index]
    }

    pub fn filter(&self) -> &EntityFilter {
        &self.state.filter
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    // -- Timer entry points --

    /// Timer callback. Ticks from any handle other than the live one are ignored.
    pub fn on_timer(&mut self, id: TimerId) -> Result<(), PlaybackError> {
        if self.timer != Some(id) {
            log::debug!("Ignoring stale tick from {id:?}");
            return Ok(());
        }
        self.tick()
    }

    /// Advance one year (wrapping) and render the reveal.
    /// No-op unless running.
    pub fn tick(&mut self) -> Result<(), PlaybackError> {
        if self.state.phase != Phase::Running || self.timer.is_none() {
            return Ok(());
        }
        self.state.index = (self.state.index + 1) % self.snapshot.year_count();
        self.present(Transition::Reveal(self.interval))
    }

    // -- User interaction --

    /// Stop ticking and redraw the full cumulative paths. Idempotent.
    pub fn pause(&mut self) -> Result<(), PlaybackError> {
        if self.state.phase != Phase::Running {
            return Ok(());
        }
        self.stop_timer();
        self.state.phase = Phase::Paused;
        log::debug!("Paused at {}", self.current_year());
        self.present(Transition::Immediate)
    }

    /// Restart ticking from the current index.
    pub fn resume(&mut self) -> Result<(), PlaybackError> {
        if self.state.phase != Phase::Paused {
            return Ok(());
        }
        self.state.phase = Phase::Running;
        self.start_timer();
        log::debug!("Resumed at {}", self.current_year());
        Ok(())
    }

    /// Chart-surface click.
    pub fn toggle_pause(&mut self) -> Result<(), PlaybackError> {
        match self.state.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
            Phase::Idle => Ok(()),
        }
    }

    /// Pause (if running), switch the visible entity set and ease into it.
    /// Unknown entities are reported and replaced by [`EntityFilter::All`].
    /// The new filter is kept even if the draw fails; [`Self::refresh`] shows it later.
    pub fn set_filter(&mut self, filter: EntityFilter) -> Result<(), PlaybackError> {
        if self.state.phase == Phase::Idle {
            return Ok(());
        }
        let filter = match filter.validate(&self.snapshot) {
            Ok(()) => filter,
            Err(e) => {
                log::warn!("{e}; showing all entities");
                EntityFilter::All
            }
        };

        if self.state.phase == Phase::Running {
            self.stop_timer();
            self.state.phase = Phase::Paused;
        }
        log::debug!("Filter set to {filter}");
        self.state.filter = filter;
        self.present(Transition::Ease(self.interval))
    }

    /// Redraw the current state in full, e.g. once a hidden surface is back.
    /// Leaves index, phase and filter untouched. No-op when idle.
    pub fn refresh(&mut self) -> Result<(), PlaybackError> {
        if self.state.phase == Phase::Idle {
            return Ok(());
        }
        self.present(Transition::Immediate)
    }

    /// Cancel the timer unconditionally and go idle. Nothing renders afterwards.
    pub fn teardown(&mut self) {
        self.stop_timer();
        if self.state.phase != Phase::Idle {
            log::info!("Playback torn down at index {}", self.state.index);
        }
        self.state.phase = Phase::Idle;
    }

    // -- Internals --

    /// Current frame for the given transition.
    pub fn frame(&self, transition: Transition) -> DrawInstructions {
        render(&self.snapshot, self.state.index, &self.state.filter).with_transition(transition)
    }

    fn present(&mut self, transition: Transition) -> Result<(), PlaybackError> {
        let frame = self.frame(transition);
        if let Err(e) = self.renderer.draw(&frame) {
            self.stop_timer();
            if self.state.phase == Phase::Running {
                self.state.phase = Phase::Paused;
            }
            log::error!("Playback halted at {}: {e}", frame.year);
            return Err(e.into());
        }
        Ok(())
    }

    fn start_timer(&mut self) {
        self.stop_timer();
        self.timer = Some(self.scheduler.start(self.interval));
    }

    fn stop_timer(&mut self) {
        if let Some(id) = self.timer.take() {
            self.scheduler.cancel(id);
        }
    }
}

impl<R: Renderer, S: Scheduler> Drop for TimeSeriesAnimator<R, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
