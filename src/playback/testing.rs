//! In-memory fakes for exercising the playback core without a window.

use std::time::Duration;

use super::animator::Renderer;
use super::error::RenderError;
use super::render::DrawInstructions;
use super::timer::{Scheduler, TimerId};

/// Keeps every frame it is asked to draw; fails every draw while `fail` is set.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<DrawInstructions>,
    pub fail: bool,
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, frame: &DrawInstructions) -> Result<(), RenderError> {
        if self.fail {
            return Err(RenderError::ContainerMissing);
        }
        self.frames.push(frame.clone());
        Ok(())
    }
}

/// Scheduler that never fires on its own; tests fire `active()` by hand.
/// Panics if a second timer is started while one is active.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    active: Option<TimerId>,
    pub started: usize,
    pub cancelled: Vec<TimerId>,
}

impl ManualScheduler {
    pub fn active(&self) -> Option<TimerId> {
        self.active
    }
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, _interval: Duration) -> TimerId {
        assert!(
            self.active.is_none(),
            "timer started while {:?} is still active",
            self.active
        );
        let id = TimerId::new(self.next_id);
        self.next_id += 1;
        self.started += 1;
        self.active = Some(id);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if self.active == Some(id) {
            self.active = None;
        }
        self.cancelled.push(id);
    }
}
