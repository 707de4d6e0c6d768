use super::animator::{Renderer, TimeSeriesAnimator};
use super::error::PlaybackError;
use super::timer::Scheduler;
use crate::data::filter::EntityFilter;

/// Legend gestures: hovering previews an entity, clicking pins it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegendState {
    /// Filter set by clicks; restored when a hover preview ends.
    pub sticky: EntityFilter,
    /// Entity currently under the pointer, if it is being previewed.
    pub preview: Option<String>,
}

impl LegendState {
    /// Pointer is over `entity` (`None` once it leaves every legend entry).
    pub fn hover<R: Renderer, S: Scheduler>(
        &mut self,
        animator: &mut TimeSeriesAnimator<R, S>,
        entity: Option<&str>,
    ) -> Result<(), PlaybackError> {
        if self.preview.as_deref() == entity {
            return Ok(());
        }
        match entity {
            Some(e) => {
                self.preview = Some(e.to_string());
                animator.set_filter(EntityFilter::only(e))
            }
            None => {
                self.preview = None;
                animator.set_filter(self.sticky.clone())
            }
        }
    }

    /// Toggle the sticky filter on `entity`.
    pub fn click<R: Renderer, S: Scheduler>(
        &mut self,
        animator: &mut TimeSeriesAnimator<R, S>,
        entity: &str,
    ) -> Result<(), PlaybackError> {
        self.sticky = self.sticky.toggled(entity);
        self.preview = None;
        animator.set_filter(self.sticky.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::data::model::{Metric, Snapshot};
    use crate::playback::Phase;
    use crate::playback::testing::{ManualScheduler, RecordingRenderer};

    fn animator() -> TimeSeriesAnimator<RecordingRenderer, ManualScheduler> {
        let snap = Snapshot::from_values(
            Metric::OverallRating,
            2015..=2019,
            vec![
                ("Emirates", vec![7.0, 7.5, 8.0, 8.5, 9.0]),
                ("Lufthansa", vec![6.0, 5.5, 5.0, 5.5, 6.0]),
            ],
        );
        TimeSeriesAnimator::initialize(
            Arc::new(snap),
            Duration::from_millis(500),
            RecordingRenderer::default(),
            ManualScheduler::default(),
        )
        .unwrap()
    }

    #[test]
    fn hover_previews_then_restores_sticky_filter() {
        let mut anim = animator();
        let mut legend = LegendState::default();

        legend.hover(&mut anim, Some("Lufthansa")).unwrap();
        assert_eq!(anim.filter(), &EntityFilter::only("Lufthansa"));
        assert_eq!(anim.phase(), Phase::Paused);

        legend.hover(&mut anim, None).unwrap();
        assert_eq!(anim.filter(), &EntityFilter::All);
        assert_eq!(legend.preview, None);
    }

    #[test]
    fn repeated_hover_on_same_entry_renders_once() {
        let mut anim = animator();
        let mut legend = LegendState::default();
        legend.hover(&mut anim, Some("Emirates")).unwrap();
        let renders = anim.renderer().frames.len();

        legend.hover(&mut anim, Some("Emirates")).unwrap();
        assert_eq!(anim.renderer().frames.len(), renders);
    }

    #[test]
    fn click_pins_and_unpins_an_entity() {
        let mut anim = animator();
        let mut legend = LegendState::default();

        legend.hover(&mut anim, Some("Emirates")).unwrap();
        legend.click(&mut anim, "Emirates").unwrap();
        assert_eq!(legend.sticky, EntityFilter::only("Emirates"));

        // Leaving the entry keeps the pinned filter.
        legend.hover(&mut anim, None).unwrap();
        assert_eq!(anim.filter(), &EntityFilter::only("Emirates"));

        legend.click(&mut anim, "Emirates").unwrap();
        assert_eq!(anim.filter(), &EntityFilter::All);
    }

    #[test]
    fn gestures_preserve_the_index() {
        let mut anim = animator();
        let id = anim.timer().unwrap();
        anim.on_timer(id).unwrap();
        anim.on_timer(id).unwrap();

        let mut legend = LegendState::default();
        legend.hover(&mut anim, Some("Lufthansa")).unwrap();
        legend.click(&mut anim, "Emirates").unwrap();
        legend.hover(&mut anim, None).unwrap();
        assert_eq!(anim.index(), 2);
    }
}
