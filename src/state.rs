use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::ViewerConfig;
use crate::data::loader::load_file;
use crate::data::model::{Metric, ReviewRecord, Snapshot};
use crate::playback::{IntervalTimer, LegendState, PlaybackError, TimeSeriesAnimator};
use crate::ui::plot::PlotSurface;

pub type ChartAnimator = TimeSeriesAnimator<PlotSurface, IntervalTimer>;

// ---------------------------------------------------------------------------
// One animated chart
// ---------------------------------------------------------------------------

/// An independent chart: its own animator, timer and legend gestures.
pub struct ChartView {
    pub metric: Metric,
    pub animator: ChartAnimator,
    pub legend: LegendState,
    pub visible: bool,
}

impl ChartView {
    pub fn new(snapshot: Snapshot, tick: Duration) -> Result<Self, PlaybackError> {
        let metric = snapshot.metric();
        let animator = TimeSeriesAnimator::initialize(
            Arc::new(snapshot),
            tick,
            PlotSurface::default(),
            IntervalTimer::new(),
        )?;
        Ok(Self {
            metric,
            animator,
            legend: LegendState::default(),
            visible: true,
        })
    }

    /// Show or hide the chart. Hidden charts detach their surface, so a
    /// running animation halts on its next tick. Showing redraws the
    /// current state, which may have changed while hidden.
    pub fn set_visible(&mut self, visible: bool) -> Result<(), PlaybackError> {
        self.visible = visible;
        if !visible {
            self.animator.renderer_mut().detach();
            return Ok(());
        }
        self.animator.renderer_mut().attach();
        self.animator.refresh()
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewerConfig,

    /// Reviews from the last loaded file.
    pub reviews: Vec<ReviewRecord>,

    /// File the reviews came from.
    pub source: Option<PathBuf>,

    /// One chart per configured metric.
    pub charts: Vec<ChartView>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            reviews: Vec::new(),
            source: None,
            charts: Vec::new(),
            status_message: None,
            loading: false,
        }
    }

    /// Load a review file and rebuild every chart from it.
    pub fn load_path(&mut self, path: &Path) {
        self.loading = true;
        match load_file(path, &self.config.columns) {
            Ok(reviews) => self.set_reviews(reviews, Some(path.to_path_buf())),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                self.loading = false;
            }
        }
    }

    /// Ingest reviews: tear down the old charts, then start one per metric.
    pub fn set_reviews(&mut self, reviews: Vec<ReviewRecord>, source: Option<PathBuf>) {
        self.teardown();
        self.status_message = None;

        let opts = self.config.snapshot_options();
        let tick = self.config.tick_interval();
        for &metric in &self.config.metrics {
            let snapshot = Snapshot::from_reviews(&reviews, metric, &opts);
            match ChartView::new(snapshot, tick) {
                Ok(view) => self.charts.push(view),
                Err(e) => {
                    log::error!("{metric} chart unavailable: {e}");
                    self.status_message = Some(format!("{metric}: {e}"));
                }
            }
        }

        self.reviews = reviews;
        self.source = source;
        self.loading = false;
    }

    /// Stop every chart's timer and drop the charts.
    pub fn teardown(&mut self) {
        for chart in &mut self.charts {
            chart.animator.teardown();
        }
        self.charts.clear();
    }

    /// Deliver due ticks. Returns how long until the next one is due.
    pub fn poll_timers(&mut self, now: Instant) -> Option<Duration> {
        let mut errors = Vec::new();
        let mut next_due: Option<Duration> = None;

        for chart in &mut self.charts {
            if let Some(id) = chart.animator.scheduler_mut().poll(now) {
                if let Err(e) = chart.animator.on_timer(id) {
                    errors.push((chart.metric, e));
                }
            }
            if let Some(wait) = chart.animator.scheduler_mut().time_until_due(now) {
                next_due = Some(next_due.map_or(wait, |d| d.min(wait)));
            }
        }

        for (metric, e) in errors {
            self.report(metric, e);
        }
        next_due
    }

    /// Surface a playback error in the status line.
    pub fn report(&mut self, metric: Metric, error: PlaybackError) {
        self.status_message = Some(format!("{metric}: {error}"));
    }

    pub fn play_all(&mut self) {
        let mut errors = Vec::new();
        for chart in &mut self.charts {
            if let Err(e) = chart.animator.resume() {
                errors.push((chart.metric, e));
            }
        }
        for (metric, e) in errors {
            self.report(metric, e);
        }
    }

    pub fn pause_all(&mut self) {
        let mut errors = Vec::new();
        for chart in &mut self.charts {
            if let Err(e) = chart.animator.pause() {
                errors.push((chart.metric, e));
            }
        }
        for (metric, e) in errors {
            self.report(metric, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::Phase;

    fn reviews() -> Vec<ReviewRecord> {
        [("Emirates", 2015, 8.0, true), ("Emirates", 2016, 6.0, false), ("Lufthansa", 2016, 5.0, true)]
            .into_iter()
            .map(|(airline, year, rating, rec)| ReviewRecord {
                airline: airline.into(),
                year,
                rating: Some(rating),
                recommended: Some(rec),
            })
            .collect()
    }

    fn config() -> ViewerConfig {
        ViewerConfig {
            airlines: Vec::new(),
            ..ViewerConfig::default()
        }
    }

    #[test]
    fn one_chart_per_metric() {
        let mut state = AppState::new(config());
        state.set_reviews(reviews(), None);

        assert_eq!(state.charts.len(), 2);
        assert_eq!(state.charts[0].metric, Metric::OverallRating);
        assert_eq!(state.charts[1].metric, Metric::RecommendedShare);
        assert!(state.charts.iter().all(|c| c.animator.phase() == Phase::Running));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn empty_dataset_reports_instead_of_starting() {
        let mut state = AppState::new(config());
        state.set_reviews(Vec::new(), None);

        assert!(state.charts.is_empty());
        assert!(state.status_message.as_deref().unwrap().contains("empty"));
    }

    #[test]
    fn hidden_chart_halts_on_next_tick() {
        let mut state = AppState::new(config());
        state.set_reviews(reviews(), None);
        state.charts[0].set_visible(false).unwrap();

        let chart = &mut state.charts[0];
        let id = chart.animator.timer().unwrap();
        let err = chart.animator.on_timer(id).unwrap_err();
        assert!(matches!(err, PlaybackError::RenderUnavailable(_)));
        assert_eq!(chart.animator.phase(), Phase::Paused);
        // The other chart keeps running.
        assert_eq!(state.charts[1].animator.phase(), Phase::Running);
    }

    #[test]
    fn showing_a_chart_redraws_what_changed_while_hidden() {
        let mut state = AppState::new(config());
        state.set_reviews(reviews(), None);
        let chart = &mut state.charts[0];
        chart.animator.pause().unwrap();
        chart.set_visible(false).unwrap();

        let result = chart.legend.hover(&mut chart.animator, Some("Lufthansa"));
        assert!(matches!(result, Err(PlaybackError::RenderUnavailable(_))));
        assert_eq!(chart.animator.renderer().frame().unwrap().polylines.len(), 2);

        chart.set_visible(true).unwrap();
        let frame = chart.animator.renderer().frame().unwrap();
        assert_eq!(frame.polylines.len(), 1);
        assert_eq!(frame.polylines[0].entity, "Lufthansa");
        assert_eq!(chart.animator.phase(), Phase::Paused);
    }

    #[test]
    fn reloading_tears_down_previous_charts() {
        let mut state = AppState::new(config());
        state.set_reviews(reviews(), None);
        state.pause_all();
        state.set_reviews(reviews(), None);

        assert_eq!(state.charts.len(), 2);
        assert!(state.charts.iter().all(|c| c.animator.index() == 0));
        assert!(state.charts.iter().all(|c| c.animator.phase() == Phase::Running));
    }

    #[test]
    fn poll_reports_time_until_next_tick() {
        let mut state = AppState::new(config());
        state.set_reviews(reviews(), None);
        let wait = state.poll_timers(Instant::now()).unwrap();
        assert!(wait <= state.config.tick_interval());

        state.pause_all();
        assert_eq!(state.poll_timers(Instant::now()), None);
    }
}
