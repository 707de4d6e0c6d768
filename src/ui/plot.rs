use std::time::Instant;

use eframe::egui::{Color32, Ui};
use egui_plot::{Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points};

use crate::playback::{DrawInstructions, Marker, PlaybackError, RenderError, Renderer, Transition};
use crate::state::ChartView;

// ---------------------------------------------------------------------------
// PlotSurface – the Renderer the animator draws into
// ---------------------------------------------------------------------------

/// Holds the latest frame for the plot to paint on the next egui pass.
#[derive(Debug)]
pub struct PlotSurface {
    frame: Option<DrawInstructions>,
    shown_at: Instant,
    attached: bool,
}

impl Default for PlotSurface {
    fn default() -> Self {
        Self {
            frame: None,
            shown_at: Instant::now(),
            attached: true,
        }
    }
}

impl PlotSurface {
    pub fn frame(&self) -> Option<&DrawInstructions> {
        self.frame.as_ref()
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// The chart is hidden; further draws fail until re-attached.
    pub fn detach(&mut self) {
        self.attached = false;
    }

    /// Fraction of the current frame's transition that has elapsed, in `0..=1`.
    pub fn progress(&self, now: Instant) -> f32 {
        let Some(frame) = &self.frame else {
            return 1.0;
        };
        let duration = frame.transition.duration();
        if duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.shown_at);
        (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}

impl Renderer for PlotSurface {
    fn draw(&mut self, frame: &DrawInstructions) -> Result<(), RenderError> {
        if !self.attached {
            return Err(RenderError::ContainerMissing);
        }
        self.frame = Some(frame.clone());
        self.shown_at = Instant::now();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Animated chart (central panel)
// ---------------------------------------------------------------------------

fn lerp(a: [f64; 2], b: [f64; 2], t: f64) -> [f64; 2] {
    [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t]
}

fn tooltip(markers: &[Marker], name: &str, value: &PlotPoint) -> String {
    let year = value.x.round();
    match markers
        .iter()
        .find(|m| m.entity == name && m.point[0] == year)
    {
        Some(m) if m.observed => format!("{name}\n{year:.0}: {:.2}", m.point[1]),
        Some(_) => format!("{name}\n{year:.0}: no data"),
        None => format!("{year:.0}"),
    }
}

/// Position and fill of `entity`'s highlighted marker. While the newest
/// segment is still growing the marker rides its tip.
fn now_marker(
    frame: &DrawInstructions,
    entity: &str,
    grown_tip: Option<[f64; 2]>,
) -> Option<([f64; 2], bool)> {
    frame
        .current_markers()
        .find(|m| m.entity == entity)
        .map(|m| (grown_tip.unwrap_or(m.point), m.observed))
}

/// Paint one chart from its surface. A click on the plot toggles playback.
pub fn animated_chart(ui: &mut Ui, view: &mut ChartView, height: f32) -> Result<(), PlaybackError> {
    let surface = view.animator.renderer();
    let Some(frame) = surface.frame().cloned() else {
        ui.label("Waiting for the first frame…");
        return Ok(());
    };
    let now = Instant::now();
    let t = surface.progress(now);

    let snapshot = view.animator.snapshot();
    let (y_min, y_max) = snapshot.value_domain();
    let years = snapshot.years();
    let (first_year, last_year) = match (years.first(), years.last()) {
        (Some(&f), Some(&l)) => (f as f64, l as f64),
        _ => (0.0, 1.0),
    };

    let reveal = matches!(frame.transition, Transition::Reveal(_));
    let alpha = match frame.transition {
        Transition::Ease(_) => t.max(0.15),
        _ => 1.0,
    };
    let markers = frame.markers.clone();

    let response = Plot::new(("review_chart", view.metric))
        .height(height)
        .x_axis_label("Year")
        .y_axis_label(view.metric.axis_label())
        .include_x(first_year - 0.25)
        .include_x(last_year + 0.25)
        .include_y(y_min)
        .include_y(y_max)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
        .label_formatter(move |name, value| tooltip(&markers, name, value))
        .show(ui, |plot_ui| {
            for line in &frame.polylines {
                let mut points = line.points.clone();
                let mut grown_tip = None;
                // Grow the newest segment towards the current year.
                if reveal && t < 1.0 && points.len() >= 2 {
                    let n = points.len();
                    points[n - 1] = lerp(points[n - 2], points[n - 1], t as f64);
                    grown_tip = Some(points[n - 1]);
                }
                let color = line.color.gamma_multiply(alpha);

                plot_ui.line(
                    Line::new(PlotPoints::from(points))
                        .name(&line.entity)
                        .color(color)
                        .width(2.0),
                );

                let (observed, missing): (Vec<&Marker>, Vec<&Marker>) = frame
                    .markers
                    .iter()
                    .filter(|m| m.entity == line.entity && !m.highlighted)
                    .partition(|m| m.observed);
                for (group, filled) in [(observed, true), (missing, false)] {
                    if group.is_empty() {
                        continue;
                    }
                    let pts: Vec<[f64; 2]> = group.iter().map(|m| m.point).collect();
                    plot_ui.points(
                        Points::new(pts)
                            .name(&line.entity)
                            .color(color)
                            .radius(3.0)
                            .filled(filled),
                    );
                }

                if let Some((at, filled)) = now_marker(&frame, &line.entity, grown_tip) {
                    plot_ui.points(
                        Points::new(vec![at])
                            .name(&line.entity)
                            .color(color)
                            .shape(MarkerShape::Circle)
                            .radius(6.0)
                            .filled(filled),
                    );
                }
            }
        });

    if t < 1.0 {
        ui.ctx().request_repaint();
    }

    if response.response.clicked() {
        view.animator.toggle_pause()?;
    }
    Ok(())
}

/// Placeholder shown for a hidden chart.
pub fn hidden_chart(ui: &mut Ui, view: &ChartView) {
    ui.colored_label(
        Color32::GRAY,
        format!("{} hidden (enable it in the toolbar)", view.metric),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::data::filter::EntityFilter;
    use crate::data::model::{Metric, Snapshot};
    use crate::playback::render;

    #[test]
    fn detached_surface_refuses_to_draw() {
        let mut surface = PlotSurface::default();
        surface.detach();
        assert_eq!(
            surface.draw(&DrawInstructions::default()),
            Err(RenderError::ContainerMissing)
        );
        assert!(surface.frame().is_none());

        surface.attach();
        assert!(surface.draw(&DrawInstructions::default()).is_ok());
        assert!(surface.frame().is_some());
    }

    #[test]
    fn immediate_frames_are_complete_at_once() {
        let mut surface = PlotSurface::default();
        surface.draw(&DrawInstructions::default()).unwrap();
        assert_eq!(surface.progress(Instant::now()), 1.0);
    }

    #[test]
    fn reveal_progress_runs_over_the_transition() {
        let mut surface = PlotSurface::default();
        let frame = DrawInstructions::default().with_transition(Transition::Reveal(Duration::from_secs(10)));
        surface.draw(&frame).unwrap();
        let start = surface.shown_at;

        assert_eq!(surface.progress(start), 0.0);
        assert!((surface.progress(start + Duration::from_secs(5)) - 0.5).abs() < 1e-6);
        assert_eq!(surface.progress(start + Duration::from_secs(20)), 1.0);
    }

    #[test]
    fn now_marker_follows_the_highlighted_point() {
        let snapshot = Snapshot::from_values(
            Metric::OverallRating,
            2015..=2017,
            vec![("Emirates", vec![7.0, 7.5]), ("Qatar Airways", vec![8.0, 8.5, 9.0])],
        );
        let frame = render(&snapshot, 2, &EntityFilter::All);

        // Emirates has no 2017 value: hollow marker at the sentinel.
        assert_eq!(now_marker(&frame, "Emirates", None), Some(([2017.0, 0.0], false)));
        assert_eq!(now_marker(&frame, "Qatar Airways", None), Some(([2017.0, 9.0], true)));
        assert_eq!(
            now_marker(&frame, "Qatar Airways", Some([2016.5, 8.75])),
            Some(([2016.5, 8.75], true))
        );
        assert_eq!(now_marker(&frame, "Oman Air", None), None);
    }

    #[test]
    fn tooltip_reports_missing_values() {
        let markers = vec![
            Marker {
                entity: "Emirates".into(),
                color: Color32::RED,
                point: [2016.0, 7.25],
                observed: true,
                highlighted: false,
            },
            Marker {
                entity: "Emirates".into(),
                color: Color32::RED,
                point: [2017.0, 0.0],
                observed: false,
                highlighted: true,
            },
        ];
        assert_eq!(
            tooltip(&markers, "Emirates", &PlotPoint::new(2016.1, 7.0)),
            "Emirates\n2016: 7.25"
        );
        assert_eq!(
            tooltip(&markers, "Emirates", &PlotPoint::new(2017.0, 0.0)),
            "Emirates\n2017: no data"
        );
        assert_eq!(tooltip(&markers, "", &PlotPoint::new(2015.0, 3.0)), "2015");
    }
}
