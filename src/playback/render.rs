use std::time::Duration;

use eframe::egui::Color32;

use crate::color::ColorMap;
use crate::data::filter::EntityFilter;
use crate::data::model::Snapshot;

// ---------------------------------------------------------------------------
// Draw instructions – what the renderer is asked to show
// ---------------------------------------------------------------------------

/// How the renderer should move from the previous frame to this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    /// Replace the previous frame outright.
    #[default]
    Immediate,
    /// Grow the newest segment of every polyline over the duration.
    Reveal(Duration),
    /// Fade between entity sets over the duration.
    Ease(Duration),
}

impl Transition {
    pub fn duration(&self) -> Duration {
        match self {
            Transition::Immediate => Duration::ZERO,
            Transition::Reveal(d) | Transition::Ease(d) => *d,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub entity: String,
    pub color: Color32,
    /// `[year, value]` pairs from the first year up to the current index.
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub entity: String,
    pub color: Color32,
    pub point: [f64; 2],
    /// `false` when the value is the missing-data sentinel.
    pub observed: bool,
    /// Set on the current-index point only.
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub entity: String,
    pub color: Color32,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawInstructions {
    pub index: usize,
    pub year: i32,
    pub polylines: Vec<Polyline>,
    pub markers: Vec<Marker>,
    pub legend: Vec<LegendEntry>,
    pub transition: Transition,
}

impl DrawInstructions {
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    pub fn polyline(&self, entity: &str) -> Option<&Polyline> {
        self.polylines.iter().find(|p| p.entity == entity)
    }

    /// The highlighted "now" markers, one per visible entity.
    pub fn current_markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(|m| m.highlighted)
    }
}

// ---------------------------------------------------------------------------
// render – pure function of (snapshot, index, filter)
// ---------------------------------------------------------------------------

/// Cumulative reveal: every entity passing `filter` gets its points
/// `0..=index`, with the point at `index` marked as highlighted.
///
/// `index` wraps modulo the year count. An empty snapshot renders nothing.
pub fn render(snapshot: &Snapshot, index: usize, filter: &EntityFilter) -> DrawInstructions {
    let year_count = snapshot.year_count();
    if year_count == 0 {
        return DrawInstructions::default();
    }
    let index = index % year_count;
    let colors = ColorMap::for_entities(snapshot.series().iter().map(|s| s.entity.as_str()));

    let mut polylines = Vec::new();
    let mut markers = Vec::new();
    let mut legend = Vec::with_capacity(snapshot.entity_count());

    for series in snapshot.series() {
        let color = colors.color_for(&series.entity);
        let active = filter.matches(&series.entity);
        legend.push(LegendEntry {
            entity: series.entity.clone(),
            color,
            active,
        });
        if !active {
            continue;
        }

        let revealed = &series.points[..=index];
        polylines.push(Polyline {
            entity: series.entity.clone(),
            color,
            points: revealed.iter().map(|p| p.as_plot_point()).collect(),
        });
        markers.extend(revealed.iter().enumerate().map(|(i, p)| Marker {
            entity: series.entity.clone(),
            color,
            point: p.as_plot_point(),
            observed: p.observed,
            highlighted: i == index,
        }));
    }

    DrawInstructions {
        index,
        year: snapshot.years()[index],
        polylines,
        markers,
        legend,
        transition: Transition::Immediate,
    }
}
