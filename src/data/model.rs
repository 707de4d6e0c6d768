use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Deserialize;

/// Value carried by a year with no usable review.
pub const MISSING_VALUE: f64 = 0.0;

// ---------------------------------------------------------------------------
// ReviewRecord – one row of the review table
// ---------------------------------------------------------------------------

/// A single airline review, reduced to the columns the charts use.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRecord {
    pub airline: String,
    pub year: i32,
    /// Overall rating on a 0–10 scale; `None` when the cell was blank or `n`.
    pub rating: Option<f64>,
    /// `Recommended` column (`yes` / `no`).
    pub recommended: Option<bool>,
}

// ---------------------------------------------------------------------------
// Metric / Aggregation
// ---------------------------------------------------------------------------

/// Which per-review quantity a chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    OverallRating,
    RecommendedShare,
}

impl Metric {
    /// Y-axis range the values of this metric live in.
    pub fn value_domain(self) -> (f64, f64) {
        match self {
            Metric::OverallRating => (0.0, 10.0),
            Metric::RecommendedShare => (0.0, 100.0),
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            Metric::OverallRating => "Overall rating",
            Metric::RecommendedShare => "Recommended (%)",
        }
    }

    /// Per-review sample for this metric, if the review carries one.
    fn sample(self, review: &ReviewRecord) -> Option<f64> {
        match self {
            Metric::OverallRating => review.rating,
            Metric::RecommendedShare => review
                .recommended
                .map(|yes| if yes { 100.0 } else { 0.0 }),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::OverallRating => write!(f, "Overall rating"),
            Metric::RecommendedShare => write!(f, "Recommendation share"),
        }
    }
}

/// How several reviews for the same (airline, year) collapse to one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Aggregation {
    /// Average of every usable review.
    #[default]
    Mean,
    /// First usable review in file order.
    First,
}

// ---------------------------------------------------------------------------
// Series – one entity's values over the snapshot years
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
    /// `false` when `value` is the [`MISSING_VALUE`] sentinel.
    pub observed: bool,
}

impl SeriesPoint {
    pub fn as_plot_point(&self) -> [f64; 2] {
        [self.year as f64, self.value]
    }
}

/// One entity (airline) with exactly one point per snapshot year.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub entity: String,
    pub points: Vec<SeriesPoint>,
}

// ---------------------------------------------------------------------------
// Snapshot – immutable data for one rendering session
// ---------------------------------------------------------------------------

/// Widest year range a snapshot will be built over.
pub const MAX_YEAR_SPAN: usize = 200;

/// Inputs that shape a [`Snapshot`] out of raw reviews.
#[derive(Debug, Clone, Default)]
pub struct SnapshotOptions {
    /// Airlines to track, in legend order. Empty means every airline in the data.
    pub airlines: Vec<String>,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub aggregation: Aggregation,
}

/// The full set of series over a contiguous year range.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    metric: Metric,
    years: Vec<i32>,
    series: Vec<Series>,
}

impl Snapshot {
    /// Aggregate reviews into one series per tracked airline.
    pub fn from_reviews(reviews: &[ReviewRecord], metric: Metric, opts: &SnapshotOptions) -> Self {
        let airlines: Vec<String> = if opts.airlines.is_empty() {
            reviews
                .iter()
                .map(|r| r.airline.clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        } else {
            opts.airlines.clone()
        };

        let data_min = reviews.iter().map(|r| r.year).min();
        let data_max = reviews.iter().map(|r| r.year).max();
        let years: Vec<i32> = match (opts.first_year.or(data_min), opts.last_year.or(data_max)) {
            (Some(first), Some(last)) if first <= last => {
                let span = i64::from(last) - i64::from(first) + 1;
                if span > MAX_YEAR_SPAN as i64 {
                    log::warn!(
                        "{metric}: years {first}..={last} span {span} years (max {MAX_YEAR_SPAN}); nothing to play"
                    );
                    Vec::new()
                } else {
                    (first..=last).collect()
                }
            }
            _ => Vec::new(),
        };

        // (airline, year) → (sum, count) or first sample, in file order.
        let mut buckets: BTreeMap<(&str, i32), (f64, usize)> = BTreeMap::new();
        for review in reviews {
            let Some(sample) = metric.sample(review) else {
                continue;
            };
            let slot = buckets
                .entry((review.airline.as_str(), review.year))
                .or_insert((0.0, 0));
            match opts.aggregation {
                Aggregation::Mean => {
                    slot.0 += sample;
                    slot.1 += 1;
                }
                Aggregation::First if slot.1 == 0 => *slot = (sample, 1),
                Aggregation::First => {}
            }
        }

        let series = airlines
            .into_iter()
            .map(|airline| {
                let points = years
                    .iter()
                    .map(|&year| match buckets.get(&(airline.as_str(), year)) {
                        Some(&(sum, count)) if count > 0 => SeriesPoint {
                            year,
                            value: sum / count as f64,
                            observed: true,
                        },
                        _ => SeriesPoint {
                            year,
                            value: MISSING_VALUE,
                            observed: false,
                        },
                    })
                    .collect();
                Series {
                    entity: airline,
                    points,
                }
            })
            .collect();

        Snapshot {
            metric,
            years,
            series,
        }
    }

    /// Build a snapshot directly from per-entity values.
    /// Rows shorter than `years` are padded with the sentinel; longer rows are cut.
    pub fn from_values<S: Into<String>>(
        metric: Metric,
        years: impl IntoIterator<Item = i32>,
        rows: Vec<(S, Vec<f64>)>,
    ) -> Self {
        let years: Vec<i32> = years.into_iter().collect();
        let series = rows
            .into_iter()
            .map(|(entity, values)| Series {
                entity: entity.into(),
                points: years
                    .iter()
                    .enumerate()
                    .map(|(i, &year)| match values.get(i) {
                        Some(&value) => SeriesPoint {
                            year,
                            value,
                            observed: true,
                        },
                        None => SeriesPoint {
                            year,
                            value: MISSING_VALUE,
                            observed: false,
                        },
                    })
                    .collect(),
            })
            .collect();
        Snapshot {
            metric,
            years,
            series,
        }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn year_count(&self) -> usize {
        self.years.len()
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn entity_count(&self) -> usize {
        self.series.len()
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.series.iter().any(|s| s.entity == entity)
    }

    pub fn value_domain(&self) -> (f64, f64) {
        self.metric.value_domain()
    }
}
