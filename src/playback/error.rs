use thiserror::Error;

/// Failures reported by a [`Renderer`](super::Renderer).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("chart container is not attached")]
    ContainerMissing,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Construction-time: nothing to animate.
    #[error("dataset is empty ({entities} entities over {years} years)")]
    EmptyDataset { entities: usize, years: usize },

    /// Playback was halted; call `resume` (or rebuild the view) to recover.
    #[error("render surface unavailable: {0}")]
    RenderUnavailable(#[from] RenderError),

    /// Filter names an entity the snapshot does not track.
    #[error("unknown entity '{0}'")]
    InvalidFilter(String),
}
