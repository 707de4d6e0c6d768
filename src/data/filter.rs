use std::fmt;

use super::model::Snapshot;
use crate::playback::PlaybackError;

// ---------------------------------------------------------------------------
// Entity filter: which series a render includes
// ---------------------------------------------------------------------------

/// Either every entity, or exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EntityFilter {
    #[default]
    All,
    Only(String),
}

impl EntityFilter {
    pub fn only(entity: impl Into<String>) -> Self {
        EntityFilter::Only(entity.into())
    }

    pub fn matches(&self, entity: &str) -> bool {
        match self {
            EntityFilter::All => true,
            EntityFilter::Only(e) => e == entity,
        }
    }

    /// A filter is valid when it names an entity present in the snapshot.
    pub fn validate(&self, snapshot: &Snapshot) -> Result<(), PlaybackError> {
        match self {
            EntityFilter::All => Ok(()),
            EntityFilter::Only(e) if snapshot.contains(e) => Ok(()),
            EntityFilter::Only(e) => Err(PlaybackError::InvalidFilter(e.clone())),
        }
    }

    /// Sticky legend click: selecting the active entity again clears the filter.
    pub fn toggled(&self, entity: &str) -> Self {
        match self {
            EntityFilter::Only(e) if e == entity => EntityFilter::All,
            _ => EntityFilter::only(entity),
        }
    }
}

impl fmt::Display for EntityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityFilter::All => write!(f, "all"),
            EntityFilter::Only(e) => write!(f, "{e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Metric;

    #[test]
    fn toggling_the_active_entity_returns_to_all() {
        let f = EntityFilter::only("Emirates");
        assert_eq!(f.toggled("Emirates"), EntityFilter::All);
        assert_eq!(f.toggled("Qatar Airways"), EntityFilter::only("Qatar Airways"));
        assert_eq!(EntityFilter::All.toggled("Emirates"), f);
    }

    #[test]
    fn validate_rejects_unknown_entities() {
        let snap = Snapshot::from_values(Metric::OverallRating, 2015..=2016, vec![("Emirates", vec![1.0, 2.0])]);
        assert!(EntityFilter::All.validate(&snap).is_ok());
        assert!(EntityFilter::only("Emirates").validate(&snap).is_ok());
        assert!(matches!(
            EntityFilter::only("Nope").validate(&snap),
            Err(PlaybackError::InvalidFilter(name)) if name == "Nope"
        ));
    }
}
