//! Error types for camp configuration.

use thiserror::Error;

use crate::models::Day;

/// Fatal configuration problems. Detected before any scheduling starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// The slot grid has no slots.
    #[error("slot grid has no slots")]
    EmptyGrid,

    /// Two catalog entries share a name.
    #[error("duplicate activity in catalog: {0}")]
    DuplicateActivity(String),

    /// An activity occupies zero slots.
    #[error("activity '{0}' has a zero-slot duration")]
    ZeroDuration(String),

    /// A rule list names an activity missing from the catalog.
    #[error("{list} references unknown activity '{name}'")]
    UnknownActivity { list: &'static str, name: String },

    /// The default-fill list is empty.
    #[error("default-fill list is empty")]
    EmptyDefaultFill,

    /// The first default-fill activity is used for forced placements and
    /// must fit in one slot.
    #[error("first default-fill activity '{0}' must be a single-slot activity")]
    MultiSlotForcedFill(String),

    /// A rule refers to a day without slots.
    #[error("{context} refers to {day}, which has no slots")]
    DayOutsideGrid { context: &'static str, day: Day },

    /// The beach rule allows a slot number no day has.
    #[error("beach rule allows slot {0}, which no day has")]
    SlotOutsideGrid(u8),

    /// Rank band bounds must be strictly increasing and non-zero.
    #[error("rank bands must be strictly increasing and start above zero")]
    InvalidRankBands,
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl ConfigError {
    /// Returns true if the error came from parsing rather than validation.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, ConfigError::Parse(_))
    }
}
