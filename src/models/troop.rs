//! Troop model.
//!
//! A troop is the unit of assignment. It carries a ranked preference list,
//! optional day pins, an optional commissioner, and an optional split-group
//! identity for paired sub-troops ("Eagle-A" / "Eagle-B").

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ActivityId, Day, TroopId};

/// A troop to be scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Troop {
    /// Unique troop name.
    pub name: TroopId,
    /// Number of scouts.
    pub scouts: u32,
    /// Number of adult leaders.
    pub adults: u32,
    /// Ranked activity preferences (index 0 = rank 1).
    #[serde(default)]
    pub preferences: Vec<ActivityId>,
    /// Day-specific requests: activities that must run on that day.
    #[serde(default)]
    pub day_requests: BTreeMap<Day, Vec<ActivityId>>,
    /// Overseeing commissioner.
    #[serde(default)]
    pub commissioner: Option<String>,
    /// Base name of the split group this troop belongs to.
    #[serde(default)]
    pub split_group: Option<String>,
}

impl Troop {
    /// Creates a troop with 10 scouts and 2 adults and no preferences.
    pub fn new(name: impl Into<TroopId>) -> Self {
        Self {
            name: name.into(),
            scouts: 10,
            adults: 2,
            preferences: Vec::new(),
            day_requests: BTreeMap::new(),
            commissioner: None,
            split_group: None,
        }
    }

    /// Sets scout and adult counts.
    pub fn with_members(mut self, scouts: u32, adults: u32) -> Self {
        self.scouts = scouts;
        self.adults = adults;
        self
    }

    /// Sets the ranked preference list.
    pub fn with_preferences<I, S>(mut self, preferences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ActivityId>,
    {
        self.preferences = preferences.into_iter().map(Into::into).collect();
        self
    }

    /// Pins an activity to a day.
    pub fn with_day_request(mut self, day: Day, activity: impl Into<ActivityId>) -> Self {
        self.day_requests.entry(day).or_default().push(activity.into());
        self
    }

    /// Sets the commissioner.
    pub fn with_commissioner(mut self, commissioner: impl Into<String>) -> Self {
        self.commissioner = Some(commissioner.into());
        self
    }

    /// Sets the split-group base name explicitly.
    pub fn with_split_group(mut self, base: impl Into<String>) -> Self {
        self.split_group = Some(base.into());
        self
    }

    /// Total size (scouts + adults).
    #[inline]
    pub fn size(&self) -> u32 {
        self.scouts + self.adults
    }

    /// 1-based preference rank, or `None` if not requested.
    pub fn rank_of(&self, activity: &str) -> Option<usize> {
        self.preferences
            .iter()
            .position(|p| p.as_str() == activity)
            .map(|i| i + 1)
    }

    /// Preferences with their ranks, in rank order.
    pub fn ranked_preferences(&self) -> impl Iterator<Item = (usize, &ActivityId)> {
        self.preferences.iter().enumerate().map(|(i, a)| (i + 1, a))
    }

    /// The first `count` preferences.
    pub fn top_preferences(&self, count: usize) -> &[ActivityId] {
        &self.preferences[..count.min(self.preferences.len())]
    }

    /// Days on which the activity is pinned.
    pub fn pinned_days(&self, activity: &str) -> Vec<Day> {
        self.day_requests
            .iter()
            .filter(|(_, acts)| acts.iter().any(|a| a.as_str() == activity))
            .map(|(&day, _)| day)
            .collect()
    }

    /// Activities pinned to a day.
    pub fn requests_on(&self, day: Day) -> &[ActivityId] {
        self.day_requests.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Split-group base name: the explicit group, else the name minus an
    /// "-A"/"-B" suffix.
    pub fn split_base(&self) -> Option<&str> {
        if let Some(base) = &self.split_group {
            return Some(base.as_str());
        }
        let name = self.name.as_str();
        name.strip_suffix("-A").or_else(|| name.strip_suffix("-B"))
    }
}
