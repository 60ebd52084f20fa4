//! Activity model.
//!
//! An activity is a schedulable camp offering. It occupies one or more
//! contiguous slots on a single day, lives in a physical zone, and may be
//! limited by per-slot capacity, a shared exclusive area, or a staff pool.
//!
//! # Duration Model
//! Durations are whole slots. Fractional real-world lengths are rounded up
//! (a 90-minute session in 60-minute slots takes 2 slots). Some activities
//! take longer for large troops, see [`LargeTroopDuration`].

use serde::{Deserialize, Serialize};

use super::{ActivityId, Day, Troop};

/// Physical camp zone of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Delta,
    Beach,
    OutdoorSkills,
    Tower,
    OffCamp,
    Campsite,
}

/// A camp activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique activity name.
    pub name: ActivityId,
    /// Duration in whole slots (≥ 1).
    pub slots: u8,
    /// Physical zone.
    pub zone: Zone,
    /// Exclusive area shared with related activities (per-slot capacity
    /// applies across the whole area).
    #[serde(default)]
    pub area: Option<String>,
    /// Staff pool that runs this activity.
    #[serde(default)]
    pub staff: Option<String>,
    /// Maximum troops in one slot. `None` = unlimited.
    #[serde(default)]
    pub max_troops: Option<u32>,
    /// Largest troop (scouts + adults) allowed at all.
    #[serde(default)]
    pub max_troop_size: Option<u32>,
    /// When set, troops may only share a slot if every sharer is at or
    /// below this size.
    #[serde(default)]
    pub share_size_limit: Option<u32>,
    /// Longer duration for large troops.
    #[serde(default)]
    pub large_troop: Option<LargeTroopDuration>,
    /// Days on which the activity never runs.
    #[serde(default)]
    pub blocked_days: Vec<Day>,
    /// Whether a troop may be given this activity more than once.
    #[serde(default)]
    pub repeatable: bool,
}

/// Extended duration applied when a troop has at least `min_scouts` scouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LargeTroopDuration {
    /// Scout count at which the extended duration applies.
    pub min_scouts: u32,
    /// Duration for such troops.
    pub slots: u8,
}

impl Activity {
    /// Creates a single-slot, unlimited activity.
    pub fn new(name: impl Into<ActivityId>, zone: Zone) -> Self {
        Self {
            name: name.into(),
            slots: 1,
            zone,
            area: None,
            staff: None,
            max_troops: None,
            max_troop_size: None,
            share_size_limit: None,
            large_troop: None,
            blocked_days: Vec::new(),
            repeatable: false,
        }
    }

    /// Sets the duration in slots.
    pub fn with_slots(mut self, slots: u8) -> Self {
        self.slots = slots;
        self
    }

    /// Places the activity in an exclusive area.
    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    /// Assigns the staff pool.
    pub fn with_staff(mut self, staff: impl Into<String>) -> Self {
        self.staff = Some(staff.into());
        self
    }

    /// Limits simultaneous troops per slot.
    pub fn with_max_troops(mut self, max: u32) -> Self {
        self.max_troops = Some(max);
        self
    }

    /// Exclusive: one troop per slot.
    pub fn exclusive(self) -> Self {
        self.with_max_troops(1)
    }

    /// Limits eligible troop size.
    pub fn with_max_troop_size(mut self, size: u32) -> Self {
        self.max_troop_size = Some(size);
        self
    }

    /// Allows sharing only between troops at or below `size`.
    pub fn with_share_size_limit(mut self, size: u32) -> Self {
        self.share_size_limit = Some(size);
        self
    }

    /// Extends duration for troops with at least `min_scouts` scouts.
    pub fn with_large_troop_slots(mut self, min_scouts: u32, slots: u8) -> Self {
        self.large_troop = Some(LargeTroopDuration { min_scouts, slots });
        self
    }

    /// Blocks the activity on a day.
    pub fn blocked_on(mut self, day: Day) -> Self {
        self.blocked_days.push(day);
        self
    }

    /// Allows repeated assignment to the same troop.
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    /// Slots this activity occupies for the given troop.
    pub fn slots_for(&self, troop: &Troop) -> u8 {
        match &self.large_troop {
            Some(ext) if troop.scouts >= ext.min_scouts => ext.slots,
            _ => self.slots,
        }
    }

    /// Whether the troop is too large for this activity.
    pub fn excludes(&self, troop: &Troop) -> bool {
        self.max_troop_size.is_some_and(|max| troop.size() > max)
    }

    /// Whether the activity runs on the given day.
    pub fn runs_on(&self, day: Day) -> bool {
        !self.blocked_days.contains(&day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_builder() {
        let act = Activity::new("Sailing", Zone::Beach)
            .with_slots(2)
            .with_staff("Beach Staff")
            .exclusive();

        assert_eq!(act.name, "Sailing");
        assert_eq!(act.slots, 2);
        assert_eq!(act.zone, Zone::Beach);
        assert_eq!(act.staff.as_deref(), Some("Beach Staff"));
        assert_eq!(act.max_troops, Some(1));
        assert!(!act.repeatable);
    }

    #[test]
    fn test_large_troop_duration() {
        let tower = Activity::new("Climbing Tower", Zone::Tower).with_large_troop_slots(16, 2);
        let small = Troop::new("Small").with_members(12, 3);
        let large = Troop::new("Large").with_members(16, 2);

        assert_eq!(tower.slots_for(&small), 1);
        assert_eq!(tower.slots_for(&large), 2);
    }

    #[test]
    fn test_size_eligibility() {
        let shotgun = Activity::new("Troop Shotgun", Zone::Beach).with_max_troop_size(15);
        assert!(!shotgun.excludes(&Troop::new("A").with_members(13, 2)));
        assert!(shotgun.excludes(&Troop::new("B").with_members(14, 2)));
    }

    #[test]
    fn test_blocked_day() {
        let shower = Activity::new("Shower House", Zone::Beach).blocked_on(Day::Monday);
        assert!(!shower.runs_on(Day::Monday));
        assert!(shower.runs_on(Day::Tuesday));
    }

    #[test]
    fn test_activity_deserialize_defaults() {
        let act: Activity =
            serde_json::from_str(r#"{"name": "Gaga Ball", "slots": 1, "zone": "beach"}"#).unwrap();
        assert_eq!(act.name, "Gaga Ball");
        assert_eq!(act.max_troops, None);
        assert!(act.blocked_days.is_empty());
    }
}
