//! Schedule (solution) model.
//!
//! A schedule is a mutable store of `(slot, activity, troop)` entries plus
//! the violations recorded while building it. Multi-slot placements are
//! stored as one entry per occupied slot.
//!
//! The store enforces no scheduling rule itself. Callers check legality
//! with the constraint evaluator before adding entries; forced placements
//! are tagged and recorded as violations instead.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::{Activity, ActivityId, Day, SlotGrid, TimeSlot, Troop, TroopId};

/// A complete (or partially built) weekly schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Entries in insertion order.
    pub entries: Vec<ScheduleEntry>,
    /// Violations recorded while building this schedule.
    pub violations: Vec<Violation>,
}

/// One troop doing one activity in one slot.
///
/// Equality and hashing use `(time_slot, activity, troop)` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Occupied slot.
    pub time_slot: TimeSlot,
    /// Activity key.
    pub activity: ActivityId,
    /// Troop key.
    pub troop: TroopId,
    /// Placed despite failing legality checks.
    pub forced: bool,
}

impl ScheduleEntry {
    /// Creates a regular entry.
    pub fn new(time_slot: TimeSlot, activity: ActivityId, troop: TroopId) -> Self {
        Self {
            time_slot,
            activity,
            troop,
            forced: false,
        }
    }
}

impl PartialEq for ScheduleEntry {
    fn eq(&self, other: &Self) -> bool {
        self.time_slot == other.time_slot
            && self.activity == other.activity
            && self.troop == other.troop
    }
}

impl Eq for ScheduleEntry {}

impl Hash for ScheduleEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.time_slot.hash(state);
        self.activity.hash(state);
        self.troop.hash(state);
    }
}

/// A recorded rule violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Troop the violation is attributed to.
    pub troop: TroopId,
    /// Activity involved.
    pub activity: ActivityId,
    /// Slot involved.
    pub time_slot: TimeSlot,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of recorded violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Activity placed although no legal placement existed.
    ForcedPlacement,
    /// Entry removed to repair a double booking or capacity overshoot.
    Eviction,
    /// Domain-specific violation.
    Custom(String),
}

impl Violation {
    /// Creates a forced-placement violation.
    pub fn forced_placement(
        troop: &TroopId,
        activity: &ActivityId,
        time_slot: TimeSlot,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type: ViolationType::ForcedPlacement,
            troop: troop.clone(),
            activity: activity.clone(),
            time_slot,
            message: message.into(),
            severity: 90,
        }
    }

    /// Creates an eviction violation.
    pub fn eviction(
        troop: &TroopId,
        activity: &ActivityId,
        time_slot: TimeSlot,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type: ViolationType::Eviction,
            troop: troop.clone(),
            activity: activity.clone(),
            time_slot,
            message: message.into(),
            severity: 60,
        }
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one entry per slot the activity spans for this troop, starting
    /// at `start`. Returns the occupied slots.
    pub fn add_entry(&mut self, start: TimeSlot, activity: &Activity, troop: &Troop) -> Vec<TimeSlot> {
        self.push_block(start, activity, troop, false)
    }

    /// Like [`add_entry`](Self::add_entry), but tags the entries as forced.
    /// Recording the violation is the caller's job.
    pub fn add_forced(&mut self, start: TimeSlot, activity: &Activity, troop: &Troop) -> Vec<TimeSlot> {
        self.push_block(start, activity, troop, true)
    }

    fn push_block(
        &mut self,
        start: TimeSlot,
        activity: &Activity,
        troop: &Troop,
        forced: bool,
    ) -> Vec<TimeSlot> {
        let slots: Vec<TimeSlot> = (0..activity.slots_for(troop))
            .map(|i| start.offset(i))
            .collect();
        for &slot in &slots {
            self.entries.push(ScheduleEntry {
                time_slot: slot,
                activity: activity.name.clone(),
                troop: troop.name.clone(),
                forced,
            });
        }
        slots
    }

    /// Adds a violation.
    pub fn add_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Whether no violations were recorded.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Whether the troop has no entry in the slot.
    pub fn is_troop_free(&self, slot: TimeSlot, troop: &TroopId) -> bool {
        !self
            .entries
            .iter()
            .any(|e| e.time_slot == slot && &e.troop == troop)
    }

    /// The troop's first entry in a slot.
    pub fn entry_at(&self, troop: &TroopId, slot: TimeSlot) -> Option<&ScheduleEntry> {
        self.entries
            .iter()
            .find(|e| e.time_slot == slot && &e.troop == troop)
    }

    /// All entries of a troop.
    pub fn entries_for_troop<'a>(
        &'a self,
        troop: &'a TroopId,
    ) -> impl Iterator<Item = &'a ScheduleEntry> + 'a {
        self.entries.iter().filter(move |e| &e.troop == troop)
    }

    /// All entries in a slot.
    pub fn entries_in_slot(&self, slot: TimeSlot) -> impl Iterator<Item = &ScheduleEntry> + '_ {
        self.entries.iter().filter(move |e| e.time_slot == slot)
    }

    /// Entries of a troop on one day.
    pub fn troop_day_entries<'a>(
        &'a self,
        troop: &'a TroopId,
        day: Day,
    ) -> impl Iterator<Item = &'a ScheduleEntry> + 'a {
        self.entries_for_troop(troop)
            .filter(move |e| e.time_slot.day == day)
    }

    /// Whether the troop has the activity anywhere in the week.
    pub fn troop_has_activity(&self, troop: &TroopId, activity: &str) -> bool {
        self.entries_for_troop(troop).any(|e| e.activity == *activity)
    }

    /// Whether the troop has the activity on a given day.
    pub fn troop_has_activity_on(&self, troop: &TroopId, activity: &str, day: Day) -> bool {
        self.troop_day_entries(troop, day)
            .any(|e| e.activity == *activity)
    }

    /// Slots in the grid where the troop has nothing.
    pub fn free_slots(&self, troop: &TroopId, grid: &SlotGrid) -> Vec<TimeSlot> {
        grid.slots()
            .into_iter()
            .filter(|&slot| self.is_troop_free(slot, troop))
            .collect()
    }

    /// Number of free slots the troop has on a day.
    pub fn free_slot_count(&self, troop: &TroopId, day: Day, grid: &SlotGrid) -> usize {
        grid.slots_on(day)
            .into_iter()
            .filter(|&slot| self.is_troop_free(slot, troop))
            .count()
    }

    /// Slots the troop spends on an activity during one day, in order.
    pub fn block_slots(&self, troop: &TroopId, activity: &str, day: Day) -> Vec<TimeSlot> {
        let mut slots: Vec<TimeSlot> = self
            .troop_day_entries(troop, day)
            .filter(|e| e.activity == *activity)
            .map(|e| e.time_slot)
            .collect();
        slots.sort();
        slots
    }

    /// Removes every entry of the troop for the activity on that day.
    pub fn remove_block(&mut self, troop: &TroopId, activity: &str, day: Day) -> Vec<ScheduleEntry> {
        self.remove_where(|e| &e.troop == troop && e.activity == *activity && e.time_slot.day == day)
    }

    /// Removes the troop's entries in exactly one slot.
    pub fn remove_at(&mut self, troop: &TroopId, slot: TimeSlot) -> Vec<ScheduleEntry> {
        self.remove_where(|e| &e.troop == troop && e.time_slot == slot)
    }

    /// Removes one specific entry (matched by identity, not forced flag).
    pub fn remove_entry(&mut self, entry: &ScheduleEntry) -> bool {
        match self.entries.iter().position(|e| e == entry) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    fn remove_where(&mut self, pred: impl Fn(&ScheduleEntry) -> bool) -> Vec<ScheduleEntry> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| pred(e));
        self.entries = kept;
        removed
    }

    /// Violations attributed to one troop.
    pub fn violations_for<'a>(&'a self, troop: &'a TroopId) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| &v.troop == troop)
    }

    /// Number of violations of a given type.
    pub fn violation_count(&self, violation_type: &ViolationType) -> usize {
        self.violations
            .iter()
            .filter(|v| &v.violation_type == violation_type)
            .count()
    }
}
