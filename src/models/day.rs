//! Weekly time grid: days, slots, and the per-day slot layout.
//!
//! A week is a fixed grid of `(day, slot_number)` cells. Slot numbers are
//! 1-based and contiguous within a day. Days may carry different slot
//! counts (the standard camp week has a short Thursday).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Day of the camp week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    /// All days in week order.
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    /// Three-letter abbreviation ("Mon").
    pub fn short_name(self) -> &'static str {
        match self {
            Day::Monday => "Mon",
            Day::Tuesday => "Tue",
            Day::Wednesday => "Wed",
            Day::Thursday => "Thu",
            Day::Friday => "Fri",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        };
        f.write_str(name)
    }
}

/// A single schedulable cell. Identity is `(day, slot_number)`.
///
/// Ordering is chronological: by day, then slot number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Day of the week.
    pub day: Day,
    /// 1-based slot number within the day.
    pub slot_number: u8,
}

impl TimeSlot {
    /// Creates a time slot.
    pub fn new(day: Day, slot_number: u8) -> Self {
        Self { day, slot_number }
    }

    /// The slot `offset` positions later on the same day.
    #[inline]
    pub fn offset(self, offset: u8) -> Self {
        Self::new(self.day, self.slot_number + offset)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.day.short_name(), self.slot_number)
    }
}

/// Per-day slot layout of the week.
///
/// Days absent from the grid have no slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotGrid {
    slots_per_day: BTreeMap<Day, u8>,
}

impl SlotGrid {
    /// Creates an empty grid.
    pub fn new() -> Self {
        Self {
            slots_per_day: BTreeMap::new(),
        }
    }

    /// Same slot count on every day.
    pub fn uniform(slots: u8) -> Self {
        Day::ALL
            .iter()
            .fold(Self::new(), |grid, &day| grid.with_day(day, slots))
    }

    /// Sets the slot count for one day.
    pub fn with_day(mut self, day: Day, slots: u8) -> Self {
        self.slots_per_day.insert(day, slots);
        self
    }

    /// Days that have at least one slot, in week order.
    pub fn days(&self) -> impl Iterator<Item = Day> + '_ {
        self.slots_per_day
            .iter()
            .filter(|(_, &n)| n > 0)
            .map(|(&day, _)| day)
    }

    /// Number of slots on a day (0 if absent).
    pub fn slot_count(&self, day: Day) -> u8 {
        self.slots_per_day.get(&day).copied().unwrap_or(0)
    }

    /// Total number of slots in the week.
    pub fn total_slots(&self) -> usize {
        self.slots_per_day.values().map(|&n| n as usize).sum()
    }

    /// All slots in chronological order.
    pub fn slots(&self) -> Vec<TimeSlot> {
        self.days().flat_map(|day| self.slots_on(day)).collect()
    }

    /// Slots of one day in order.
    pub fn slots_on(&self, day: Day) -> Vec<TimeSlot> {
        (1..=self.slot_count(day))
            .map(|n| TimeSlot::new(day, n))
            .collect()
    }

    /// Whether the slot exists in this grid.
    pub fn contains(&self, slot: TimeSlot) -> bool {
        slot.slot_number >= 1 && slot.slot_number <= self.slot_count(slot.day)
    }

    /// Last day that has slots.
    pub fn last_day(&self) -> Option<Day> {
        self.days().last()
    }

    /// Last slot of a day.
    pub fn last_slot(&self, day: Day) -> Option<TimeSlot> {
        match self.slot_count(day) {
            0 => None,
            n => Some(TimeSlot::new(day, n)),
        }
    }

    /// The `len` contiguous slots starting at `start`, if they all fit
    /// within the start's day.
    pub fn span(&self, start: TimeSlot, len: u8) -> Option<Vec<TimeSlot>> {
        if len == 0 || !self.contains(start) {
            return None;
        }
        let end = start.slot_number as u16 + len as u16 - 1;
        if end > self.slot_count(start.day) as u16 {
            return None;
        }
        Some((0..len).map(|i| start.offset(i)).collect())
    }
}

impl Default for SlotGrid {
    /// Standard camp week: three slots a day, two on Thursday.
    fn default() -> Self {
        Self::uniform(3).with_day(Day::Thursday, 2)
    }
}
