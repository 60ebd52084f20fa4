//! Camp scheduling domain models.
//!
//! Reference data (`Troop`, `Activity`, the `SlotGrid`) is loaded once per
//! week and never mutated. The `Schedule` is the only mutable state and is
//! owned by a single pipeline run.
//!
//! # Identity
//!
//! | Type | Key |
//! |------|-----|
//! | Troop | `TroopId` (name) |
//! | Activity | `ActivityId` (name) |
//! | TimeSlot | `(Day, slot_number)` |
//! | ScheduleEntry | `(TimeSlot, ActivityId, TroopId)` |

mod activity;
mod day;
mod id;
mod schedule;
mod troop;

pub use activity::{Activity, LargeTroopDuration, Zone};
pub use day::{Day, SlotGrid, TimeSlot};
pub use id::{ActivityId, TroopId};
pub use schedule::{Schedule, ScheduleEntry, Violation, ViolationType};
pub use troop::Troop;
