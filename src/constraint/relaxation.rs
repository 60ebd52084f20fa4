//! Relaxation levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered, cumulative loosening of placement rules.
///
/// Each level includes every exception of the levels below it. Callers try
/// `Strict` first and escalate only when nothing fits. No level relaxes
/// double booking, multi-slot atomicity, the accuracy limit, troop size
/// eligibility, blocked days or capacity ceilings. Wet-after-Tower/ODS and
/// the long-activity limit hold at every level as well.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Relaxation {
    /// Every rule enforced.
    #[default]
    Strict,
    /// A beach activity may take a closed slot when it is one of the
    /// troop's top-ranked preferences.
    BeachSlotTwo,
    /// Day pins, commissioner activity days and mandatory-day reservations
    /// are not protected.
    IgnoreDayRequests,
    /// Same-day conflict pairs are ignored as well.
    Loosened,
}

impl Relaxation {
    /// All levels, strictest first.
    pub const LADDER: [Relaxation; 4] = [
        Relaxation::Strict,
        Relaxation::BeachSlotTwo,
        Relaxation::IgnoreDayRequests,
        Relaxation::Loosened,
    ];

    #[inline]
    pub fn allows_beach_slot_two(self) -> bool {
        self >= Relaxation::BeachSlotTwo
    }

    #[inline]
    pub fn ignores_day_requests(self) -> bool {
        self >= Relaxation::IgnoreDayRequests
    }

    #[inline]
    pub fn ignores_same_day_conflicts(self) -> bool {
        self >= Relaxation::Loosened
    }

    /// Short label used in logs.
    pub fn label(self) -> &'static str {
        match self {
            Relaxation::Strict => "strict",
            Relaxation::BeachSlotTwo => "beach-slot-2",
            Relaxation::IgnoreDayRequests => "ignore-day-requests",
            Relaxation::Loosened => "loosened",
        }
    }
}

impl fmt::Display for Relaxation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
