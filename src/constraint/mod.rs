//! Placement legality.
//!
//! [`ConstraintEvaluator`] answers one question: may this troop start this
//! activity in this slot, at this relaxation level? It reads the schedule
//! and never mutates it.
//!
//! # Evaluation Order
//!
//! Checks short-circuit on the first failure:
//! 1. troop free in the start slot
//! 2. span fits within the start's day and is free ([`rules::SpanFree`])
//! 3. per-slot capacity ([`rules::Capacity`])
//! 4. accuracy limit ([`rules::AccuracyLimit`])
//! 5. same-day conflict pairs ([`rules::SameDayConflicts`])
//! 6. beach slots ([`rules::BeachSlots`])
//! 7. troop size ([`rules::TroopSize`])
//! 8. blocked days ([`rules::BlockedDays`])
//! 9. wet activity after Tower/ODS ([`rules::WetAfterTowerOds`])
//! 10. long off-camp activities ([`rules::LongActivityLimit`])
//! 11. commissioner activity days ([`rules::CommissionerDays`])
//! 12. day pins ([`rules::DayRequests`])
//!
//! # Usage
//!
//! ```
//! use camp_schedule::config::CampConfig;
//! use camp_schedule::constraint::{ConstraintEvaluator, Relaxation};
//! use camp_schedule::models::{Day, Schedule, TimeSlot, Troop};
//!
//! let config = CampConfig::default();
//! let troops = vec![Troop::new("Alpha").with_preferences(["Troop Shotgun"])];
//! let evaluator = ConstraintEvaluator::new(&config, &troops);
//! let shotgun = config.activity("Troop Shotgun").unwrap();
//!
//! let slot = TimeSlot::new(Day::Monday, 1);
//! assert!(evaluator.can_place(&Schedule::new(), &troops[0], shotgun, slot, Relaxation::Strict));
//! ```

mod relaxation;
pub mod rules;

pub use relaxation::Relaxation;

use std::collections::HashMap;
use std::fmt::Debug;
use thiserror::Error;
use tracing::debug;

use crate::config::CampConfig;
use crate::models::{Activity, Day, Schedule, TimeSlot, Troop};

/// Why a placement was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("troop already booked in {slot}")]
    TroopBusy { slot: TimeSlot },

    #[error("activity does not fit within the day starting at {start}")]
    SpanOutOfDay { start: TimeSlot },

    #[error("troop already booked in {slot}")]
    SpanBusy { slot: TimeSlot },

    #[error("activity is full in {slot}")]
    ActivityFull { slot: TimeSlot },

    #[error("sharing in {slot} requires every troop to be at most {limit}")]
    ShareSizeLimit { slot: TimeSlot, limit: u32 },

    #[error("area '{area}' is full in {slot}")]
    AreaFull { slot: TimeSlot, area: String },

    #[error("staff pool '{staff}' is at its ceiling in {slot}")]
    StaffCeiling { slot: TimeSlot, staff: String },

    #[error("accuracy limit reached on {day}")]
    AccuracyLimit { day: Day },

    #[error("conflicts with '{other}' on the same day")]
    SameDayConflict { other: String },

    #[error("beach activity not allowed in {slot}")]
    BeachSlot { slot: TimeSlot },

    #[error("troop size {size} exceeds limit {max}")]
    TroopTooLarge { size: u32, max: u32 },

    #[error("activity does not run on {day}")]
    BlockedDay { day: Day },

    #[error("wet activity directly after a tower or outdoor skills activity at {slot}")]
    WetAfterTowerOds { slot: TimeSlot },

    #[error("troop already has {max} long activities")]
    LongActivityLimit { max: u32 },

    #[error("commissioner runs this activity on {day}")]
    CommissionerDay { day: Day },

    #[error("would override a day request on {day}")]
    DayRequest { day: Day },
}

/// Everything a rule may look at for one candidate placement.
#[derive(Debug)]
pub struct PlacementContext<'a> {
    pub config: &'a CampConfig,
    pub schedule: &'a Schedule,
    pub troop: &'a Troop,
    pub activity: &'a Activity,
    /// Start slot.
    pub slot: TimeSlot,
    /// Every slot the placement would occupy.
    pub span: Vec<TimeSlot>,
    pub relaxation: Relaxation,
    roster: &'a HashMap<&'a str, &'a Troop>,
}

impl PlacementContext<'_> {
    /// Size of another troop on the roster.
    pub fn troop_size(&self, name: &str) -> Option<u32> {
        self.roster.get(name).map(|t| t.size())
    }
}

/// One legality rule.
pub trait PlacementRule: Send + Sync + Debug {
    /// Rule name (used in logs).
    fn name(&self) -> &'static str;

    /// Accepts or rejects the placement.
    fn check(&self, ctx: &PlacementContext<'_>) -> Result<(), Rejection>;
}

static RULES: [&dyn PlacementRule; 11] = [
    &rules::SpanFree,
    &rules::Capacity,
    &rules::AccuracyLimit,
    &rules::SameDayConflicts,
    &rules::BeachSlots,
    &rules::TroopSize,
    &rules::BlockedDays,
    &rules::WetAfterTowerOds,
    &rules::LongActivityLimit,
    &rules::CommissionerDays,
    &rules::DayRequests,
];

/// Pure legality predicate over a schedule.
#[derive(Debug, Clone)]
pub struct ConstraintEvaluator<'a> {
    config: &'a CampConfig,
    roster: HashMap<&'a str, &'a Troop>,
}

impl<'a> ConstraintEvaluator<'a> {
    /// Creates an evaluator for one week's roster.
    pub fn new(config: &'a CampConfig, troops: &'a [Troop]) -> Self {
        let roster = troops.iter().map(|t| (t.name.as_str(), t)).collect();
        Self { config, roster }
    }

    /// Looks up a roster troop by name.
    pub fn troop(&self, name: &str) -> Option<&'a Troop> {
        self.roster.get(name).copied()
    }

    /// The configuration this evaluator checks against.
    pub fn config(&self) -> &'a CampConfig {
        self.config
    }

    /// Whether the troop may start the activity at `slot`.
    pub fn can_place(
        &self,
        schedule: &Schedule,
        troop: &Troop,
        activity: &Activity,
        slot: TimeSlot,
        relaxation: Relaxation,
    ) -> bool {
        self.check(schedule, troop, activity, slot, relaxation).is_ok()
    }

    /// Like [`can_place`](Self::can_place), but reports the first failing
    /// rule.
    pub fn check(
        &self,
        schedule: &Schedule,
        troop: &Troop,
        activity: &Activity,
        slot: TimeSlot,
        relaxation: Relaxation,
    ) -> Result<(), Rejection> {
        if !schedule.is_troop_free(slot, &troop.name) {
            return Err(Rejection::TroopBusy { slot });
        }
        let span = self
            .config
            .grid
            .span(slot, activity.slots_for(troop))
            .ok_or(Rejection::SpanOutOfDay { start: slot })?;

        let ctx = PlacementContext {
            config: self.config,
            schedule,
            troop,
            activity,
            slot,
            span,
            relaxation,
            roster: &self.roster,
        };
        for rule in &RULES {
            if let Err(rejection) = rule.check(&ctx) {
                debug!(
                    rule = rule.name(),
                    troop = %troop.name,
                    activity = %activity.name,
                    %slot,
                    %relaxation,
                    %rejection,
                    "placement rejected"
                );
                return Err(rejection);
            }
        }
        Ok(())
    }

    /// Legal start slots in chronological order, optionally limited to one
    /// day.
    pub fn legal_starts(
        &self,
        schedule: &Schedule,
        troop: &Troop,
        activity: &Activity,
        relaxation: Relaxation,
        day: Option<Day>,
    ) -> Vec<TimeSlot> {
        let slots = match day {
            Some(d) => self.config.grid.slots_on(d),
            None => self.config.grid.slots(),
        };
        slots
            .into_iter()
            .filter(|&s| self.can_place(schedule, troop, activity, s, relaxation))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityId, Zone};
    use std::collections::BTreeMap;

    fn slot(day: Day, n: u8) -> TimeSlot {
        TimeSlot::new(day, n)
    }

    fn place(s: &mut Schedule, config: &CampConfig, troop: &Troop, act: &str, at: TimeSlot) {
        let activity = config.activity(act).unwrap();
        s.add_entry(at, activity, troop);
    }

    fn roster() -> Vec<Troop> {
        vec![
            Troop::new("Alpha").with_preferences(["Troop Shotgun", "Water Polo", "Sailing"]),
            Troop::new("Beta")
                .with_members(18, 2)
                .with_preferences(["Troop Shotgun", "Aqua Trampoline"]),
            Troop::new("Gamma").with_preferences(["Aqua Trampoline"]),
        ]
    }

    #[test]
    fn test_troop_busy_and_span() {
        let config = CampConfig::default();
        let troops = roster();
        let eval = ConstraintEvaluator::new(&config, &troops);
        let alpha = &troops[0];
        let sailing = config.activity("Sailing").unwrap();

        let mut s = Schedule::new();
        place(&mut s, &config, alpha, "Delta", slot(Day::Monday, 1));

        assert_eq!(
            eval.check(&s, alpha, sailing, slot(Day::Monday, 1), Relaxation::Strict),
            Err(Rejection::TroopBusy { slot: slot(Day::Monday, 1) })
        );
        assert!(eval.can_place(&s, alpha, sailing, slot(Day::Monday, 2), Relaxation::Strict));
        assert_eq!(
            eval.check(&s, alpha, sailing, slot(Day::Monday, 3), Relaxation::Strict),
            Err(Rejection::SpanOutOfDay { start: slot(Day::Monday, 3) })
        );
        assert!(!eval.can_place(&s, alpha, sailing, slot(Day::Thursday, 2), Relaxation::Loosened));

        place(&mut s, &config, alpha, "Archery", slot(Day::Tuesday, 2));
        assert_eq!(
            eval.check(&s, alpha, sailing, slot(Day::Tuesday, 1), Relaxation::Strict),
            Err(Rejection::SpanBusy { slot: slot(Day::Tuesday, 2) })
        );
    }

    #[test]
    fn test_activity_capacity() {
        let config = CampConfig::default();
        let troops = roster();
        let eval = ConstraintEvaluator::new(&config, &troops);
        let delta = config.activity("Delta").unwrap();

        let mut s = Schedule::new();
        place(&mut s, &config, &troops[0], "Delta", slot(Day::Monday, 1));
        assert_eq!(
            eval.check(&s, &troops[2], delta, slot(Day::Monday, 1), Relaxation::Loosened),
            Err(Rejection::ActivityFull { slot: slot(Day::Monday, 1) })
        );
        assert!(eval.can_place(&s, &troops[2], delta, slot(Day::Monday, 2), Relaxation::Strict));
    }

    #[test]
    fn test_share_size_limit() {
        let config = CampConfig::default();
        let troops = roster();
        let eval = ConstraintEvaluator::new(&config, &troops);
        let tramp = config.activity("Aqua Trampoline").unwrap();
        let at = slot(Day::Monday, 1);

        let mut s = Schedule::new();
        place(&mut s, &config, &troops[2], "Aqua Trampoline", at);
        // Two small troops may share.
        assert!(eval.can_place(&s, &troops[0], tramp, at, Relaxation::Strict));
        // Beta is 20 people.
        assert_eq!(
            eval.check(&s, &troops[1], tramp, at, Relaxation::Strict),
            Err(Rejection::ShareSizeLimit { slot: at, limit: 16 })
        );

        // Large troop alone is fine, but nobody may join it.
        let mut s = Schedule::new();
        place(&mut s, &config, &troops[1], "Aqua Trampoline", at);
        assert!(!eval.can_place(&s, &troops[0], tramp, at, Relaxation::Strict));
    }

    #[test]
    fn test_area_capacity() {
        let config = CampConfig::default();
        let troops = roster();
        let eval = ConstraintEvaluator::new(&config, &troops);
        let tie_dye = config.activity("Tie Dye").unwrap();
        let at = slot(Day::Tuesday, 2);

        let mut s = Schedule::new();
        place(&mut s, &config, &troops[0], "Hemp Craft", at);
        assert_eq!(
            eval.check(&s, &troops[2], tie_dye, at, Relaxation::Loosened),
            Err(Rejection::AreaFull {
                slot: at,
                area: "Handicrafts".into()
            })
        );

        let mut config = CampConfig::default();
        config.area_capacity.insert("Handicrafts".into(), 2);
        let eval = ConstraintEvaluator::new(&config, &troops);
        assert!(eval.can_place(&s, &troops[2], tie_dye, at, Relaxation::Strict));
    }

    #[test]
    fn test_staff_ceiling() {
        let config = CampConfig::default();
        let troops: Vec<Troop> = (0..5).map(|i| Troop::new(format!("T{i}"))).collect();
        let eval = ConstraintEvaluator::new(&config, &troops);
        let at = slot(Day::Monday, 1);

        let mut s = Schedule::new();
        for (troop, act) in troops.iter().zip(["Troop Canoe", "Troop Kayak", "Troop Swim", "Nature Canoe"]) {
            place(&mut s, &config, troop, act, at);
        }
        let uoc = config.activity("Underwater Obstacle Course").unwrap();
        assert_eq!(
            eval.check(&s, &troops[4], uoc, at, Relaxation::Loosened),
            Err(Rejection::StaffCeiling {
                slot: at,
                staff: "Beach Staff".into()
            })
        );
    }

    #[test]
    fn test_accuracy_limit() {
        let config = CampConfig::default();
        let troops = roster();
        let eval = ConstraintEvaluator::new(&config, &troops);
        let alpha = &troops[0];
        let archery = config.activity("Archery").unwrap();

        let mut s = Schedule::new();
        place(&mut s, &config, alpha, "Troop Rifle", slot(Day::Wednesday, 1));
        assert_eq!(
            eval.check(&s, alpha, archery, slot(Day::Wednesday, 3), Relaxation::Loosened),
            Err(Rejection::AccuracyLimit { day: Day::Wednesday })
        );
        assert!(eval.can_place(&s, alpha, archery, slot(Day::Thursday, 1), Relaxation::Strict));
    }

    #[test]
    fn test_same_day_conflicts_ignored_only_when_loosened() {
        let config = CampConfig::default();
        let troops = roster();
        let eval = ConstraintEvaluator::new(&config, &troops);
        let alpha = &troops[0];
        let free_time = config.activity("Campsite Free Time").unwrap();

        let mut s = Schedule::new();
        place(&mut s, &config, alpha, "Trading Post", slot(Day::Tuesday, 1));
        assert_eq!(
            eval.check(&s, alpha, free_time, slot(Day::Tuesday, 2), Relaxation::IgnoreDayRequests),
            Err(Rejection::SameDayConflict {
                other: "Trading Post".into()
            })
        );
        assert!(eval.can_place(&s, alpha, free_time, slot(Day::Tuesday, 2), Relaxation::Loosened));
    }

    #[test]
    fn test_beach_slot_rule() {
        let config = CampConfig::default();
        let troops = roster();
        let eval = ConstraintEvaluator::new(&config, &troops);
        let s = Schedule::new();
        let water_polo = config.activity("Water Polo").unwrap();
        let tramp = config.activity("Aqua Trampoline").unwrap();
        let mon2 = slot(Day::Monday, 2);

        assert!(eval.can_place(&s, &troops[0], water_polo, slot(Day::Monday, 1), Relaxation::Strict));
        assert_eq!(
            eval.check(&s, &troops[0], water_polo, mon2, Relaxation::Strict),
            Err(Rejection::BeachSlot { slot: mon2 })
        );
        // Rank 2 qualifies for the exception.
        assert!(eval.can_place(&s, &troops[0], water_polo, mon2, Relaxation::BeachSlotTwo));
        // Not a preference of Alpha at all.
        assert!(!eval.can_place(&s, &troops[0], tramp, mon2, Relaxation::Loosened));
        // Thursday is open.
        assert!(eval.can_place(&s, &troops[0], tramp, slot(Day::Thursday, 2), Relaxation::Strict));
    }

    #[test]
    fn test_size_and_blocked_day() {
        let config = CampConfig::default();
        let troops = roster();
        let eval = ConstraintEvaluator::new(&config, &troops);
        let s = Schedule::new();
        let shotgun = config.activity("Troop Shotgun").unwrap();
        let shower = config.activity("Shower House").unwrap();

        assert!(eval.can_place(&s, &troops[0], shotgun, slot(Day::Monday, 1), Relaxation::Strict));
        assert_eq!(
            eval.check(&s, &troops[1], shotgun, slot(Day::Monday, 1), Relaxation::Loosened),
            Err(Rejection::TroopTooLarge { size: 20, max: 15 })
        );
        assert_eq!(
            eval.check(&s, &troops[0], shower, slot(Day::Monday, 1), Relaxation::Loosened),
            Err(Rejection::BlockedDay { day: Day::Monday })
        );
        assert!(eval.can_place(&s, &troops[0], shower, slot(Day::Tuesday, 1), Relaxation::Strict));
    }

    #[test]
    fn test_wet_after_tower_ods() {
        let config = CampConfig::default();
        let troops = roster();
        let eval = ConstraintEvaluator::new(&config, &troops);
        let alpha = &troops[0];
        let swim = config.activity("Troop Swim").unwrap();
        let orienteering = config.activity("Orienteering").unwrap();

        let mut s = Schedule::new();
        place(&mut s, &config, alpha, "Climbing Tower", slot(Day::Monday, 2));
        assert_eq!(
            eval.check(&s, alpha, swim, slot(Day::Monday, 3), Relaxation::Loosened),
            Err(Rejection::WetAfterTowerOds { slot: slot(Day::Monday, 3) })
        );
        // Wet before dry is fine.
        assert!(eval.can_place(&s, alpha, swim, slot(Day::Monday, 1), Relaxation::Strict));
        // Other troops are unaffected.
        assert!(eval.can_place(&s, &troops[2], swim, slot(Day::Monday, 3), Relaxation::Strict));

        // Placing the dry activity first is caught too.
        let mut s = Schedule::new();
        place(&mut s, &config, alpha, "Sauna", slot(Day::Tuesday, 2));
        assert_eq!(
            eval.check(&s, alpha, orienteering, slot(Day::Tuesday, 1), Relaxation::Loosened),
            Err(Rejection::WetAfterTowerOds { slot: slot(Day::Tuesday, 2) })
        );
        assert!(eval.can_place(&s, alpha, orienteering, slot(Day::Tuesday, 3), Relaxation::Strict));
    }

    #[test]
    fn test_one_long_activity_per_troop() {
        let config = CampConfig::default();
        let troops = roster();
        let eval = ConstraintEvaluator::new(&config, &troops);
        let alpha = &troops[0];
        let tamarac = config.activity("Tamarac Wildlife Refuge").unwrap();

        let mut s = Schedule::new();
        assert!(eval.can_place(&s, alpha, tamarac, slot(Day::Tuesday, 1), Relaxation::Strict));
        place(&mut s, &config, alpha, "Itasca State Park", slot(Day::Monday, 1));
        assert_eq!(
            eval.check(&s, alpha, tamarac, slot(Day::Tuesday, 1), Relaxation::Loosened),
            Err(Rejection::LongActivityLimit { max: 1 })
        );
        assert!(eval.can_place(&s, &troops[2], tamarac, slot(Day::Tuesday, 1), Relaxation::Strict));

        let mut config = CampConfig::default();
        config.long_activities.max_per_troop = 2;
        let eval = ConstraintEvaluator::new(&config, &troops);
        assert!(eval.can_place(&s, alpha, tamarac, slot(Day::Tuesday, 1), Relaxation::Strict));
    }

    #[test]
    fn test_commissioner_days() {
        let mut config = CampConfig::default();
        config.commissioner_days.insert(
            "Commissioner B".into(),
            BTreeMap::from([(ActivityId::from("Delta"), Day::Wednesday)]),
        );
        let troops = vec![
            Troop::new("Samoset").with_commissioner("Commissioner B"),
            Troop::new("Pontiac"),
        ];
        let eval = ConstraintEvaluator::new(&config, &troops);
        let delta = config.activity("Delta").unwrap();
        let s = Schedule::new();

        assert_eq!(
            eval.check(&s, &troops[0], delta, slot(Day::Monday, 1), Relaxation::BeachSlotTwo),
            Err(Rejection::CommissionerDay { day: Day::Wednesday })
        );
        assert!(eval.can_place(&s, &troops[0], delta, slot(Day::Wednesday, 2), Relaxation::Strict));
        assert!(eval.can_place(&s, &troops[0], delta, slot(Day::Monday, 1), Relaxation::IgnoreDayRequests));
        // No commissioner, no restriction.
        assert!(eval.can_place(&s, &troops[1], delta, slot(Day::Monday, 1), Relaxation::Strict));
    }

    #[test]
    fn test_day_pins() {
        let config = CampConfig::default();
        let troops = vec![Troop::new("Pinned")
            .with_day_request(Day::Tuesday, "Tie Dye")
            .with_day_request(Day::Tuesday, "Delta")];
        let eval = ConstraintEvaluator::new(&config, &troops);
        let troop = &troops[0];
        let tie_dye = config.activity("Tie Dye").unwrap();
        let archery = config.activity("Archery").unwrap();
        let s = Schedule::new();

        // Pinned activity stays on its day.
        assert_eq!(
            eval.check(&s, troop, tie_dye, slot(Day::Monday, 1), Relaxation::BeachSlotTwo),
            Err(Rejection::DayRequest { day: Day::Monday })
        );
        assert!(eval.can_place(&s, troop, tie_dye, slot(Day::Monday, 1), Relaxation::IgnoreDayRequests));

        // Tuesday has room for one more besides the two pins.
        assert!(eval.can_place(&s, troop, archery, slot(Day::Tuesday, 1), Relaxation::Strict));
        let mut s = Schedule::new();
        place(&mut s, &config, troop, "Archery", slot(Day::Tuesday, 1));
        let rifle = config.activity("Troop Rifle").unwrap();
        let gaga = config.activity("Gaga Ball").unwrap();
        assert!(!eval.can_place(&s, troop, rifle, slot(Day::Tuesday, 2), Relaxation::Strict));
        assert_eq!(
            eval.check(&s, troop, gaga, slot(Day::Tuesday, 2), Relaxation::Strict),
            Err(Rejection::DayRequest { day: Day::Tuesday })
        );
        assert!(eval.can_place(&s, troop, gaga, slot(Day::Tuesday, 2), Relaxation::IgnoreDayRequests));
    }

    #[test]
    fn test_pin_held_elsewhere_owes_nothing() {
        let config = CampConfig::default();
        let troops = vec![Troop::new("Pinned").with_day_request(Day::Tuesday, "Tie Dye")];
        let eval = ConstraintEvaluator::new(&config, &troops);
        let troop = &troops[0];
        let fishing = config.activity("Fishing").unwrap();

        let mut s = Schedule::new();
        place(&mut s, &config, troop, "Gaga Ball", slot(Day::Tuesday, 1));
        place(&mut s, &config, troop, "Archery", slot(Day::Tuesday, 2));
        assert_eq!(
            eval.check(&s, troop, fishing, slot(Day::Tuesday, 3), Relaxation::Strict),
            Err(Rejection::DayRequest { day: Day::Tuesday })
        );

        place(&mut s, &config, troop, "Tie Dye", slot(Day::Wednesday, 1));
        assert!(eval.can_place(&s, troop, fishing, slot(Day::Tuesday, 3), Relaxation::Strict));
    }

    #[test]
    fn test_mandatory_day_reserved() {
        let config = CampConfig::default();
        let troops = vec![Troop::new("Alpha")];
        let eval = ConstraintEvaluator::new(&config, &troops);
        let troop = &troops[0];
        let gaga = config.activity("Gaga Ball").unwrap();

        let mut s = Schedule::new();
        place(&mut s, &config, troop, "Delta", slot(Day::Friday, 1));
        place(&mut s, &config, troop, "Archery", slot(Day::Friday, 2));
        assert!(!eval.can_place(&s, troop, gaga, slot(Day::Friday, 3), Relaxation::Strict));

        place(&mut s, &config, troop, "Reflection", slot(Day::Friday, 3));
        s.remove_at(&troop.name, slot(Day::Friday, 2));
        assert!(eval.can_place(&s, troop, gaga, slot(Day::Friday, 2), Relaxation::Strict));
    }

    #[test]
    fn test_legal_starts() {
        let config = CampConfig::default();
        let troops = vec![Troop::new("Alpha")];
        let eval = ConstraintEvaluator::new(&config, &troops);
        let long = Activity::new("Long", Zone::Beach).with_slots(2);
        let mut s = Schedule::new();
        let delta = config.activity("Delta").unwrap();
        s.add_entry(slot(Day::Monday, 1), delta, &troops[0]);

        let starts = eval.legal_starts(&s, &troops[0], &long, Relaxation::Strict, Some(Day::Monday));
        assert_eq!(starts, vec![slot(Day::Monday, 2)]);

        let all = eval.legal_starts(&s, &troops[0], &long, Relaxation::Strict, None);
        assert_eq!(all.first(), Some(&slot(Day::Monday, 2)));
        assert!(all.iter().all(|s| s.slot_number <= 2));
    }
}
