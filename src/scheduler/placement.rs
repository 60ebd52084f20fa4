//! Placement engine: the three greedy phases that turn an empty schedule
//! into a mostly filled one.
//!
//! # Algorithm
//!
//! 1. **Day requests.** Each pinned `(day, activity)` goes to the earliest
//!    strictly legal slot on its day.
//! 2. **Ranked preferences.** Rank bands are processed in ascending order;
//!    within a band every troop (roster order) places its unscheduled
//!    preferences. Each preference escalates through its ladder (strict,
//!    then the beach slot-2 exception for beach activities, then leaving
//!    its day for day-bound ones). Failures are recorded as provisional
//!    misses and never block the pass. Pins from step 1 that are not
//!    preferences and found no slot on their day are then retried the same
//!    way over the whole week.
//! 3. **Mandatory activities.** Troops are grouped into units (split
//!    sub-troops together, everyone else alone). Each unit takes the first
//!    slot number on the activity's day where every member fits, trying the
//!    commissioner's current slot first. A unit with no common free slot is
//!    force-placed into the last slot of the day.
//!
//! When several slots are legal, the one on the day where the troop already
//! has the most activities of the same clustering zone wins, then the
//! earliest day, then the lowest slot number.
//!
//! # Complexity
//! O(t · p · s) evaluator calls, for t troops, p preferences, s slots.

use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::{best_start, preference_ladder, Miss, MANDATORY_LADDER};
use crate::config::CampConfig;
use crate::constraint::{ConstraintEvaluator, Relaxation};
use crate::models::{Activity, Day, Schedule, TimeSlot, Troop, Violation};

/// Greedy multi-phase allocator.
#[derive(Debug, Clone)]
pub struct PlacementEngine<'a> {
    evaluator: &'a ConstraintEvaluator<'a>,
    config: &'a CampConfig,
}

impl<'a> PlacementEngine<'a> {
    /// Creates an engine over an evaluator.
    pub fn new(evaluator: &'a ConstraintEvaluator<'a>) -> Self {
        Self {
            evaluator,
            config: evaluator.config(),
        }
    }

    /// Runs all three phases. Returns the provisional misses.
    pub fn run(&self, schedule: &mut Schedule, troops: &[Troop]) -> Vec<Miss> {
        let mut misses = self.place_day_requests(schedule, troops);
        misses.extend(self.place_preferences(schedule, troops));
        self.retry_day_requests(schedule, &mut misses);
        self.place_mandatory(schedule, troops);
        misses
    }

    /// Phase A. Returns misses for pins that are not also preferences;
    /// pinned preferences get another chance in phase B.
    pub fn place_day_requests(&self, schedule: &mut Schedule, troops: &[Troop]) -> Vec<Miss> {
        let mut misses = Vec::new();
        let mut placed = 0usize;

        for troop in troops {
            for (&day, requests) in &troop.day_requests {
                for name in requests {
                    if self.config.is_mandatory(name.as_str()) {
                        continue;
                    }
                    let Some(activity) = self.config.activity(name.as_str()) else {
                        warn!(troop = %troop.name, activity = %name, "day request for unknown activity");
                        continue;
                    };
                    if schedule.troop_has_activity(&troop.name, name.as_str()) && !activity.repeatable {
                        continue;
                    }

                    let starts = self.evaluator.legal_starts(
                        schedule,
                        troop,
                        activity,
                        Relaxation::Strict,
                        Some(day),
                    );
                    match starts.first() {
                        Some(&slot) => {
                            schedule.add_entry(slot, activity, troop);
                            placed += 1;
                            debug!(troop = %troop.name, activity = %name, %slot, "placed day request");
                        }
                        None => {
                            debug!(troop = %troop.name, activity = %name, %day, "day request unresolved");
                            if troop.rank_of(name.as_str()).is_none() {
                                misses.push(Miss::new(troop, name, None));
                            }
                        }
                    }
                }
            }
        }

        info!(placed, unresolved = misses.len(), "day requests placed");
        misses
    }

    /// Phase B.
    pub fn place_preferences(&self, schedule: &mut Schedule, troops: &[Troop]) -> Vec<Miss> {
        let mut misses = Vec::new();
        let mut placed = 0usize;

        for (low, high) in self.config.preference_bands() {
            for troop in troops {
                let band = troop
                    .ranked_preferences()
                    .filter(|&(rank, _)| rank >= low && high.map_or(true, |h| rank <= h));
                for (rank, name) in band {
                    if self.config.is_mandatory(name.as_str())
                        || schedule.troop_has_activity(&troop.name, name.as_str())
                    {
                        continue;
                    }
                    let Some(activity) = self.config.activity(name.as_str()) else {
                        warn!(troop = %troop.name, activity = %name, "preference for unknown activity");
                        continue;
                    };

                    let ladder = preference_ladder(self.config, troop, activity);
                    match self.place_anywhere(schedule, troop, activity, ladder) {
                        Some((slot, level)) => {
                            placed += 1;
                            debug!(troop = %troop.name, activity = %name, rank, %slot, %level, "placed preference");
                        }
                        None => {
                            debug!(troop = %troop.name, activity = %name, rank, "preference missed");
                            misses.push(Miss::new(troop, name, Some(rank)));
                        }
                    }
                }
            }
        }

        info!(placed, missed = misses.len(), "ranked preferences placed");
        misses
    }

    /// Retries unresolved bare pins anywhere in the week, dropping the ones
    /// that land from `misses`.
    pub fn retry_day_requests(&self, schedule: &mut Schedule, misses: &mut Vec<Miss>) {
        let before = misses.len();
        misses.retain(|miss| {
            if miss.rank.is_some() || schedule.troop_has_activity(&miss.troop, miss.activity.as_str()) {
                return true;
            }
            let (Some(troop), Some(activity)) = (
                self.evaluator.troop(miss.troop.as_str()),
                self.config.activity(miss.activity.as_str()),
            ) else {
                return true;
            };
            let ladder = preference_ladder(self.config, troop, activity);
            match self.place_anywhere(schedule, troop, activity, ladder) {
                Some((slot, level)) => {
                    debug!(troop = %troop.name, activity = %activity.name, %slot, %level, "day request moved");
                    false
                }
                None => true,
            }
        });
        info!(moved = before - misses.len(), "day requests retried");
    }

    /// Tries each level of the ladder over the whole week; places at the
    /// best legal slot of the first level that has one.
    pub(crate) fn place_anywhere(
        &self,
        schedule: &mut Schedule,
        troop: &Troop,
        activity: &Activity,
        ladder: &[Relaxation],
    ) -> Option<(TimeSlot, Relaxation)> {
        for &level in ladder {
            let starts = self.evaluator.legal_starts(schedule, troop, activity, level, None);
            if let Some(slot) = best_start(self.config, schedule, troop, activity, &starts) {
                schedule.add_entry(slot, activity, troop);
                return Some((slot, level));
            }
        }
        None
    }

    /// Phase C.
    pub fn place_mandatory(&self, schedule: &mut Schedule, troops: &[Troop]) {
        for (name, day) in self.config.mandatory_days() {
            let Some(activity) = self.config.activity(name.as_str()) else {
                continue;
            };
            let pending: Vec<&Troop> = troops
                .iter()
                .filter(|t| !schedule.troop_has_activity(&t.name, name.as_str()))
                .collect();
            let units = group_units(self.config, activity, &pending);

            let mut forced = 0usize;
            for unit in &units {
                if !self.place_unit(schedule, unit, activity, day) {
                    forced += self.force_unit(schedule, unit, activity, day);
                }
            }
            info!(activity = %name, %day, units = units.len(), forced, "mandatory activity placed");
        }
    }

    fn place_unit(&self, schedule: &mut Schedule, unit: &[&Troop], activity: &Activity, day: Day) -> bool {
        let order = self.slot_order(schedule, unit[0], activity, day);
        for &level in MANDATORY_LADDER {
            for &n in &order {
                let slot = TimeSlot::new(day, n);
                if place_all(self.evaluator, schedule, unit, activity, slot, level) {
                    for troop in unit {
                        debug!(troop = %troop.name, activity = %activity.name, %slot, %level, "placed mandatory activity");
                    }
                    return true;
                }
            }
        }
        false
    }

    /// Forces the unit into the last slot of the day. Members that fit there
    /// are placed normally. Returns the number of forced members.
    fn force_unit(&self, schedule: &mut Schedule, unit: &[&Troop], activity: &Activity, day: Day) -> usize {
        let Some(last) = self.config.grid.last_slot(day) else {
            return 0;
        };
        let mut forced = 0;
        for troop in unit {
            let len = activity.slots_for(troop);
            let start = TimeSlot::new(day, last.slot_number.saturating_sub(len.saturating_sub(1)).max(1));
            if self
                .evaluator
                .can_place(schedule, troop, activity, start, Relaxation::Loosened)
            {
                schedule.add_entry(start, activity, troop);
                continue;
            }
            schedule.add_forced(start, activity, troop);
            schedule.add_violation(Violation::forced_placement(
                &troop.name,
                &activity.name,
                start,
                format!("no legal slot on {day} for mandatory {}", activity.name),
            ));
            warn!(troop = %troop.name, activity = %activity.name, slot = %start, "forced mandatory placement");
            forced += 1;
        }
        forced
    }

    /// Slot numbers of the day, the commissioner's most used slot first.
    fn slot_order(&self, schedule: &Schedule, lead: &Troop, activity: &Activity, day: Day) -> Vec<u8> {
        let mut order: Vec<u8> = (1..=self.config.grid.slot_count(day)).collect();
        if let Some(commissioner) = self.config.commissioner_of(lead) {
            let mut counts: HashMap<u8, usize> = HashMap::new();
            for e in schedule.entries.iter().filter(|e| {
                e.activity == activity.name && e.time_slot.day == day && !e.forced
            }) {
                let same = self
                    .evaluator
                    .troop(e.troop.as_str())
                    .is_some_and(|t| self.config.commissioner_of(t) == Some(commissioner));
                if same {
                    *counts.entry(e.time_slot.slot_number).or_default() += 1;
                }
            }
            if let Some(best) = most_common(&counts) {
                order.retain(|&n| n != best);
                order.insert(0, best);
            }
        }
        order
    }
}

/// The most frequent slot number; ties go to the lower number.
pub(crate) fn most_common(counts: &HashMap<u8, usize>) -> Option<u8> {
    counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(&n, _)| n)
}

/// Groups troops into placement units: split sub-troops of one base share a
/// unit for split-shared activities, everyone else is alone. Units keep the
/// order of their first member.
pub(crate) fn group_units<'t>(
    config: &CampConfig,
    activity: &Activity,
    troops: &[&'t Troop],
) -> Vec<Vec<&'t Troop>> {
    let shared = config.is_split_shared(activity.name.as_str());
    let mut units: Vec<Vec<&Troop>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for &troop in troops {
        match troop.split_base().filter(|_| shared) {
            Some(base) => match index.get(base) {
                Some(&i) => units[i].push(troop),
                None => {
                    index.insert(base, units.len());
                    units.push(vec![troop]);
                }
            },
            None => units.push(vec![troop]),
        }
    }
    units
}

/// Places every member of the unit at `slot`, or none of them.
pub(crate) fn place_all(
    evaluator: &ConstraintEvaluator<'_>,
    schedule: &mut Schedule,
    unit: &[&Troop],
    activity: &Activity,
    slot: TimeSlot,
    level: Relaxation,
) -> bool {
    for (i, troop) in unit.iter().enumerate() {
        if !evaluator.can_place(schedule, troop, activity, slot, level) {
            for placed in &unit[..i] {
                schedule.remove_block(&placed.name, activity.name.as_str(), slot.day);
            }
            return false;
        }
        schedule.add_entry(slot, activity, troop);
    }
    true
}
