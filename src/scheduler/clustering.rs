//! Clustering optimizer.
//!
//! A bounded local search that pulls each troop's clustering-zone
//! activities onto as few days as possible, then keeps commissioner groups
//! on a common Reflection slot.
//!
//! # Measure
//!
//! For one troop and one zone the spread is the pair
//! `(days used, Σ gaps)`, where a day's gap count is the number of empty
//! positions between its first and last zone slot. Pairs compare
//! lexicographically; an exchange is kept only if it strictly lowers the
//! spread of the zone it moves.
//!
//! # Moves
//!
//! - **Exchange**: a single-slot zone entry trades places with a swappable
//!   filler of the same troop, or moves into a free slot. Both resulting
//!   placements must be strictly legal.
//! - **Reflection sync**: a commissioner unit away from the group's most
//!   common slot number moves there on the same day, trading with a
//!   swappable filler when the target is occupied. Split units move
//!   together or not at all.
//!
//! Moves are tried on a scratch copy and committed only when legal, so a
//! rejected move leaves the schedule byte-for-byte untouched. The search is
//! first-improvement in zone, troop, then slot order, which makes it
//! deterministic. Rounds stop when nothing changes or the iteration cap is
//! reached; running the optimizer on its own output changes nothing.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

use super::placement::{group_units, most_common};
use crate::config::CampConfig;
use crate::constraint::{ConstraintEvaluator, Relaxation};
use crate::models::{Activity, Day, Schedule, ScheduleEntry, TimeSlot, Troop, TroopId};

/// Zone spread of one troop: `(days used, total gaps)`.
pub type Spread = (usize, usize);

/// Bounded swap search over a finished placement.
#[derive(Debug, Clone)]
pub struct ClusteringOptimizer<'a> {
    evaluator: &'a ConstraintEvaluator<'a>,
    config: &'a CampConfig,
}

impl<'a> ClusteringOptimizer<'a> {
    /// Creates an optimizer over an evaluator.
    pub fn new(evaluator: &'a ConstraintEvaluator<'a>) -> Self {
        Self {
            evaluator,
            config: evaluator.config(),
        }
    }

    /// Runs exchange and sync rounds until neither changes anything.
    /// Returns the number of committed moves.
    pub fn optimize(&self, schedule: &mut Schedule, troops: &[Troop]) -> usize {
        let mut moves = 0;
        let mut rounds = 0;
        while rounds < self.config.clustering_iteration_cap {
            rounds += 1;
            let changed = self.exchange_round(schedule, troops) + self.sync_reflection(schedule, troops);
            if changed == 0 {
                break;
            }
            moves += changed;
        }
        info!(moves, rounds, "clustering optimized");
        moves
    }

    /// One pass of first-improvement exchanges over every zone and troop.
    pub fn exchange_round(&self, schedule: &mut Schedule, troops: &[Troop]) -> usize {
        let mut moves = 0;
        for zone in 0..self.config.clustering_zones.len() {
            for troop in troops {
                let zone_slots: Vec<TimeSlot> = self
                    .movable(schedule, troop)
                    .filter(|e| self.config.clustering_zone_of(e.activity.as_str()) == Some(zone))
                    .map(|e| e.time_slot)
                    .collect();
                for from in zone_slots {
                    if self.try_exchange(schedule, troop, zone, from) {
                        moves += 1;
                    }
                }
            }
        }
        moves
    }

    /// Regular single-slot entries of the troop, chronological.
    fn movable<'s>(&'s self, schedule: &'s Schedule, troop: &'s Troop) -> impl Iterator<Item = &'s ScheduleEntry> + 's {
        let mut entries: Vec<&ScheduleEntry> = schedule
            .entries_for_troop(&troop.name)
            .filter(|e| {
                !e.forced
                    && !self.config.is_mandatory(e.activity.as_str())
                    && self.single_slot(troop, e.activity.as_str())
            })
            .collect();
        entries.sort_by_key(|e| e.time_slot);
        entries.into_iter()
    }

    fn single_slot(&self, troop: &Troop, activity: &str) -> bool {
        self.config
            .activity(activity)
            .is_some_and(|a| a.slots_for(troop) == 1)
    }

    /// Whether the troop's entry at `slot` may be displaced by a move:
    /// the slot is free, or holds a regular single-slot swappable filler.
    fn displaceable(&self, schedule: &Schedule, troop: &Troop, slot: TimeSlot) -> Option<Option<ScheduleEntry>> {
        let held: Vec<&ScheduleEntry> = schedule
            .entries_for_troop(&troop.name)
            .filter(|e| e.time_slot == slot)
            .collect();
        match held.as_slice() {
            [] => Some(None),
            [e] if !e.forced
                && self.config.is_swappable(e.activity.as_str())
                && !self.config.is_mandatory(e.activity.as_str())
                && self.single_slot(troop, e.activity.as_str()) =>
            {
                Some(Some((*e).clone()))
            }
            _ => None,
        }
    }

    fn try_exchange(&self, schedule: &mut Schedule, troop: &Troop, zone: usize, from: TimeSlot) -> bool {
        let Some(entry) = schedule.entry_at(&troop.name, from).cloned() else {
            return false;
        };
        if self.config.clustering_zone_of(entry.activity.as_str()) != Some(zone) {
            return false;
        }
        let before = zone_spread(self.config, schedule, &troop.name, zone);

        for to in self.config.grid.slots() {
            if to == from {
                continue;
            }
            let Some(filler) = self.displaceable(schedule, troop, to) else {
                continue;
            };
            let Some(trial) = self.swap(schedule, troop, &entry, to, filler.as_ref()) else {
                continue;
            };
            let after = zone_spread(self.config, &trial, &troop.name, zone);
            if after < before {
                debug!(
                    troop = %troop.name,
                    activity = %entry.activity,
                    %from,
                    %to,
                    filler = filler.as_ref().map(|f| f.activity.as_str()).unwrap_or("-"),
                    "clustering exchange"
                );
                *schedule = trial;
                return true;
            }
        }
        false
    }

    /// Moves `entry` to `to` and the optional filler back to the entry's
    /// slot on a copy. Returns the copy if both placements are legal.
    fn swap(
        &self,
        schedule: &Schedule,
        troop: &Troop,
        entry: &ScheduleEntry,
        to: TimeSlot,
        filler: Option<&ScheduleEntry>,
    ) -> Option<Schedule> {
        let moving = self.config.activity(entry.activity.as_str())?;
        let mut trial = schedule.clone();
        trial.remove_entry(entry);
        if let Some(f) = filler {
            trial.remove_entry(f);
        }
        self.put(&mut trial, troop, moving, to)?;
        if let Some(f) = filler {
            let back = self.config.activity(f.activity.as_str())?;
            self.put(&mut trial, troop, back, entry.time_slot)?;
        }
        Some(trial)
    }

    fn put(&self, schedule: &mut Schedule, troop: &Troop, activity: &Activity, slot: TimeSlot) -> Option<()> {
        self.evaluator
            .can_place(schedule, troop, activity, slot, Relaxation::Strict)
            .then(|| {
                schedule.add_entry(slot, activity, troop);
            })
    }

    /// Moves commissioner units onto their group's most common slot number
    /// for each mandatory activity. Returns the number of units moved.
    pub fn sync_reflection(&self, schedule: &mut Schedule, troops: &[Troop]) -> usize {
        let mut moved = 0;
        let mut groups: BTreeMap<&str, Vec<&Troop>> = BTreeMap::new();
        for troop in troops {
            if let Some(c) = self.config.commissioner_of(troop) {
                groups.entry(c).or_default().push(troop);
            }
        }

        // Units span the whole roster so split partners under different
        // commissioners still move together.
        let roster: Vec<&Troop> = troops.iter().collect();
        for (name, _) in self.config.mandatory_days() {
            let Some(activity) = self.config.activity(name.as_str()) else {
                continue;
            };
            let targets: BTreeMap<&str, u8> = groups
                .iter()
                .filter_map(|(&c, members)| self.target_slot(schedule, members, activity).map(|t| (c, t)))
                .collect();
            for unit in group_units(self.config, activity, &roster) {
                let Some(commissioner) = self.config.commissioner_of(unit[0]) else {
                    continue;
                };
                let Some(&target) = targets.get(commissioner) else {
                    continue;
                };
                if self.sync_unit(schedule, &unit, activity, target) {
                    debug!(%commissioner, activity = %activity.name, target, troops = unit.len(), "reflection synchronized");
                    moved += 1;
                }
            }
        }
        moved
    }

    fn target_slot(&self, schedule: &Schedule, members: &[&Troop], activity: &Activity) -> Option<u8> {
        let mut counts: HashMap<u8, usize> = HashMap::new();
        for troop in members {
            let slots: BTreeSet<u8> = schedule
                .entries_for_troop(&troop.name)
                .filter(|e| e.activity == activity.name && !e.forced)
                .map(|e| e.time_slot.slot_number)
                .collect();
            if let Some(&n) = slots.iter().next() {
                *counts.entry(n).or_default() += 1;
            }
        }
        most_common(&counts)
    }

    fn sync_unit(&self, schedule: &mut Schedule, unit: &[&Troop], activity: &Activity, target: u8) -> bool {
        let mut trial = schedule.clone();
        let mut changed = false;
        for troop in unit {
            let current: Vec<ScheduleEntry> = trial
                .entries_for_troop(&troop.name)
                .filter(|e| e.activity == activity.name)
                .cloned()
                .collect();
            let [entry] = current.as_slice() else {
                return false;
            };
            if entry.forced || self.config.activity(activity.name.as_str()).is_none() {
                return false;
            }
            if entry.time_slot.slot_number == target {
                continue;
            }
            let to = TimeSlot::new(entry.time_slot.day, target);
            let Some(filler) = self.displaceable(&trial, troop, to) else {
                return false;
            };
            let Some(next) = self.swap(&trial, troop, entry, to, filler.as_ref()) else {
                return false;
            };
            trial = next;
            changed = true;
        }
        if changed {
            *schedule = trial;
        }
        changed
    }
}

/// Spread of one troop's entries in one clustering zone.
pub fn zone_spread(config: &CampConfig, schedule: &Schedule, troop: &TroopId, zone: usize) -> Spread {
    let mut by_day: BTreeMap<Day, Vec<u8>> = BTreeMap::new();
    for e in schedule.entries_for_troop(troop) {
        if config.clustering_zone_of(e.activity.as_str()) == Some(zone) {
            by_day.entry(e.time_slot.day).or_default().push(e.time_slot.slot_number);
        }
    }
    let gaps = by_day
        .values()
        .map(|slots| {
            let lo = slots.iter().min().copied().unwrap_or(0) as usize;
            let hi = slots.iter().max().copied().unwrap_or(0) as usize;
            (hi + 1 - lo).saturating_sub(slots.len())
        })
        .sum();
    (by_day.len(), gaps)
}
