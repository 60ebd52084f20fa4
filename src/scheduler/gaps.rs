//! Gap eliminator: the terminal pass that leaves no troop with an empty
//! slot.
//!
//! # Algorithm
//!
//! 1. Requeued evictions get one more placement attempt with their usual
//!    escalation ladder.
//! 2. For each troop (roster order), free slots are filled one at a time,
//!    busiest clustering day first, then chronologically. Each slot takes
//!    the first of:
//!    - a remaining preference (rank order) through its ladder: strict,
//!      the beach slot-2 exception, and off its day if day-bound;
//!    - a displacement: a regular single-slot entry of the troop that is
//!      neither mandatory nor a top-5 preference moves into the gap, and a
//!      missed top-5 preference takes the slot it freed;
//!    - a default-fill activity the troop does not have yet (repeatable
//!      ones always qualify), strict;
//!    - the same list loosened, where a non-repeatable activity may repeat
//!      on a different day;
//!    - a forced placement of the first default-fill activity, recorded as
//!      a violation.
//!
//! "Loosened" here is [`Relaxation::Loosened`]: it lifts same-day conflict
//! pairs, day pins and commissioner days only. Capacity, area exclusivity,
//! staff ceilings and every other hard rule still apply, so a loosened
//! fill never oversubscribes a slot. Only the final forced step bypasses
//! the rules, and it is always recorded.
//!
//! Every iteration fills at least one slot, so the pass always terminates
//! with zero gaps.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::{debug, info, warn};

use super::{clustering_weight, preference_ladder, Priority, MANDATORY_LADDER};
use crate::config::CampConfig;
use crate::constraint::{ConstraintEvaluator, Relaxation};
use crate::models::{Activity, ActivityId, Schedule, ScheduleEntry, TimeSlot, Troop, TroopId, Violation};

/// Preferences of this rank or better may displace other entries.
const TOP_RANKS: usize = 5;

/// Result of a gap-elimination pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapFillSummary {
    /// Requeued evictions placed again.
    pub recovered: usize,
    /// Top-5 preferences placed by moving a lower-priority entry.
    pub displaced: usize,
    /// Slots filled with preferences.
    pub preferences: usize,
    /// Slots filled from the default-fill list.
    pub defaults: usize,
    /// Forced placements.
    pub forced: usize,
}

/// Terminal fill pass.
#[derive(Debug, Clone)]
pub struct GapEliminator<'a> {
    evaluator: &'a ConstraintEvaluator<'a>,
    config: &'a CampConfig,
}

impl<'a> GapEliminator<'a> {
    /// Creates an eliminator over an evaluator.
    pub fn new(evaluator: &'a ConstraintEvaluator<'a>) -> Self {
        Self {
            evaluator,
            config: evaluator.config(),
        }
    }

    /// Fills every free slot of every troop.
    pub fn fill(
        &self,
        schedule: &mut Schedule,
        troops: &[Troop],
        requeue: &[(TroopId, ActivityId)],
    ) -> GapFillSummary {
        let mut summary = GapFillSummary::default();

        for (troop_id, name) in requeue {
            let (Some(troop), Some(activity)) = (
                troops.iter().find(|t| &t.name == troop_id),
                self.config.activity(name.as_str()),
            ) else {
                continue;
            };
            if schedule.troop_has_activity(&troop.name, name.as_str()) && !activity.repeatable {
                continue;
            }
            if self.requeue_one(schedule, troop, activity) {
                summary.recovered += 1;
            }
        }

        for troop in troops {
            while let Some(slot) = self.next_free_slot(schedule, troop) {
                self.fill_slot(schedule, troop, slot, &mut summary);
            }
        }

        info!(
            recovered = summary.recovered,
            displaced = summary.displaced,
            preferences = summary.preferences,
            defaults = summary.defaults,
            forced = summary.forced,
            "gaps eliminated"
        );
        summary
    }

    fn requeue_one(&self, schedule: &mut Schedule, troop: &Troop, activity: &Activity) -> bool {
        let mandatory_day = self
            .config
            .mandatory_days()
            .into_iter()
            .find(|(a, _)| **a == activity.name)
            .map(|(_, d)| d);
        let (ladder, day) = match mandatory_day {
            Some(d) => (MANDATORY_LADDER, Some(d)),
            None => (preference_ladder(self.config, troop, activity), None),
        };
        for &level in ladder {
            let starts = self.evaluator.legal_starts(schedule, troop, activity, level, day);
            if let Some(slot) = super::best_start(self.config, schedule, troop, activity, &starts) {
                schedule.add_entry(slot, activity, troop);
                debug!(troop = %troop.name, activity = %activity.name, %slot, %level, "requeued entry placed");
                return true;
            }
        }
        debug!(troop = %troop.name, activity = %activity.name, "requeued entry dropped");
        false
    }

    /// The troop's next free slot: most clustering activity on its day
    /// first, then chronological.
    fn next_free_slot(&self, schedule: &Schedule, troop: &Troop) -> Option<TimeSlot> {
        schedule
            .free_slots(&troop.name, &self.config.grid)
            .into_iter()
            .min_by_key(|s| (Reverse(clustering_weight(self.config, schedule, &troop.name, s.day)), *s))
    }

    fn fill_slot(&self, schedule: &mut Schedule, troop: &Troop, slot: TimeSlot, summary: &mut GapFillSummary) {
        // Remaining preferences.
        for (_, name) in troop.ranked_preferences() {
            if Priority::of(self.config, troop, name.as_str()) == Priority::Mandatory
                || schedule.troop_has_activity(&troop.name, name.as_str())
            {
                continue;
            }
            let Some(activity) = self.config.activity(name.as_str()) else {
                continue;
            };
            for &level in preference_ladder(self.config, troop, activity) {
                if self.evaluator.can_place(schedule, troop, activity, slot, level) {
                    schedule.add_entry(slot, activity, troop);
                    summary.preferences += 1;
                    debug!(troop = %troop.name, activity = %name, %slot, %level, "gap filled with preference");
                    return;
                }
            }
        }

        if self.displace_for_top5(schedule, troop, slot) {
            summary.displaced += 1;
            return;
        }

        // Default fill, strict then loosened.
        for level in [Relaxation::Strict, Relaxation::Loosened] {
            for name in &self.config.default_fill {
                let Some(activity) = self.config.activity(name.as_str()) else {
                    continue;
                };
                let fresh = activity.repeatable
                    || !schedule.troop_has_activity(&troop.name, name.as_str())
                    || (level == Relaxation::Loosened
                        && !schedule.troop_has_activity_on(&troop.name, name.as_str(), slot.day));
                if fresh && self.evaluator.can_place(schedule, troop, activity, slot, level) {
                    schedule.add_entry(slot, activity, troop);
                    summary.defaults += 1;
                    debug!(troop = %troop.name, activity = %name, %slot, %level, "gap filled with default");
                    return;
                }
            }
        }

        // Forced.
        let Some(activity) = self
            .config
            .default_fill
            .first()
            .and_then(|name| self.config.activity(name.as_str()))
        else {
            return;
        };
        schedule.add_forced(slot, activity, troop);
        schedule.add_violation(Violation::forced_placement(
            &troop.name,
            &activity.name,
            slot,
            "no legal activity for empty slot",
        ));
        summary.forced += 1;
        warn!(troop = %troop.name, activity = %activity.name, %slot, "forced gap fill");
    }

    /// Moves one lower-priority entry of the troop into the free `slot` so
    /// that a missed top-5 preference can take the slot it leaves. Works on
    /// a copy; commits only when both placements are legal.
    fn displace_for_top5(&self, schedule: &mut Schedule, troop: &Troop, slot: TimeSlot) -> bool {
        let missed: Vec<&Activity> = troop
            .top_preferences(TOP_RANKS)
            .iter()
            .filter(|name| {
                !self.config.is_mandatory(name.as_str()) && !schedule.troop_has_activity(&troop.name, name.as_str())
            })
            .filter_map(|name| self.config.activity(name.as_str()))
            .collect();
        if missed.is_empty() {
            return false;
        }

        let mut movable: Vec<&ScheduleEntry> = schedule
            .entries_for_troop(&troop.name)
            .filter(|e| {
                let lower = match Priority::of(self.config, troop, e.activity.as_str()) {
                    Priority::Ranked(rank) => rank > TOP_RANKS,
                    Priority::Unranked => true,
                    Priority::Mandatory => false,
                };
                lower
                    && !e.forced
                    && self
                        .config
                        .activity(e.activity.as_str())
                        .is_some_and(|a| a.slots_for(troop) == 1)
            })
            .collect();
        movable.sort_by_key(|e| (Reverse(Priority::of(self.config, troop, e.activity.as_str())), e.time_slot));
        let movable: Vec<ScheduleEntry> = movable.into_iter().cloned().collect();

        for preference in missed {
            for entry in &movable {
                if let Some(trial) = self.try_displace(schedule, troop, entry, slot, preference) {
                    debug!(
                        troop = %troop.name,
                        activity = %preference.name,
                        moved = %entry.activity,
                        from = %entry.time_slot,
                        to = %slot,
                        "top-5 preference placed by displacement"
                    );
                    *schedule = trial;
                    return true;
                }
            }
        }
        false
    }

    fn try_displace(
        &self,
        schedule: &Schedule,
        troop: &Troop,
        entry: &ScheduleEntry,
        to: TimeSlot,
        preference: &Activity,
    ) -> Option<Schedule> {
        let moving = self.config.activity(entry.activity.as_str())?;
        let freed = entry.time_slot;
        let mut trial = schedule.clone();
        trial.remove_entry(entry);
        if !self.evaluator.can_place(&trial, troop, moving, to, Relaxation::Strict) {
            return None;
        }
        trial.add_entry(to, moving, troop);

        let len = preference.slots_for(troop);
        for &level in preference_ladder(self.config, troop, preference) {
            let start = self
                .evaluator
                .legal_starts(&trial, troop, preference, level, Some(freed.day))
                .into_iter()
                .find(|&s| self.config.grid.span(s, len).is_some_and(|span| span.contains(&freed)));
            if let Some(start) = start {
                trial.add_entry(start, preference, troop);
                return Some(trial);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, Zone};

    fn slot(day: Day, n: u8) -> TimeSlot {
        TimeSlot::new(day, n)
    }

    #[test]
    fn test_fills_every_slot() {
        let config = CampConfig::default();
        let troops = vec![
            Troop::new("Alpha").with_preferences(["Delta", "Archery"]),
            Troop::new("Bravo"),
        ];
        let eval = ConstraintEvaluator::new(&config, &troops);
        let mut s = Schedule::new();

        let summary = GapEliminator::new(&eval).fill(&mut s, &troops, &[]);
        for t in &troops {
            assert!(s.free_slots(&t.name, &config.grid).is_empty());
        }
        assert_eq!(summary.forced, 0);
        assert_eq!(summary.preferences, 2);
        assert!(s.troop_has_activity(&troops[0].name, "Delta"));
        assert!(s.troop_has_activity(&troops[0].name, "Archery"));
    }

    #[test]
    fn test_requeue_placed_first() {
        let config = CampConfig::default();
        let troops = vec![Troop::new("Alpha").with_preferences(["Tie Dye"])];
        let eval = ConstraintEvaluator::new(&config, &troops);
        let mut s = Schedule::new();

        let requeue = vec![(troops[0].name.clone(), ActivityId::from("Sailing"))];
        let summary = GapEliminator::new(&eval).fill(&mut s, &troops, &requeue);
        assert_eq!(summary.recovered, 1);
        assert_eq!(s.block_slots(&troops[0].name, "Sailing", Day::Monday), vec![
            slot(Day::Monday, 1),
            slot(Day::Monday, 2)
        ]);
    }

    #[test]
    fn test_clustering_day_filled_first() {
        let config = CampConfig::default();
        let troops = vec![Troop::new("Alpha")];
        let eval = ConstraintEvaluator::new(&config, &troops);
        let orienteering = config.activity("Orienteering").unwrap();
        let mut s = Schedule::new();
        s.add_entry(slot(Day::Wednesday, 2), orienteering, &troops[0]);

        let elim = GapEliminator::new(&eval);
        assert_eq!(elim.next_free_slot(&s, &troops[0]), Some(slot(Day::Wednesday, 1)));
    }

    #[test]
    fn test_top5_preference_recovered_by_displacement() {
        let mut config = CampConfig::default();
        config.grid = crate::models::SlotGrid::new().with_day(Day::Monday, 3);
        config.mandatory.clear();
        let gaga = config.activity("Gaga Ball").unwrap().clone();

        // Gaga Ball in the middle leaves no pair of free slots for Sailing.
        let troops = vec![Troop::new("Alpha").with_preferences(["Sailing"])];
        let eval = ConstraintEvaluator::new(&config, &troops);
        let mut s = Schedule::new();
        s.add_entry(slot(Day::Monday, 2), &gaga, &troops[0]);

        let summary = GapEliminator::new(&eval).fill(&mut s, &troops, &[]);
        assert_eq!(summary.displaced, 1);
        assert_eq!(summary.forced, 0);
        assert_eq!(s.block_slots(&troops[0].name, "Sailing", Day::Monday), vec![
            slot(Day::Monday, 2),
            slot(Day::Monday, 3)
        ]);
        assert_eq!(
            s.entry_at(&troops[0].name, slot(Day::Monday, 1)).map(|e| e.activity.as_str()),
            Some("Gaga Ball")
        );

        // A top-5 preference is never the one moved.
        let troops = vec![Troop::new("Alpha").with_preferences(["Sailing", "Gaga Ball"])];
        let eval = ConstraintEvaluator::new(&config, &troops);
        let mut s = Schedule::new();
        s.add_entry(slot(Day::Monday, 2), &gaga, &troops[0]);

        let summary = GapEliminator::new(&eval).fill(&mut s, &troops, &[]);
        assert_eq!(summary.displaced, 0);
        assert!(!s.troop_has_activity(&troops[0].name, "Sailing"));
        assert!(s.free_slots(&troops[0].name, &config.grid).is_empty());
    }

    #[test]
    fn test_forced_when_nothing_fits() {
        let mut config = CampConfig::default();
        let mut acts: Vec<Activity> = config.catalog.clone().into();
        acts.push(Activity::new("Closed Pool", Zone::Beach).blocked_on(Day::Monday));
        config.catalog = acts.into();
        config.default_fill = vec!["Closed Pool".into()];
        config.grid = crate::models::SlotGrid::new().with_day(Day::Monday, 2);
        config.mandatory.clear();

        let troops = vec![Troop::new("Alpha")];
        let eval = ConstraintEvaluator::new(&config, &troops);
        let mut s = Schedule::new();
        let summary = GapEliminator::new(&eval).fill(&mut s, &troops, &[]);

        assert_eq!(summary.forced, 2);
        assert_eq!(s.entries.iter().filter(|e| e.forced).count(), 2);
        assert_eq!(s.violations.len(), 2);
        assert!(s.free_slots(&troops[0].name, &config.grid).is_empty());
    }

    #[test]
    fn test_loosened_allows_repeat_on_other_day() {
        let mut config = CampConfig::default();
        config.default_fill = vec!["Super Troop".into()];
        config.grid = crate::models::SlotGrid::new()
            .with_day(Day::Monday, 1)
            .with_day(Day::Tuesday, 1);
        config.mandatory.clear();

        let troops = vec![Troop::new("Alpha")];
        let eval = ConstraintEvaluator::new(&config, &troops);
        let mut s = Schedule::new();
        let summary = GapEliminator::new(&eval).fill(&mut s, &troops, &[]);

        assert_eq!(summary.defaults, 2);
        assert_eq!(summary.forced, 0);
        assert_eq!(s.entries_for_troop(&troops[0].name).filter(|e| e.activity == "Super Troop").count(), 2);
    }
}
