//! Conflict resolver.
//!
//! Repairs double bookings and capacity overshoot left by the placement
//! phases. The losing entry of each conflict is evicted (its whole block for
//! multi-slot activities), recorded as an eviction violation, and requeued
//! for the gap eliminator.
//!
//! Forced entries are never evicted. When a forced entry shares a slot with
//! regular entries of the same troop, the regular ones go.

use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{info, warn};

use super::Priority;
use crate::config::CampConfig;
use crate::models::{ActivityId, Schedule, ScheduleEntry, TimeSlot, Troop, TroopId, Violation};

/// Detects and repairs structurally impossible states.
#[derive(Debug, Clone)]
pub struct ConflictResolver<'a> {
    config: &'a CampConfig,
    roster: HashMap<&'a str, (usize, &'a Troop)>,
}

impl<'a> ConflictResolver<'a> {
    /// Creates a resolver for one week's roster.
    pub fn new(config: &'a CampConfig, troops: &'a [Troop]) -> Self {
        let roster = troops
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.as_str(), (i, t)))
            .collect();
        Self { config, roster }
    }

    /// Repairs the schedule. Returns the evicted `(troop, activity)` pairs
    /// in eviction order.
    pub fn resolve(&self, schedule: &mut Schedule) -> Vec<(TroopId, ActivityId)> {
        let mut requeue = Vec::new();
        self.resolve_double_bookings(schedule, &mut requeue);
        self.resolve_capacity(schedule, &mut requeue);
        info!(evicted = requeue.len(), "conflicts resolved");
        requeue
    }

    fn priority(&self, entry: &ScheduleEntry) -> (Priority, usize) {
        match self.roster.get(entry.troop.as_str()) {
            Some(&(index, troop)) => (
                Priority::of(self.config, troop, entry.activity.as_str()),
                index,
            ),
            None => (Priority::Unranked, usize::MAX),
        }
    }

    fn resolve_double_bookings(&self, schedule: &mut Schedule, requeue: &mut Vec<(TroopId, ActivityId)>) {
        let mut groups: BTreeMap<(TroopId, TimeSlot), Vec<ScheduleEntry>> = BTreeMap::new();
        for e in &schedule.entries {
            groups
                .entry((e.troop.clone(), e.time_slot))
                .or_default()
                .push(e.clone());
        }

        for ((_, slot), group) in groups {
            if group.len() < 2 {
                continue;
            }
            let keep: HashSet<&ActivityId> = if group.iter().any(|e| e.forced) {
                group.iter().filter(|e| e.forced).map(|e| &e.activity).collect()
            } else {
                group
                    .iter()
                    .enumerate()
                    .min_by_key(|&(i, e)| (self.priority(e).0, i))
                    .map(|(_, e)| &e.activity)
                    .into_iter()
                    .collect()
            };
            for e in group.iter().filter(|e| !e.forced && !keep.contains(&e.activity)) {
                self.evict(schedule, e, slot, "double booking", requeue);
            }
        }
    }

    fn resolve_capacity(&self, schedule: &mut Schedule, requeue: &mut Vec<(TroopId, ActivityId)>) {
        for slot in self.config.grid.slots() {
            while let Some(victim) = self.overshoot_victim(schedule, slot) {
                if !self.evict(schedule, &victim, slot, "capacity overshoot", requeue) {
                    break;
                }
            }
        }
    }

    /// The lowest-priority regular entry of the first over-capacity group in
    /// the slot.
    fn overshoot_victim(&self, schedule: &Schedule, slot: TimeSlot) -> Option<ScheduleEntry> {
        let entries: Vec<&ScheduleEntry> = schedule.entries_in_slot(slot).collect();

        let mut groups: Vec<Vec<&ScheduleEntry>> = Vec::new();
        let mut by_activity: BTreeMap<&ActivityId, Vec<&ScheduleEntry>> = BTreeMap::new();
        let mut by_area: BTreeMap<&str, Vec<&ScheduleEntry>> = BTreeMap::new();
        let mut by_staff: BTreeMap<&str, Vec<&ScheduleEntry>> = BTreeMap::new();
        for &e in &entries {
            let Some(act) = self.config.activity(e.activity.as_str()) else {
                continue;
            };
            by_activity.entry(&e.activity).or_default().push(e);
            if let Some(area) = act.area.as_deref() {
                by_area.entry(area).or_default().push(e);
            }
            if let Some(staff) = act.staff.as_deref() {
                by_staff.entry(staff).or_default().push(e);
            }
        }

        for (name, group) in by_activity {
            let Some(act) = self.config.activity(name.as_str()) else {
                continue;
            };
            let full = act.max_troops.is_some_and(|max| group.len() as u32 > max);
            let oversized = act.share_size_limit.is_some_and(|limit| {
                group.len() > 1
                    && group.iter().any(|e| {
                        self.roster
                            .get(e.troop.as_str())
                            .is_some_and(|&(_, t)| t.size() > limit)
                    })
            });
            if full || oversized {
                groups.push(group);
            }
        }
        for (area, group) in by_area {
            let troops: HashSet<&TroopId> = group.iter().map(|e| &e.troop).collect();
            if troops.len() as u32 > self.config.area_capacity(area) {
                groups.push(group);
            }
        }
        for (staff, group) in by_staff {
            if self
                .config
                .staff_ceiling(staff)
                .is_some_and(|ceiling| group.len() as u32 > ceiling)
            {
                groups.push(group);
            }
        }

        groups.into_iter().find_map(|group| {
            group
                .into_iter()
                .filter(|e| !e.forced)
                .max_by_key(|e| self.priority(e))
                .cloned()
        })
    }

    fn evict(
        &self,
        schedule: &mut Schedule,
        entry: &ScheduleEntry,
        slot: TimeSlot,
        reason: &str,
        requeue: &mut Vec<(TroopId, ActivityId)>,
    ) -> bool {
        let multi_slot = match (
            self.config.activity(entry.activity.as_str()),
            self.roster.get(entry.troop.as_str()),
        ) {
            (Some(act), Some(&(_, troop))) => act.slots_for(troop) > 1,
            _ => false,
        };
        let removed = if multi_slot {
            !schedule
                .remove_block(&entry.troop, entry.activity.as_str(), slot.day)
                .is_empty()
        } else {
            schedule.remove_entry(entry)
        };
        if !removed {
            return false;
        }

        warn!(troop = %entry.troop, activity = %entry.activity, %slot, reason, "evicted entry");
        schedule.add_violation(Violation::eviction(
            &entry.troop,
            &entry.activity,
            slot,
            format!("evicted to repair {reason}"),
        ));
        let key = (entry.troop.clone(), entry.activity.clone());
        if !requeue.contains(&key) {
            requeue.push(key);
        }
        true
    }
}
