//! Built-in placement rules, in evaluation order.
//!
//! Capacity is always recomputed from the entries currently in the
//! schedule; nothing keeps running counters.

use std::collections::HashSet;

use super::{PlacementContext, PlacementRule, Rejection};
use crate::models::{Activity, TimeSlot};

/// Every slot of the span is free for the troop.
#[derive(Debug, Clone, Copy)]
pub struct SpanFree;

impl PlacementRule for SpanFree {
    fn name(&self) -> &'static str {
        "span-free"
    }

    fn check(&self, ctx: &PlacementContext<'_>) -> Result<(), Rejection> {
        match ctx
            .span
            .iter()
            .find(|&&s| !ctx.schedule.is_troop_free(s, &ctx.troop.name))
        {
            Some(&slot) => Err(Rejection::SpanBusy { slot }),
            None => Ok(()),
        }
    }
}

/// Per-activity, per-area and per-staff-pool ceilings in every occupied
/// slot, counting this troop as one more user.
#[derive(Debug, Clone, Copy)]
pub struct Capacity;

impl PlacementRule for Capacity {
    fn name(&self) -> &'static str {
        "capacity"
    }

    fn check(&self, ctx: &PlacementContext<'_>) -> Result<(), Rejection> {
        let act = ctx.activity;
        for &slot in &ctx.span {
            let others: Vec<_> = ctx
                .schedule
                .entries_in_slot(slot)
                .filter(|e| e.troop != ctx.troop.name)
                .collect();

            let sharers: Vec<_> = others.iter().filter(|e| e.activity == act.name).collect();
            if let Some(max) = act.max_troops {
                if sharers.len() as u32 >= max {
                    return Err(Rejection::ActivityFull { slot });
                }
            }
            if let Some(limit) = act.share_size_limit {
                let oversized = |name: &str| ctx.troop_size(name).is_some_and(|s| s > limit);
                if !sharers.is_empty()
                    && (ctx.troop.size() > limit || sharers.iter().any(|e| oversized(e.troop.as_str())))
                {
                    return Err(Rejection::ShareSizeLimit { slot, limit });
                }
            }

            if let Some(area) = act.area.as_deref() {
                let users: HashSet<_> = others
                    .iter()
                    .filter(|e| {
                        ctx.config
                            .activity(e.activity.as_str())
                            .is_some_and(|a| a.area.as_deref() == Some(area))
                    })
                    .map(|e| &e.troop)
                    .collect();
                if users.len() as u32 >= ctx.config.area_capacity(area) {
                    return Err(Rejection::AreaFull {
                        slot,
                        area: area.to_string(),
                    });
                }
            }

            if let Some(staff) = act.staff.as_deref() {
                if let Some(ceiling) = ctx.config.staff_ceiling(staff) {
                    let busy = others
                        .iter()
                        .filter(|e| {
                            ctx.config
                                .activity(e.activity.as_str())
                                .is_some_and(|a| a.staff.as_deref() == Some(staff))
                        })
                        .count();
                    if busy as u32 >= ceiling {
                        return Err(Rejection::StaffCeiling {
                            slot,
                            staff: staff.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// At most `max_per_day` accuracy activities per troop per day.
#[derive(Debug, Clone, Copy)]
pub struct AccuracyLimit;

impl PlacementRule for AccuracyLimit {
    fn name(&self) -> &'static str {
        "accuracy"
    }

    fn check(&self, ctx: &PlacementContext<'_>) -> Result<(), Rejection> {
        let config = ctx.config;
        if !config.is_accuracy(ctx.activity.name.as_str()) {
            return Ok(());
        }
        let day = ctx.slot.day;
        let held: HashSet<_> = ctx
            .schedule
            .troop_day_entries(&ctx.troop.name, day)
            .filter(|e| config.is_accuracy(e.activity.as_str()))
            .map(|e| &e.activity)
            .collect();
        if held.len() as u32 >= config.accuracy.max_per_day {
            return Err(Rejection::AccuracyLimit { day });
        }
        Ok(())
    }
}

/// Listed activity pairs never share a day for one troop.
#[derive(Debug, Clone, Copy)]
pub struct SameDayConflicts;

impl PlacementRule for SameDayConflicts {
    fn name(&self) -> &'static str {
        "same-day-conflicts"
    }

    fn check(&self, ctx: &PlacementContext<'_>) -> Result<(), Rejection> {
        if ctx.relaxation.ignores_same_day_conflicts() {
            return Ok(());
        }
        let name = ctx.activity.name.as_str();
        match ctx
            .schedule
            .troop_day_entries(&ctx.troop.name, ctx.slot.day)
            .find(|e| ctx.config.conflicts_same_day(e.activity.as_str(), name))
        {
            Some(e) => Err(Rejection::SameDayConflict {
                other: e.activity.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Beach activities stay in open slots unless the relaxation grants the
/// rank-gated exception.
#[derive(Debug, Clone, Copy)]
pub struct BeachSlots;

impl PlacementRule for BeachSlots {
    fn name(&self) -> &'static str {
        "beach-slots"
    }

    fn check(&self, ctx: &PlacementContext<'_>) -> Result<(), Rejection> {
        let config = ctx.config;
        let name = ctx.activity.name.as_str();
        if !config.is_beach_restricted(name) {
            return Ok(());
        }
        let exempt = ctx.relaxation.allows_beach_slot_two()
            && ctx
                .troop
                .rank_of(name)
                .is_some_and(|rank| rank <= config.beach.slot_two_max_rank);
        match ctx
            .span
            .iter()
            .find(|s| !config.beach_slot_open(s.day, s.slot_number))
        {
            Some(&slot) if !exempt => Err(Rejection::BeachSlot { slot }),
            _ => Ok(()),
        }
    }
}

/// Troop size eligibility.
#[derive(Debug, Clone, Copy)]
pub struct TroopSize;

impl PlacementRule for TroopSize {
    fn name(&self) -> &'static str {
        "troop-size"
    }

    fn check(&self, ctx: &PlacementContext<'_>) -> Result<(), Rejection> {
        match ctx.activity.max_troop_size {
            Some(max) if ctx.activity.excludes(ctx.troop) => Err(Rejection::TroopTooLarge {
                size: ctx.troop.size(),
                max,
            }),
            _ => Ok(()),
        }
    }
}

/// Activities never run on their blocked days.
#[derive(Debug, Clone, Copy)]
pub struct BlockedDays;

impl PlacementRule for BlockedDays {
    fn name(&self) -> &'static str {
        "blocked-days"
    }

    fn check(&self, ctx: &PlacementContext<'_>) -> Result<(), Rejection> {
        let day = ctx.slot.day;
        if ctx.activity.runs_on(day) {
            Ok(())
        } else {
            Err(Rejection::BlockedDay { day })
        }
    }
}

/// A wet activity never starts right after a Tower or Outdoor Skills
/// activity of the same troop, whichever of the two is placed first.
#[derive(Debug, Clone, Copy)]
pub struct WetAfterTowerOds;

impl PlacementRule for WetAfterTowerOds {
    fn name(&self) -> &'static str {
        "wet-after-tower-ods"
    }

    fn check(&self, ctx: &PlacementContext<'_>) -> Result<(), Rejection> {
        let config = ctx.config;
        let name = ctx.activity.name.as_str();
        let troop = &ctx.troop.name;
        let (Some(&first), Some(&last)) = (ctx.span.first(), ctx.span.last()) else {
            return Ok(());
        };

        if config.is_wet(name) && first.slot_number > 1 {
            let before = TimeSlot::new(first.day, first.slot_number - 1);
            if ctx
                .schedule
                .entry_at(troop, before)
                .is_some_and(|e| config.is_tower_ods(e.activity.as_str()))
            {
                return Err(Rejection::WetAfterTowerOds { slot: first });
            }
        }
        if config.is_tower_ods(name) {
            let after = TimeSlot::new(last.day, last.slot_number.saturating_add(1));
            if ctx
                .schedule
                .entry_at(troop, after)
                .is_some_and(|e| config.is_wet(e.activity.as_str()))
            {
                return Err(Rejection::WetAfterTowerOds { slot: after });
            }
        }
        Ok(())
    }
}

/// At most `max_per_troop` distinct long off-camp activities per troop.
#[derive(Debug, Clone, Copy)]
pub struct LongActivityLimit;

impl PlacementRule for LongActivityLimit {
    fn name(&self) -> &'static str {
        "long-activity-limit"
    }

    fn check(&self, ctx: &PlacementContext<'_>) -> Result<(), Rejection> {
        let config = ctx.config;
        let name = ctx.activity.name.as_str();
        if !config.is_long(name) {
            return Ok(());
        }
        let held: HashSet<_> = ctx
            .schedule
            .entries_for_troop(&ctx.troop.name)
            .filter(|e| e.activity != *name && config.is_long(e.activity.as_str()))
            .map(|e| &e.activity)
            .collect();
        let max = config.long_activities.max_per_troop;
        if held.len() as u32 >= max {
            return Err(Rejection::LongActivityLimit { max });
        }
        Ok(())
    }
}

/// Commissioner-run activities stay on the day the troop's commissioner
/// runs them.
#[derive(Debug, Clone, Copy)]
pub struct CommissionerDays;

impl PlacementRule for CommissionerDays {
    fn name(&self) -> &'static str {
        "commissioner-days"
    }

    fn check(&self, ctx: &PlacementContext<'_>) -> Result<(), Rejection> {
        if ctx.relaxation.ignores_day_requests() {
            return Ok(());
        }
        match ctx.config.commissioner_day(ctx.troop, ctx.activity.name.as_str()) {
            Some(day) if day != ctx.slot.day => Err(Rejection::CommissionerDay { day }),
            _ => Ok(()),
        }
    }
}

/// Day pins are not silently overridden.
///
/// A pinned activity must land on one of its pinned days. Any other
/// placement on a day must leave enough free slots for the pins and
/// mandatory activities that day still owes; a pin already honored on
/// another day owes nothing.
#[derive(Debug, Clone, Copy)]
pub struct DayRequests;

impl PlacementRule for DayRequests {
    fn name(&self) -> &'static str {
        "day-requests"
    }

    fn check(&self, ctx: &PlacementContext<'_>) -> Result<(), Rejection> {
        if ctx.relaxation.ignores_day_requests() {
            return Ok(());
        }
        let troop = ctx.troop;
        let name = ctx.activity.name.as_str();
        let day = ctx.slot.day;

        let pinned = troop.pinned_days(name);
        if !pinned.is_empty() {
            return if pinned.contains(&day) {
                Ok(())
            } else {
                Err(Rejection::DayRequest { day })
            };
        }

        let explicit = troop.requests_on(day).iter();
        let mandatory = ctx
            .config
            .mandatory_days()
            .into_iter()
            .filter(|&(_, d)| d == day)
            .map(|(a, _)| a);
        // A non-repeatable activity held on another day no longer owes
        // this one.
        let settled = |a: &Activity| {
            let key = a.name.as_str();
            if a.repeatable {
                ctx.schedule.troop_has_activity_on(&troop.name, key, day)
            } else {
                ctx.schedule.troop_has_activity(&troop.name, key)
            }
        };
        let mut owed = HashSet::new();
        let reserved: usize = explicit
            .chain(mandatory)
            .filter(|a| a.as_str() != name)
            .filter(|a| owed.insert(a.as_str()))
            .filter_map(|a| ctx.config.activity(a.as_str()))
            .filter(|a| !settled(*a))
            .map(|a| a.slots_for(troop) as usize)
            .sum();
        if reserved == 0 {
            return Ok(());
        }

        let free = ctx
            .schedule
            .free_slot_count(&troop.name, day, &ctx.config.grid);
        if free < ctx.span.len() + reserved {
            return Err(Rejection::DayRequest { day });
        }
        Ok(())
    }
}
