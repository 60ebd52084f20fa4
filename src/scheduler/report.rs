//! Schedule reporting and audit.
//!
//! Both entry points are pure functions of a finished schedule.
//!
//! # Report
//!
//! | Item | Definition |
//! |------|-----------|
//! | Missed top-5 / top-10 | Preferences of rank ≤ 5 / ≤ 10 absent from the troop's week |
//! | Exempt | The miss is structural: troop too large, activity not offered, or a second long activity |
//! | Forced placements | Entries placed regardless of legality |
//! | Evictions | Entries removed to repair a double booking or overshoot |
//! | Clustering excess | Zone days beyond `max(2, ceil(activities / 3))`, per troop |
//!
//! # Audit
//!
//! [`audit_schedule`] lists every breach of the week's hard invariants.
//! Forced entries are exempt from the rule checks but still count toward
//! gaps and double bookings.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use crate::config::CampConfig;
use crate::models::{ActivityId, Day, Schedule, ScheduleEntry, TimeSlot, Troop, TroopId, ViolationType};

/// Why a miss is not held against the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExemptReason {
    /// The troop exceeds the activity's size limit.
    TroopTooLarge,
    /// The activity is not in the catalog.
    NotInCatalog,
    /// A long off-camp activity the troop cannot take because it already
    /// has its allowance of them.
    SecondLongActivity,
}

/// A preference the troop did not get.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissedPreference {
    pub activity: ActivityId,
    /// 1-based rank.
    pub rank: usize,
    pub exempt: bool,
    pub reason: Option<ExemptReason>,
}

/// Missed preferences of one troop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TroopMisses {
    pub troop: TroopId,
    /// Misses of rank ≤ 5.
    pub top5: Vec<MissedPreference>,
    /// Misses of rank ≤ 10 (includes `top5`).
    pub top10: Vec<MissedPreference>,
}

/// Camp-wide clustering figures for one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneClustering {
    pub zone: String,
    /// Troop-days on which the zone is used.
    pub days_used: usize,
    /// Sum of per-troop target day counts.
    pub target_days: usize,
    /// Sum of per-troop days beyond target.
    pub excess_days: usize,
}

/// Outcome summary of a scheduled week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnscheduledReport {
    /// One record per troop, in roster order.
    pub troops: Vec<TroopMisses>,
    pub forced_placements: usize,
    pub evictions: usize,
    /// Every recorded violation.
    pub total_violations: usize,
    pub clustering: Vec<ZoneClustering>,
}

impl UnscheduledReport {
    /// Builds the report for a finished schedule.
    pub fn calculate(schedule: &Schedule, troops: &[Troop], config: &CampConfig) -> Self {
        let troops_report = troops
            .iter()
            .map(|troop| {
                let top10: Vec<MissedPreference> = troop
                    .top_preferences(10)
                    .iter()
                    .enumerate()
                    .filter(|(_, name)| !schedule.troop_has_activity(&troop.name, name.as_str()))
                    .map(|(i, name)| {
                        let reason = match config.activity(name.as_str()) {
                            None => Some(ExemptReason::NotInCatalog),
                            Some(act) if act.excludes(troop) => Some(ExemptReason::TroopTooLarge),
                            Some(act) if long_allowance_used(schedule, troop, config, act.name.as_str()) => {
                                Some(ExemptReason::SecondLongActivity)
                            }
                            Some(_) => None,
                        };
                        MissedPreference {
                            activity: name.clone(),
                            rank: i + 1,
                            exempt: reason.is_some(),
                            reason,
                        }
                    })
                    .collect();
                let top5 = top10.iter().filter(|m| m.rank <= 5).cloned().collect();
                TroopMisses {
                    troop: troop.name.clone(),
                    top5,
                    top10,
                }
            })
            .collect();

        let clustering = config
            .clustering_zones
            .iter()
            .enumerate()
            .map(|(zone, def)| {
                let mut stats = ZoneClustering {
                    zone: def.name.clone(),
                    days_used: 0,
                    target_days: 0,
                    excess_days: 0,
                };
                for troop in troops {
                    let mut days = BTreeSet::new();
                    let mut activities = HashSet::new();
                    for e in schedule.entries_for_troop(&troop.name) {
                        if config.clustering_zone_of(e.activity.as_str()) == Some(zone) {
                            days.insert(e.time_slot.day);
                            activities.insert(&e.activity);
                        }
                    }
                    if activities.is_empty() {
                        continue;
                    }
                    let target = activities.len().div_ceil(3).max(2);
                    stats.days_used += days.len();
                    stats.target_days += target;
                    stats.excess_days += days.len().saturating_sub(target);
                }
                stats
            })
            .collect();

        Self {
            troops: troops_report,
            forced_placements: schedule.violation_count(&ViolationType::ForcedPlacement),
            evictions: schedule.violation_count(&ViolationType::Eviction),
            total_violations: schedule.violations.len(),
            clustering,
        }
    }

    /// Misses of one troop.
    pub fn for_troop(&self, troop: &str) -> Option<&TroopMisses> {
        self.troops.iter().find(|t| t.troop == troop)
    }

    /// Non-exempt top-5 misses across the camp.
    pub fn unexplained_top5(&self) -> usize {
        self.troops
            .iter()
            .flat_map(|t| &t.top5)
            .filter(|m| !m.exempt)
            .count()
    }

    /// Non-exempt top-10 misses across the camp.
    pub fn unexplained_top10(&self) -> usize {
        self.troops
            .iter()
            .flat_map(|t| &t.top10)
            .filter(|m| !m.exempt)
            .count()
    }
}

/// Whether `activity` is long and the troop already holds its allowance
/// of other long activities.
fn long_allowance_used(schedule: &Schedule, troop: &Troop, config: &CampConfig, activity: &str) -> bool {
    if !config.is_long(activity) {
        return false;
    }
    let held: HashSet<&ActivityId> = schedule
        .entries_for_troop(&troop.name)
        .filter(|e| e.activity != *activity && config.is_long(e.activity.as_str()))
        .map(|e| &e.activity)
        .collect();
    held.len() as u32 >= config.long_activities.max_per_troop
}

/// Kind of invariant breach found by [`audit_schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AuditKind {
    Gap,
    DoubleBooking,
    BrokenBlock,
    AccuracyLimit,
    TroopTooLarge,
    BlockedDay,
    BeachSlot,
    CapacityExceeded,
    SplitOutOfSync,
    WetAfterTowerOds,
    LongActivityLimit,
}

/// One invariant breach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFinding {
    pub kind: AuditKind,
    /// Affected troop; empty for camp-wide capacity findings.
    pub troop: TroopId,
    pub slot: Option<TimeSlot>,
    pub message: String,
}

impl AuditFinding {
    fn new(kind: AuditKind, troop: &TroopId, slot: Option<TimeSlot>, message: impl Into<String>) -> Self {
        Self {
            kind,
            troop: troop.clone(),
            slot,
            message: message.into(),
        }
    }
}

impl fmt::Display for AuditFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot {
            Some(slot) => write!(f, "[{:?}] {} @ {}: {}", self.kind, self.troop, slot, self.message),
            None => write!(f, "[{:?}] {}: {}", self.kind, self.troop, self.message),
        }
    }
}

/// Lists every hard-invariant breach in a finished schedule.
///
/// An empty result means the week is complete and legal apart from the
/// recorded forced placements.
pub fn audit_schedule(schedule: &Schedule, troops: &[Troop], config: &CampConfig) -> Vec<AuditFinding> {
    let mut findings = Vec::new();

    for troop in troops {
        audit_troop(schedule, troop, config, &mut findings);
    }
    for slot in config.grid.slots() {
        audit_capacity(schedule, troops, config, slot, &mut findings);
    }
    audit_split_sync(schedule, troops, config, &mut findings);

    findings
}

fn audit_troop(schedule: &Schedule, troop: &Troop, config: &CampConfig, findings: &mut Vec<AuditFinding>) {
    let name = &troop.name;

    for slot in config.grid.slots() {
        match schedule.entries_for_troop(name).filter(|e| e.time_slot == slot).count() {
            0 => findings.push(AuditFinding::new(AuditKind::Gap, name, Some(slot), "empty slot")),
            1 => {}
            n => findings.push(AuditFinding::new(
                AuditKind::DoubleBooking,
                name,
                Some(slot),
                format!("{n} entries"),
            )),
        }
    }

    let regular: Vec<&ScheduleEntry> = schedule.entries_for_troop(name).filter(|e| !e.forced).collect();

    let mut blocks: BTreeMap<(&ActivityId, Day), Vec<u8>> = BTreeMap::new();
    for e in &regular {
        blocks
            .entry((&e.activity, e.time_slot.day))
            .or_default()
            .push(e.time_slot.slot_number);
    }
    for ((activity, day), mut numbers) in blocks {
        let Some(act) = config.activity(activity.as_str()) else {
            continue;
        };
        let len = act.slots_for(troop) as usize;
        if len == 1 {
            continue;
        }
        numbers.sort_unstable();
        let contiguous = numbers.windows(2).all(|w| w[1] == w[0] + 1);
        if numbers.len() != len || !contiguous {
            findings.push(AuditFinding::new(
                AuditKind::BrokenBlock,
                name,
                None,
                format!("{activity} on {day}: slots {numbers:?}, expected {len} contiguous"),
            ));
        }
    }

    for day in config.grid.days() {
        let accuracy: BTreeSet<&ActivityId> = regular
            .iter()
            .filter(|e| e.time_slot.day == day && config.is_accuracy(e.activity.as_str()))
            .map(|e| &e.activity)
            .collect();
        if accuracy.len() as u32 > config.accuracy.max_per_day {
            findings.push(AuditFinding::new(
                AuditKind::AccuracyLimit,
                name,
                None,
                format!("{} accuracy activities on {day}", accuracy.len()),
            ));
        }
    }

    let long: BTreeSet<&ActivityId> = regular
        .iter()
        .filter(|e| config.is_long(e.activity.as_str()))
        .map(|e| &e.activity)
        .collect();
    if long.len() as u32 > config.long_activities.max_per_troop {
        findings.push(AuditFinding::new(
            AuditKind::LongActivityLimit,
            name,
            None,
            format!("{} long activities", long.len()),
        ));
    }

    for e in &regular {
        let Some(act) = config.activity(e.activity.as_str()) else {
            continue;
        };
        let slot = Some(e.time_slot);
        if config.is_wet(act.name.as_str()) && e.time_slot.slot_number > 1 {
            let before = TimeSlot::new(e.time_slot.day, e.time_slot.slot_number - 1);
            if let Some(dry) = regular
                .iter()
                .find(|d| d.time_slot == before && config.is_tower_ods(d.activity.as_str()))
            {
                findings.push(AuditFinding::new(
                    AuditKind::WetAfterTowerOds,
                    name,
                    slot,
                    format!("{} directly after {}", act.name, dry.activity),
                ));
            }
        }
        if act.excludes(troop) {
            findings.push(AuditFinding::new(
                AuditKind::TroopTooLarge,
                name,
                slot,
                format!("{} with {} members", act.name, troop.size()),
            ));
        }
        if !act.runs_on(e.time_slot.day) {
            findings.push(AuditFinding::new(
                AuditKind::BlockedDay,
                name,
                slot,
                format!("{} does not run on {}", act.name, e.time_slot.day),
            ));
        }
        let rank_gated = troop
            .rank_of(act.name.as_str())
            .is_some_and(|rank| rank <= config.beach.slot_two_max_rank);
        if config.is_beach_restricted(act.name.as_str())
            && !config.beach_slot_open(e.time_slot.day, e.time_slot.slot_number)
            && !rank_gated
        {
            findings.push(AuditFinding::new(
                AuditKind::BeachSlot,
                name,
                slot,
                format!("{} in a closed beach slot", act.name),
            ));
        }
    }
}

fn audit_capacity(
    schedule: &Schedule,
    troops: &[Troop],
    config: &CampConfig,
    slot: TimeSlot,
    findings: &mut Vec<AuditFinding>,
) {
    let size_of = |name: &TroopId| troops.iter().find(|t| &t.name == name).map(Troop::size);
    let camp = TroopId::from("");

    let mut by_activity: BTreeMap<&ActivityId, Vec<&TroopId>> = BTreeMap::new();
    let mut by_area: BTreeMap<&str, BTreeSet<&TroopId>> = BTreeMap::new();
    let mut by_staff: BTreeMap<&str, usize> = BTreeMap::new();
    for e in schedule.entries_in_slot(slot).filter(|e| !e.forced) {
        let Some(act) = config.activity(e.activity.as_str()) else {
            continue;
        };
        by_activity.entry(&e.activity).or_default().push(&e.troop);
        if let Some(area) = act.area.as_deref() {
            by_area.entry(area).or_default().insert(&e.troop);
        }
        if let Some(staff) = act.staff.as_deref() {
            *by_staff.entry(staff).or_default() += 1;
        }
    }

    for (name, sharers) in by_activity {
        let Some(act) = config.activity(name.as_str()) else {
            continue;
        };
        if act.max_troops.is_some_and(|max| sharers.len() as u32 > max) {
            findings.push(AuditFinding::new(
                AuditKind::CapacityExceeded,
                &camp,
                Some(slot),
                format!("{name}: {} troops", sharers.len()),
            ));
        }
        if let Some(limit) = act.share_size_limit {
            if sharers.len() > 1 && sharers.iter().any(|t| size_of(t).is_some_and(|s| s > limit)) {
                findings.push(AuditFinding::new(
                    AuditKind::CapacityExceeded,
                    &camp,
                    Some(slot),
                    format!("{name}: shared by a troop over {limit}"),
                ));
            }
        }
    }
    for (area, users) in by_area {
        if users.len() as u32 > config.area_capacity(area) {
            findings.push(AuditFinding::new(
                AuditKind::CapacityExceeded,
                &camp,
                Some(slot),
                format!("area {area}: {} troops", users.len()),
            ));
        }
    }
    for (staff, busy) in by_staff {
        if config.staff_ceiling(staff).is_some_and(|ceiling| busy as u32 > ceiling) {
            findings.push(AuditFinding::new(
                AuditKind::CapacityExceeded,
                &camp,
                Some(slot),
                format!("staff {staff}: {busy} activities"),
            ));
        }
    }
}

fn audit_split_sync(schedule: &Schedule, troops: &[Troop], config: &CampConfig, findings: &mut Vec<AuditFinding>) {
    let mut groups: BTreeMap<&str, Vec<&Troop>> = BTreeMap::new();
    for troop in troops {
        if let Some(base) = troop.split_base() {
            groups.entry(base).or_default().push(troop);
        }
    }

    for (base, members) in groups.into_iter().filter(|(_, m)| m.len() > 1) {
        for activity in &config.split_shared {
            let numbers: BTreeSet<u8> = members
                .iter()
                .flat_map(|t| schedule.entries_for_troop(&t.name))
                .filter(|e| e.activity == *activity)
                .map(|e| e.time_slot.slot_number)
                .collect();
            if numbers.len() > 1 {
                findings.push(AuditFinding::new(
                    AuditKind::SplitOutOfSync,
                    &members[0].name,
                    None,
                    format!("{base} {activity} in slots {numbers:?}"),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Violation;

    fn slot(day: Day, n: u8) -> TimeSlot {
        TimeSlot::new(day, n)
    }

    fn add(s: &mut Schedule, config: &CampConfig, troop: &Troop, act: &str, at: TimeSlot) {
        s.add_entry(at, config.activity(act).unwrap(), troop);
    }

    fn kinds(findings: &[AuditFinding]) -> Vec<AuditKind> {
        findings.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn test_missed_preferences_with_exemptions() {
        let config = CampConfig::default();
        let troops = vec![Troop::new("Beta").with_members(18, 2).with_preferences([
            "Troop Shotgun",
            "Delta",
            "Moon Landing",
            "Sailing",
            "Tie Dye",
            "Archery",
        ])];
        let mut s = Schedule::new();
        add(&mut s, &config, &troops[0], "Delta", slot(Day::Monday, 1));

        let report = UnscheduledReport::calculate(&s, &troops, &config);
        let beta = report.for_troop("Beta").unwrap();

        assert_eq!(beta.top5.len(), 4);
        assert_eq!(beta.top10.len(), 5);
        assert_eq!(beta.top5[0].reason, Some(ExemptReason::TroopTooLarge));
        assert!(beta.top5[0].exempt);
        assert_eq!(beta.top5[1].reason, Some(ExemptReason::NotInCatalog));
        assert_eq!(beta.top5[2].activity, "Sailing");
        assert_eq!(beta.top5[2].rank, 4);
        assert!(!beta.top5[2].exempt);
        assert_eq!(report.unexplained_top5(), 2);
        assert_eq!(report.unexplained_top10(), 3);
    }

    #[test]
    fn test_violation_totals() {
        let config = CampConfig::default();
        let troops = vec![Troop::new("Alpha")];
        let mut s = Schedule::new();
        let at = slot(Day::Friday, 3);
        s.add_violation(Violation::forced_placement(&troops[0].name, &"Reflection".into(), at, "full"));
        s.add_violation(Violation::eviction(&troops[0].name, &"Fishing".into(), at, "double booking"));

        let report = UnscheduledReport::calculate(&s, &troops, &config);
        assert_eq!(report.forced_placements, 1);
        assert_eq!(report.evictions, 1);
        assert_eq!(report.total_violations, 2);
    }

    #[test]
    fn test_clustering_stats() {
        let config = CampConfig::default();
        let troops = vec![Troop::new("Alpha")];
        let mut s = Schedule::new();
        add(&mut s, &config, &troops[0], "Tie Dye", slot(Day::Monday, 1));
        add(&mut s, &config, &troops[0], "Hemp Craft", slot(Day::Tuesday, 1));
        add(&mut s, &config, &troops[0], "Monkey's Fist", slot(Day::Wednesday, 1));

        let report = UnscheduledReport::calculate(&s, &troops, &config);
        let crafts = report.clustering.iter().find(|z| z.zone == "Handicrafts").unwrap();
        assert_eq!(crafts.days_used, 3);
        assert_eq!(crafts.target_days, 2);
        assert_eq!(crafts.excess_days, 1);
        let nature = report.clustering.iter().find(|z| z.zone == "Nature").unwrap();
        assert_eq!(nature.days_used, 0);
    }

    #[test]
    fn test_audit_gaps_and_double_booking() {
        let config = CampConfig::default();
        let troops = vec![Troop::new("Alpha")];
        let mut s = Schedule::new();
        add(&mut s, &config, &troops[0], "Gaga Ball", slot(Day::Monday, 1));
        add(&mut s, &config, &troops[0], "9 Square", slot(Day::Monday, 1));

        let findings = audit_schedule(&s, &troops, &config);
        let gaps = findings.iter().filter(|f| f.kind == AuditKind::Gap).count();
        assert_eq!(gaps, 13);
        assert!(kinds(&findings).contains(&AuditKind::DoubleBooking));
    }

    #[test]
    fn test_audit_rule_breaches() {
        let config = CampConfig::default();
        let big = Troop::new("Big").with_members(18, 2);
        let troops = vec![big.clone()];
        let mut s = Schedule::new();
        add(&mut s, &config, &big, "Troop Shotgun", slot(Day::Tuesday, 1));
        add(&mut s, &config, &big, "Archery", slot(Day::Tuesday, 3));
        add(&mut s, &config, &big, "Shower House", slot(Day::Monday, 1));
        add(&mut s, &config, &big, "Troop Swim", slot(Day::Monday, 2));
        s.entries.push(ScheduleEntry::new(slot(Day::Wednesday, 1), "Sailing".into(), big.name.clone()));

        let found = kinds(&audit_schedule(&s, &troops, &config));
        for kind in [
            AuditKind::TroopTooLarge,
            AuditKind::AccuracyLimit,
            AuditKind::BlockedDay,
            AuditKind::BeachSlot,
            AuditKind::BrokenBlock,
        ] {
            assert!(found.contains(&kind), "missing {kind:?}");
        }
    }

    #[test]
    fn test_second_long_activity_is_exempt() {
        let config = CampConfig::default();
        let troops = vec![Troop::new("Alpha").with_preferences(["Back of the Moon", "Itasca State Park", "Delta"])];
        let mut s = Schedule::new();
        add(&mut s, &config, &troops[0], "Back of the Moon", slot(Day::Tuesday, 1));

        let report = UnscheduledReport::calculate(&s, &troops, &config);
        let alpha = report.for_troop("Alpha").unwrap();
        assert_eq!(alpha.top5.len(), 2);
        assert_eq!(alpha.top5[0].activity, "Itasca State Park");
        assert_eq!(alpha.top5[0].reason, Some(ExemptReason::SecondLongActivity));
        assert!(alpha.top5[0].exempt);
        assert_eq!(alpha.top5[1].reason, None);
        assert_eq!(report.unexplained_top5(), 1);

        // Without a long activity the miss counts.
        let report = UnscheduledReport::calculate(&Schedule::new(), &troops, &config);
        assert_eq!(report.unexplained_top5(), 3);
    }

    #[test]
    fn test_audit_wet_after_tower_and_long_limit() {
        let config = CampConfig::default();
        let troops = vec![Troop::new("Alpha")];
        let mut s = Schedule::new();
        add(&mut s, &config, &troops[0], "Knots and Lashings", slot(Day::Monday, 1));
        add(&mut s, &config, &troops[0], "Sauna", slot(Day::Monday, 2));
        add(&mut s, &config, &troops[0], "Itasca State Park", slot(Day::Tuesday, 1));
        add(&mut s, &config, &troops[0], "Tamarac Wildlife Refuge", slot(Day::Wednesday, 1));

        let found = kinds(&audit_schedule(&s, &troops, &config));
        assert!(found.contains(&AuditKind::WetAfterTowerOds));
        assert!(found.contains(&AuditKind::LongActivityLimit));

        // Wet before dry is legal.
        let mut s = Schedule::new();
        add(&mut s, &config, &troops[0], "Sauna", slot(Day::Monday, 1));
        add(&mut s, &config, &troops[0], "Knots and Lashings", slot(Day::Monday, 2));
        let found = kinds(&audit_schedule(&s, &troops, &config));
        assert!(!found.contains(&AuditKind::WetAfterTowerOds));
    }

    #[test]
    fn test_audit_rank_gated_beach_slot_allowed() {
        let config = CampConfig::default();
        let troops = vec![Troop::new("Alpha").with_preferences(["Troop Swim"])];
        let mut s = Schedule::new();
        add(&mut s, &config, &troops[0], "Troop Swim", slot(Day::Monday, 2));

        let found = kinds(&audit_schedule(&s, &troops, &config));
        assert!(!found.contains(&AuditKind::BeachSlot));
    }

    #[test]
    fn test_audit_capacity_and_split_sync() {
        let config = CampConfig::default();
        let troops = vec![Troop::new("Eagle-A"), Troop::new("Eagle-B")];
        let mut s = Schedule::new();
        add(&mut s, &config, &troops[0], "Delta", slot(Day::Monday, 1));
        add(&mut s, &config, &troops[1], "Delta", slot(Day::Monday, 1));
        add(&mut s, &config, &troops[0], "Reflection", slot(Day::Friday, 1));
        add(&mut s, &config, &troops[1], "Reflection", slot(Day::Friday, 2));

        let found = kinds(&audit_schedule(&s, &troops, &config));
        assert!(found.contains(&AuditKind::CapacityExceeded));
        assert!(found.contains(&AuditKind::SplitOutOfSync));
    }

    #[test]
    fn test_forced_entries_skip_rule_checks() {
        let config = CampConfig::default();
        let troops = vec![Troop::new("Alpha")];
        let mut s = Schedule::new();
        s.add_forced(slot(Day::Monday, 1), config.activity("Shower House").unwrap(), &troops[0]);

        let found = kinds(&audit_schedule(&s, &troops, &config));
        assert!(!found.contains(&AuditKind::BlockedDay));
        assert!(found.contains(&AuditKind::Gap));
    }
}
