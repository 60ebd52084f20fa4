//! The weekly scheduling pipeline.
//!
//! [`CampScheduler`] runs the phases strictly in order over one roster:
//!
//! 1. [`PlacementEngine`]: day pins, ranked bands, mandatory activities.
//! 2. [`ConflictResolver`]: evicts double bookings and capacity overshoot.
//! 3. [`ClusteringOptimizer`]: optional swap search for tighter zone days.
//! 4. [`GapEliminator`]: fills every remaining slot.
//! 5. [`UnscheduledReport`]: misses and violation totals.
//!
//! Every phase reads rules through one [`ConstraintEvaluator`], so legality
//! means the same thing everywhere. Weeks share nothing and may run in
//! parallel; see [`CampScheduler::schedule_weeks`].

mod clustering;
mod conflict;
mod gaps;
mod placement;
mod report;

pub use clustering::{zone_spread, ClusteringOptimizer, Spread};
pub use conflict::ConflictResolver;
pub use gaps::{GapEliminator, GapFillSummary};
pub use placement::PlacementEngine;
pub use report::{
    audit_schedule, AuditFinding, AuditKind, ExemptReason, MissedPreference, TroopMisses,
    UnscheduledReport, ZoneClustering,
};

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;
use tracing::info;

use crate::config::CampConfig;
use crate::constraint::{ConstraintEvaluator, Relaxation};
use crate::error::ConfigError;
use crate::models::{Activity, ActivityId, Day, Schedule, TimeSlot, Troop, TroopId};

/// A preference the placement phases could not place.
///
/// Provisional: later phases may still recover it. The final word is the
/// [`UnscheduledReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Miss {
    pub troop: TroopId,
    pub activity: ActivityId,
    /// Preference rank, `None` for a bare day pin.
    pub rank: Option<usize>,
}

impl Miss {
    pub fn new(troop: &Troop, activity: &ActivityId, rank: Option<usize>) -> Self {
        Self {
            troop: troop.name.clone(),
            activity: activity.clone(),
            rank,
        }
    }
}

/// Who keeps a contested slot. Lower wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Mandatory,
    /// Preference rank (1 = best).
    Ranked(usize),
    Unranked,
}

impl Priority {
    /// Priority of an activity for a troop.
    pub fn of(config: &CampConfig, troop: &Troop, activity: &str) -> Self {
        if config.is_mandatory(activity) {
            Priority::Mandatory
        } else {
            troop.rank_of(activity).map_or(Priority::Unranked, Priority::Ranked)
        }
    }
}

/// Escalation for mandatory activities.
pub(crate) const MANDATORY_LADDER: &[Relaxation] = &[
    Relaxation::Strict,
    Relaxation::IgnoreDayRequests,
    Relaxation::Loosened,
];

/// Escalation for a preference: beach activities may fall back to the
/// rank-gated slot-2 exception, and a day-bound activity may leave its day
/// once nothing fits there.
pub(crate) fn preference_ladder(config: &CampConfig, troop: &Troop, activity: &Activity) -> &'static [Relaxation] {
    let name = activity.name.as_str();
    let beach = config.is_beach_restricted(name);
    match (beach, is_day_bound(config, troop, name)) {
        (true, true) => &[
            Relaxation::Strict,
            Relaxation::BeachSlotTwo,
            Relaxation::IgnoreDayRequests,
        ],
        (true, false) => &[Relaxation::Strict, Relaxation::BeachSlotTwo],
        (false, true) => &[Relaxation::Strict, Relaxation::IgnoreDayRequests],
        (false, false) => &[Relaxation::Strict],
    }
}

/// Whether the troop pinned the activity or its commissioner runs it on a
/// fixed day.
pub(crate) fn is_day_bound(config: &CampConfig, troop: &Troop, activity: &str) -> bool {
    !troop.pinned_days(activity).is_empty() || config.commissioner_day(troop, activity).is_some()
}

/// Distinct activities of one clustering zone the troop has on a day.
fn zone_activities_on(config: &CampConfig, schedule: &Schedule, troop: &TroopId, day: Day, zone: usize) -> usize {
    schedule
        .troop_day_entries(troop, day)
        .filter(|e| config.clustering_zone_of(e.activity.as_str()) == Some(zone))
        .map(|e| &e.activity)
        .collect::<HashSet<_>>()
        .len()
}

/// Entries of the troop on a day that belong to any clustering zone.
pub(crate) fn clustering_weight(config: &CampConfig, schedule: &Schedule, troop: &TroopId, day: Day) -> usize {
    schedule
        .troop_day_entries(troop, day)
        .filter(|e| config.clustering_zone_of(e.activity.as_str()).is_some())
        .count()
}

/// Picks among legal starts: the day with the most same-zone activities,
/// then chronological order.
pub(crate) fn best_start(
    config: &CampConfig,
    schedule: &Schedule,
    troop: &Troop,
    activity: &Activity,
    candidates: &[TimeSlot],
) -> Option<TimeSlot> {
    let zone = config.clustering_zone_of(activity.name.as_str());
    candidates.iter().copied().min_by_key(|slot| {
        let affinity = zone.map_or(0, |z| zone_activities_on(config, schedule, &troop.name, slot.day, z));
        (Reverse(affinity), *slot)
    })
}

/// Everything one week's run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekOutcome {
    pub schedule: Schedule,
    pub report: UnscheduledReport,
    /// Misses recorded by the placement phases, before recovery.
    pub provisional_misses: Vec<Miss>,
    /// What the gap eliminator did.
    pub gap_fill: GapFillSummary,
}

/// Pipeline driver.
///
/// # Example
///
/// ```
/// use camp_schedule::config::CampConfig;
/// use camp_schedule::models::Troop;
/// use camp_schedule::scheduler::CampScheduler;
///
/// let scheduler = CampScheduler::new(CampConfig::default()).unwrap();
/// let troops = vec![Troop::new("Tecumseh").with_preferences(["Delta", "Sailing"])];
/// let week = scheduler.schedule(&troops);
///
/// let slots = scheduler.config().grid.total_slots();
/// assert_eq!(week.schedule.entries_for_troop(&troops[0].name).count(), slots);
/// ```
#[derive(Debug, Clone)]
pub struct CampScheduler {
    config: CampConfig,
    clustering: bool,
}

impl CampScheduler {
    /// Validates the configuration and creates a driver.
    pub fn new(config: CampConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            clustering: true,
        })
    }

    /// Enables or disables the clustering optimizer (on by default).
    pub fn with_clustering(mut self, enabled: bool) -> Self {
        self.clustering = enabled;
        self
    }

    pub fn config(&self) -> &CampConfig {
        &self.config
    }

    /// Schedules one week. Never fails: misses and forced placements are
    /// reported, not raised.
    pub fn schedule(&self, troops: &[Troop]) -> WeekOutcome {
        let config = &self.config;
        let evaluator = ConstraintEvaluator::new(config, troops);
        let mut schedule = Schedule::new();
        info!(troops = troops.len(), slots = config.grid.total_slots(), "scheduling week");

        let provisional_misses = PlacementEngine::new(&evaluator).run(&mut schedule, troops);
        let requeue = ConflictResolver::new(config, troops).resolve(&mut schedule);
        if self.clustering {
            ClusteringOptimizer::new(&evaluator).optimize(&mut schedule, troops);
        }
        let gap_fill = GapEliminator::new(&evaluator).fill(&mut schedule, troops, &requeue);

        let report = UnscheduledReport::calculate(&schedule, troops, config);
        info!(
            entries = schedule.entry_count(),
            violations = report.total_violations,
            missed_top5 = report.unexplained_top5(),
            displaced = gap_fill.displaced,
            gap_forced = gap_fill.forced,
            "week scheduled"
        );
        WeekOutcome {
            schedule,
            report,
            provisional_misses,
            gap_fill,
        }
    }

    /// Schedules independent weeks in parallel. Output order matches input
    /// order and each result equals a sequential [`schedule`](Self::schedule).
    pub fn schedule_weeks(&self, weeks: &[Vec<Troop>]) -> Vec<WeekOutcome> {
        std::thread::scope(|scope| {
            let handles: Vec<_> = weeks
                .iter()
                .map(|roster| scope.spawn(move || self.schedule(roster)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        })
    }
}
