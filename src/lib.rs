//! Weekly activity scheduling for a summer camp.
//!
//! Troops arrive with ranked activity preferences and a few day pins; the
//! camp offers a fixed catalog of activities across a small weekly slot
//! grid. This crate turns one week's roster into a complete schedule in
//! which every troop has an activity in every slot and every hard rule
//! (capacity, staffing, range limits, beach slots, split-troop sync) holds
//! or is recorded as an explicit violation.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Day`, `TimeSlot`, `SlotGrid`, `Activity`,
//!   `Troop`, `Schedule`, `ScheduleEntry`, `Violation`
//! - **`config`**: `CampConfig`, the catalog and every rule list, with the
//!   standard camp as its default
//! - **`constraint`**: `ConstraintEvaluator` and the `Relaxation` ladder
//! - **`scheduler`**: the pipeline (`CampScheduler`) and its phases, plus
//!   reporting and audit
//! - **`validation`**: roster integrity checks
//! - **`error`**: configuration errors
//!
//! # Pipeline
//!
//! Placement → conflict repair → clustering search → gap elimination →
//! report. Each phase runs once, in order, over a schedule owned by a
//! single run. Identical input yields identical output.

pub mod config;
pub mod constraint;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;
