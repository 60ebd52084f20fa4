//! Roster validation.
//!
//! Checks a week's roster against the configuration before scheduling.
//! Detects:
//! - Duplicate or empty troop names
//! - Preferences and day requests naming unknown activities
//! - Repeated preferences
//! - Day requests on days without slots
//! - Split sub-troops without a partner
//!
//! The pipeline itself assumes a validated roster; callers run this first.

use crate::config::CampConfig;
use crate::models::Troop;
use std::collections::{HashMap, HashSet};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two troops share a name.
    DuplicateTroop,
    /// A troop has an empty name.
    EmptyName,
    /// A preference or day request names an activity missing from the
    /// catalog.
    UnknownActivity,
    /// The same activity appears twice in one preference list.
    DuplicatePreference,
    /// A day request targets a day the grid has no slots on.
    DayOutsideGrid,
    /// A split sub-troop has no partner with the same base name.
    UnpairedSplitTroop,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a roster against the configuration.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_roster(troops: &[Troop], config: &CampConfig) -> ValidationResult {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    for troop in troops {
        if troop.name.as_str().trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyName,
                "Troop with empty name",
            ));
        } else if !names.insert(troop.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateTroop,
                format!("Duplicate troop: {}", troop.name),
            ));
        }

        let mut seen = HashSet::new();
        for pref in &troop.preferences {
            if config.activity(pref.as_str()).is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownActivity,
                    format!("Troop '{}' prefers unknown activity '{}'", troop.name, pref),
                ));
            }
            if !seen.insert(pref.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicatePreference,
                    format!("Troop '{}' lists '{}' more than once", troop.name, pref),
                ));
            }
        }

        for (&day, requests) in &troop.day_requests {
            if config.grid.slot_count(day) == 0 && !requests.is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DayOutsideGrid,
                    format!("Troop '{}' has requests on {day}, which has no slots", troop.name),
                ));
            }
            for act in requests {
                if config.activity(act.as_str()).is_none() {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownActivity,
                        format!(
                            "Troop '{}' requests unknown activity '{}' on {day}",
                            troop.name, act
                        ),
                    ));
                }
            }
        }
    }

    let mut groups: HashMap<&str, usize> = HashMap::new();
    for base in troops.iter().filter_map(Troop::split_base) {
        *groups.entry(base).or_default() += 1;
    }
    for troop in troops {
        if let Some(base) = troop.split_base() {
            if groups.get(base).copied().unwrap_or(0) < 2 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnpairedSplitTroop,
                    format!("Split troop '{}' has no partner in group '{base}'", troop.name),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Day;

    fn sample_roster() -> Vec<Troop> {
        vec![
            Troop::new("Tecumseh").with_preferences(["Climbing Tower", "Archery", "Delta"]),
            Troop::new("Eagle-A")
                .with_preferences(["Sailing"])
                .with_day_request(Day::Tuesday, "Tie Dye"),
            Troop::new("Eagle-B").with_preferences(["Sailing"]),
        ]
    }

    fn has_kind(errors: &[ValidationError], kind: ValidationErrorKind) -> bool {
        errors.iter().any(|e| e.kind == kind)
    }

    #[test]
    fn test_valid_roster() {
        let config = CampConfig::default();
        assert!(validate_roster(&sample_roster(), &config).is_ok());
    }

    #[test]
    fn test_duplicate_and_empty_names() {
        let config = CampConfig::default();
        let troops = vec![Troop::new("Samoset"), Troop::new("Samoset"), Troop::new(" ")];

        let errors = validate_roster(&troops, &config).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::DuplicateTroop));
        assert!(has_kind(&errors, ValidationErrorKind::EmptyName));
    }

    #[test]
    fn test_unknown_activity() {
        let config = CampConfig::default();
        let troops = vec![Troop::new("Samoset")
            .with_preferences(["Skydiving"])
            .with_day_request(Day::Monday, "Bungee")];

        let errors = validate_roster(&troops, &config).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::UnknownActivity)
                .count(),
            2
        );
    }

    #[test]
    fn test_duplicate_preference() {
        let config = CampConfig::default();
        let troops = vec![Troop::new("Samoset").with_preferences(["Delta", "Archery", "Delta"])];

        let errors = validate_roster(&troops, &config).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::DuplicatePreference));
    }

    #[test]
    fn test_day_outside_grid() {
        let mut config = CampConfig::default();
        config.grid = config.grid.clone().with_day(Day::Wednesday, 0);
        let troops = vec![Troop::new("Samoset").with_day_request(Day::Wednesday, "Delta")];

        let errors = validate_roster(&troops, &config).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::DayOutsideGrid));
    }

    #[test]
    fn test_unpaired_split_troop() {
        let config = CampConfig::default();
        let troops = vec![Troop::new("Eagle-A"), Troop::new("Hawk")];

        let errors = validate_roster(&troops, &config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::UnpairedSplitTroop);
    }

    #[test]
    fn test_multiple_errors() {
        let config = CampConfig::default();
        let troops = vec![
            Troop::new("Samoset").with_preferences(["Skydiving", "Skydiving"]),
            Troop::new("Samoset"),
        ];

        let errors = validate_roster(&troops, &config).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
