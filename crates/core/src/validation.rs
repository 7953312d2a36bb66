//! Questionnaire completeness checks.
//!
//! Every check runs independently and reports its own [`ValidationError`], so a caller can ask
//! for all missing answers in one round trip instead of one at a time.

use crate::catalog::{Condition, Symptom};
use crate::error::ValidationError;
use crate::questionnaire::Questionnaire;

/// Validates a questionnaire.
///
/// Checks, in field order:
/// - at least one location,
/// - a duration,
/// - at least one symptom,
/// - a lump size if and only if "lump/swelling" was selected,
/// - at least one pre-existing condition ("none" counts), with "none" standing alone,
/// - a medicine answer.
///
/// # Returns
///
/// An empty list when the questionnaire is accepted.
pub fn validate(questionnaire: &Questionnaire) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if questionnaire.locations.is_empty() {
        errors.push(ValidationError::MissingLocations);
    }

    if questionnaire.duration.is_none() {
        errors.push(ValidationError::MissingDuration);
    }

    if questionnaire.symptoms.is_empty() {
        errors.push(ValidationError::MissingSymptoms);
    }

    let has_lump = questionnaire.has_symptom(Symptom::LumpSwelling);
    match (has_lump, questionnaire.lump_size.is_some()) {
        (true, false) => errors.push(ValidationError::MissingLumpSize),
        (false, true) => errors.push(ValidationError::UnexpectedLumpSize),
        _ => {}
    }

    if questionnaire.conditions.is_empty() {
        errors.push(ValidationError::MissingConditions);
    } else if questionnaire.conditions.len() > 1
        && questionnaire.conditions.contains(&Condition::None)
    {
        errors.push(ValidationError::NoneConditionNotExclusive);
    }

    if questionnaire.medicine.is_none() {
        errors.push(ValidationError::MissingMedicine);
    }

    if !errors.is_empty() {
        tracing::debug!("questionnaire rejected with {} error(s)", errors.len());
    }

    errors
}
