//! Intake questionnaire.
//!
//! A [`Questionnaire`] is what the user submitted, possibly incomplete. Parsing only checks the
//! shape (every tag must come from its catalog); completeness is the validator's job. A
//! [`ValidatedQuestionnaire`] can only be obtained from a questionnaire that passed validation.

use crate::catalog::{Condition, Duration, Location, LumpSize, Medicine, Symptom};
use crate::error::{parse_json_slice, MalformedInputError, ValidationError};
use crate::validation;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "QuestionnaireWire")]
pub struct Questionnaire {
    pub locations: Vec<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
    pub symptoms: Vec<Symptom>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lump_size: Option<LumpSize>,
    pub conditions: Vec<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medicine: Option<Medicine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// Wire shape accepted from clients.
///
/// Blank strings and nulls count as "not answered". A lone `location` is accepted for clients
/// that only offer a single choice and becomes a one-element `locations`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct QuestionnaireWire {
    #[serde(default)]
    locations: Option<Vec<Location>>,
    #[serde(default, deserialize_with = "blank_as_none")]
    location: Option<Location>,
    #[serde(default, deserialize_with = "blank_as_none")]
    duration: Option<Duration>,
    #[serde(default)]
    symptoms: Option<Vec<Symptom>>,
    #[serde(default, deserialize_with = "blank_as_none")]
    lump_size: Option<LumpSize>,
    #[serde(default)]
    conditions: Option<Vec<Condition>>,
    #[serde(default, deserialize_with = "blank_as_none")]
    medicine: Option<Medicine>,
    #[serde(default)]
    memo: Option<String>,
}

impl TryFrom<QuestionnaireWire> for Questionnaire {
    type Error = MalformedInputError;

    fn try_from(wire: QuestionnaireWire) -> Result<Self, Self::Error> {
        let locations = match (wire.locations, wire.location) {
            (Some(_), Some(_)) => {
                return Err(MalformedInputError::new(
                    "location",
                    "use either `locations` or `location`, not both",
                ))
            }
            (Some(locations), None) => locations,
            (None, Some(location)) => vec![location],
            (None, None) => Vec::new(),
        };

        Ok(Self {
            locations: dedup(locations),
            duration: wire.duration,
            symptoms: dedup(wire.symptoms.unwrap_or_default()),
            lump_size: wire.lump_size,
            conditions: dedup(wire.conditions.unwrap_or_default()),
            medicine: wire.medicine,
            memo: wire.memo,
        })
    }
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn dedup<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

impl Questionnaire {
    /// Parse a questionnaire from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedInputError`] with the failing path when the payload is not an object,
    /// has unknown fields, wrong types, or tags outside their catalog.
    pub fn from_json(json_text: &str) -> Result<Self, MalformedInputError> {
        Self::from_json_slice(json_text.as_bytes())
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, MalformedInputError> {
        let wire: QuestionnaireWire = parse_json_slice(bytes)?;
        Self::try_from(wire)
    }

    /// Parse a questionnaire from YAML text.
    pub fn from_yaml(yaml_text: &str) -> Result<Self, MalformedInputError> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
        let wire: QuestionnaireWire = serde_path_to_error::deserialize(deserializer)
            .map_err(MalformedInputError::from_path_error)?;
        Self::try_from(wire)
    }

    pub fn has_symptom(&self, symptom: Symptom) -> bool {
        self.symptoms.contains(&symptom)
    }

    /// Every completeness problem, in field order. Empty means accepted.
    pub fn validate(&self) -> Vec<ValidationError> {
        validation::validate(self)
    }

    /// Consume the questionnaire, returning the validated form or every validation error.
    pub fn into_validated(self) -> Result<ValidatedQuestionnaire, Vec<ValidationError>> {
        let errors = self.validate();
        match (self.duration, self.medicine) {
            (Some(duration), Some(medicine)) if errors.is_empty() => Ok(ValidatedQuestionnaire {
                locations: self.locations,
                duration,
                symptoms: self.symptoms,
                lump_size: self.lump_size,
                conditions: self.conditions,
                medicine,
                memo: self.memo,
            }),
            _ => Err(errors),
        }
    }
}

/// A questionnaire that passed every validation check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedQuestionnaire {
    locations: Vec<Location>,
    duration: Duration,
    symptoms: Vec<Symptom>,
    lump_size: Option<LumpSize>,
    conditions: Vec<Condition>,
    medicine: Medicine,
    memo: Option<String>,
}

impl ValidatedQuestionnaire {
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn symptoms(&self) -> &[Symptom] {
        &self.symptoms
    }

    pub fn has_symptom(&self, symptom: Symptom) -> bool {
        self.symptoms.contains(&symptom)
    }

    pub fn lump_size(&self) -> Option<LumpSize> {
        self.lump_size
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn medicine(&self) -> Medicine {
        self.medicine
    }

    /// The memo, if it holds anything besides whitespace.
    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref().filter(|m| !m.trim().is_empty())
    }
}
