//! Wire DTOs for the HTTP surface.
//!
//! Tags travel as their catalog strings. Facility records are exposed under the `hospital(s)`
//! keys existing clients read.

use serde::{Deserialize, Serialize};
use triage_core::catalog::{Condition, Department, Duration, Location, LumpSize, Medicine, Symptom};
use triage_core::facility::{DaySchedule, Facility, TimeRange};
use triage_core::service::Assessment;
use triage_core::ValidationError;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Every closed tag list the intake form offers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRes {
    pub locations: Vec<String>,
    pub durations: Vec<String>,
    pub symptoms: Vec<String>,
    pub lump_sizes: Vec<String>,
    pub conditions: Vec<String>,
    pub medicines: Vec<String>,
    pub departments: Vec<String>,
}

fn tags<T: Copy + std::fmt::Display>(all: &[T]) -> Vec<String> {
    all.iter().map(ToString::to_string).collect()
}

impl CatalogRes {
    pub fn current() -> Self {
        Self {
            locations: tags(Location::ALL),
            durations: tags(Duration::ALL),
            symptoms: tags(Symptom::ALL),
            lump_sizes: tags(LumpSize::ALL),
            conditions: tags(Condition::ALL),
            medicines: tags(Medicine::ALL),
            departments: tags(Department::ALL),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimeRangeDto {
    /// `HH:MM`
    pub start: String,
    pub end: String,
}

impl From<&TimeRange> for TimeRangeDto {
    fn from(range: &TimeRange) -> Self {
        Self {
            start: range.start.format("%H:%M").to_string(),
            end: range.end.format("%H:%M").to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayScheduleDto {
    /// 0 = Sunday ... 6 = Saturday
    pub day_of_week: u8,
    pub closed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morning: Option<TimeRangeDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub afternoon: Option<TimeRangeDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<&DaySchedule> for DayScheduleDto {
    fn from(day: &DaySchedule) -> Self {
        Self {
            day_of_week: day.day_of_week,
            closed: day.closed,
            morning: day.morning.as_ref().map(TimeRangeDto::from),
            afternoon: day.afternoon.as_ref().map(TimeRangeDto::from),
            note: day.note.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacilityDto {
    pub id: String,
    pub name: String,
    pub departments: Vec<String>,
    pub city: String,
    pub address: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<DayScheduleDto>>,
}

impl From<&Facility> for FacilityDto {
    fn from(facility: &Facility) -> Self {
        Self {
            id: facility.id.to_string(),
            name: facility.name.to_string(),
            departments: tags(&facility.departments),
            city: facility.city.clone(),
            address: facility.address.clone(),
            phone: facility.phone.clone(),
            hours: facility.hours.clone(),
            map_url: facility.map_url.clone(),
            website: facility.website.clone(),
            note: facility.note.clone(),
            schedule: facility
                .schedule
                .as_ref()
                .map(|s| s.days().iter().map(DayScheduleDto::from).collect()),
        }
    }
}

/// A list of facilities and its length.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FacilityListRes {
    pub hospitals: Vec<FacilityDto>,
    pub count: usize,
}

impl From<&[Facility]> for FacilityListRes {
    fn from(facilities: &[Facility]) -> Self {
        Self {
            hospitals: facilities.iter().map(FacilityDto::from).collect(),
            count: facilities.len(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FacilityRes {
    pub hospital: FacilityDto,
}

/// Query string for `GET /search`. Lists are comma separated.
#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Requested departments, highest priority first.
    pub categories: Option<String>,
    pub cities: Option<String>,
    /// Case-insensitive substring of the facility name.
    pub keyword: Option<String>,
}

/// Query string for `GET /facilities/search`.
#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoriesParams {
    /// Requested departments, highest priority first. Required.
    pub categories: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecommendReq {
    #[serde(default)]
    pub locations: Vec<String>,
    /// May be empty; only the location table applies then.
    #[serde(default)]
    pub symptoms: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecommendRes {
    pub departments: Vec<String>,
}

impl From<&[Department]> for RecommendRes {
    fn from(departments: &[Department]) -> Self {
        Self {
            departments: tags(departments),
        }
    }
}

/// Questionnaire body, documented for OpenAPI. Handlers parse the raw payload themselves so a
/// malformed body gets the same `{ error }` shape as every other 400.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireReq {
    pub locations: Option<Vec<String>>,
    /// Single-location form; mutually exclusive with `locations`.
    pub location: Option<String>,
    pub duration: Option<String>,
    pub symptoms: Option<Vec<String>>,
    pub lump_size: Option<String>,
    pub conditions: Option<Vec<String>>,
    pub medicine: Option<String>,
    pub memo: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SummaryRes {
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TriageRes {
    pub departments: Vec<String>,
    pub description: String,
    pub hospitals: Vec<FacilityDto>,
    pub count: usize,
}

impl From<&Assessment> for TriageRes {
    fn from(assessment: &Assessment) -> Self {
        Self {
            departments: tags(&assessment.departments),
            description: assessment.description.clone(),
            hospitals: assessment.facilities.iter().map(FacilityDto::from).collect(),
            count: assessment.facilities.len(),
        }
    }
}

/// Error body. `errors` lists every validation problem; `error` repeats the first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ErrorRes {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            errors: Vec::new(),
        }
    }

    pub fn from_validation(errors: &[ValidationError]) -> Self {
        let errors: Vec<String> = errors.iter().map(ToString::to_string).collect();
        Self {
            error: errors.first().cloned().unwrap_or_default(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::facility::parse_facilities_yaml;

    const DATA: &str = r#"
- id: 3c0e9a10-0000-4000-8000-000000000001
  name: Lakeside Clinic
  departments: [dermatology, internal medicine]
  city: Lakeside
  address: 4 Shore Lane
  phone: "555"
  mapUrl: https://maps.example/lakeside
  schedule:
    - { dayOfWeek: 0, closed: true }
    - { dayOfWeek: 1, morning: { start: "08:30", end: "12:00" } }
    - { dayOfWeek: 2, morning: { start: "08:30", end: "12:00" } }
    - { dayOfWeek: 3, morning: { start: "08:30", end: "12:00" } }
    - { dayOfWeek: 4, morning: { start: "08:30", end: "12:00" } }
    - { dayOfWeek: 5, morning: { start: "08:30", end: "12:00" } }
    - { dayOfWeek: 6, closed: true }
"#;

    #[test]
    fn facility_dto_uses_wire_tags_and_camel_case() {
        let facilities = parse_facilities_yaml(DATA).expect("parse");
        let list = FacilityListRes::from(facilities.as_slice());
        assert_eq!(list.count, 1);

        let json = serde_json::to_value(&list).expect("serialize");
        let hospital = &json["hospitals"][0];
        assert_eq!(hospital["departments"][0], "dermatology");
        assert_eq!(hospital["mapUrl"], "https://maps.example/lakeside");
        assert_eq!(hospital["schedule"][1]["dayOfWeek"], 1);
        assert_eq!(hospital["schedule"][1]["morning"]["start"], "08:30");
        assert!(hospital.get("website").is_none());
    }

    #[test]
    fn validation_error_body_repeats_first_message() {
        let body = ErrorRes::from_validation(&[
            ValidationError::MissingDuration,
            ValidationError::MissingMedicine,
        ]);
        assert_eq!(body.error, ValidationError::MissingDuration.to_string());
        assert_eq!(body.errors.len(), 2);
    }

    #[test]
    fn plain_error_body_omits_the_list() {
        let json = serde_json::to_string(&ErrorRes::new("search failed")).expect("serialize");
        assert_eq!(json, r#"{"error":"search failed"}"#);
    }

    #[test]
    fn catalog_lists_every_department() {
        let catalog = CatalogRes::current();
        assert_eq!(catalog.departments.len(), Department::ALL.len());
        assert!(catalog.lump_sizes.contains(&"1-3cm".to_string()));
    }
}
