//! Facility records.
//!
//! Facilities are read-only inputs supplied by the facility store. This module defines the
//! domain type and the strict YAML wire model used to load them.
//!
//! Invariants enforced on load:
//! - `departments` is never empty and holds each department once
//! - a weekly schedule, when present, has exactly seven days in order (0 = Sunday)
//! - every opening window ends after it starts
//! - facility ids are unique within one data file

use crate::catalog::Department;
use crate::constants::DAYS_PER_WEEK;
use crate::error::{MalformedInputError, TriageError, TriageResult};
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use triage_types::NonEmptyText;
use uuid::Uuid;

const TIME_FORMAT: &str = "%H:%M";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Facility {
    pub id: Uuid,
    pub name: NonEmptyText,
    pub departments: Vec<Department>,
    pub city: String,
    pub address: String,
    pub phone: String,
    pub hours: Option<String>,
    pub map_url: Option<String>,
    pub website: Option<String>,
    pub note: Option<String>,
    pub schedule: Option<WeeklySchedule>,
}

impl Facility {
    pub fn offers(&self, department: Department) -> bool {
        self.departments.contains(&department)
    }

    /// Number of this facility's departments that appear in `requested`.
    pub fn match_count(&self, requested: &[Department]) -> usize {
        self.departments
            .iter()
            .filter(|d| requested.contains(d))
            .count()
    }
}

/// Opening window within one day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> TriageResult<Self> {
        if start >= end {
            return Err(TriageError::FacilityData(format!(
                "opening window {} - {} ends before it starts",
                start.format(TIME_FORMAT),
                end.format(TIME_FORMAT)
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time < self.end
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format(TIME_FORMAT),
            self.end.format(TIME_FORMAT)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaySchedule {
    /// 0 = Sunday ... 6 = Saturday.
    pub day_of_week: u8,
    pub closed: bool,
    pub morning: Option<TimeRange>,
    pub afternoon: Option<TimeRange>,
    pub note: Option<String>,
}

impl DaySchedule {
    pub fn weekday(&self) -> Weekday {
        weekday_from_sunday_index(self.day_of_week)
    }

    pub fn is_open_at(&self, time: NaiveTime) -> bool {
        !self.closed
            && [self.morning, self.afternoon]
                .iter()
                .flatten()
                .any(|window| window.contains(time))
    }
}

/// Seven day slots, Sunday first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: Vec<DaySchedule>,
}

impl WeeklySchedule {
    pub fn new(days: Vec<DaySchedule>) -> TriageResult<Self> {
        if days.len() != DAYS_PER_WEEK {
            return Err(TriageError::FacilityData(format!(
                "schedule must have {DAYS_PER_WEEK} days, got {}",
                days.len()
            )));
        }
        for (index, day) in days.iter().enumerate() {
            if usize::from(day.day_of_week) != index {
                return Err(TriageError::FacilityData(format!(
                    "schedule day {index} has dayOfWeek {}",
                    day.day_of_week
                )));
            }
        }
        Ok(Self { days })
    }

    pub fn days(&self) -> &[DaySchedule] {
        &self.days
    }

    pub fn for_weekday(&self, weekday: Weekday) -> &DaySchedule {
        &self.days[weekday.num_days_from_sunday() as usize]
    }
}

fn weekday_from_sunday_index(index: u8) -> Weekday {
    match index % 7 {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct FacilityWire {
    id: Uuid,
    name: String,
    departments: Vec<Department>,
    city: String,
    address: String,
    phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    map_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schedule: Option<Vec<DayScheduleWire>>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct DayScheduleWire {
    day_of_week: u8,
    #[serde(default)]
    closed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    morning: Option<TimeRangeWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    afternoon: Option<TimeRangeWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct TimeRangeWire {
    start: String,
    end: String,
}

fn parse_time(value: &str) -> TriageResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|e| TriageError::FacilityData(format!("invalid time '{value}': {e}")))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<TimeRangeWire> for TimeRange {
    type Error = TriageError;

    fn try_from(wire: TimeRangeWire) -> Result<Self, Self::Error> {
        TimeRange::new(parse_time(&wire.start)?, parse_time(&wire.end)?)
    }
}

impl TryFrom<FacilityWire> for Facility {
    type Error = TriageError;

    fn try_from(wire: FacilityWire) -> Result<Self, Self::Error> {
        let name = NonEmptyText::new(&wire.name).map_err(|_| {
            TriageError::FacilityData(format!("facility {} has an empty name", wire.id))
        })?;

        let mut departments: Vec<Department> = Vec::with_capacity(wire.departments.len());
        for department in wire.departments {
            if !departments.contains(&department) {
                departments.push(department);
            }
        }
        if departments.is_empty() {
            return Err(TriageError::FacilityData(format!(
                "facility '{name}' has no departments"
            )));
        }

        let schedule = wire
            .schedule
            .map(|days| {
                let days = days
                    .into_iter()
                    .map(|day| {
                        Ok(DaySchedule {
                            day_of_week: day.day_of_week,
                            closed: day.closed,
                            morning: day.morning.map(TimeRange::try_from).transpose()?,
                            afternoon: day.afternoon.map(TimeRange::try_from).transpose()?,
                            note: non_blank(day.note),
                        })
                    })
                    .collect::<TriageResult<Vec<_>>>()?;
                WeeklySchedule::new(days)
            })
            .transpose()
            .map_err(|e| match e {
                TriageError::FacilityData(msg) => {
                    TriageError::FacilityData(format!("facility '{name}': {msg}"))
                }
                other => other,
            })?;

        Ok(Facility {
            id: wire.id,
            name,
            departments,
            city: wire.city.trim().to_string(),
            address: wire.address,
            phone: wire.phone,
            hours: non_blank(wire.hours),
            map_url: non_blank(wire.map_url),
            website: non_blank(wire.website),
            note: non_blank(wire.note),
            schedule,
        })
    }
}

impl From<&Facility> for FacilityWire {
    fn from(facility: &Facility) -> Self {
        let range = |r: &TimeRange| TimeRangeWire {
            start: r.start.format(TIME_FORMAT).to_string(),
            end: r.end.format(TIME_FORMAT).to_string(),
        };
        FacilityWire {
            id: facility.id,
            name: facility.name.to_string(),
            departments: facility.departments.clone(),
            city: facility.city.clone(),
            address: facility.address.clone(),
            phone: facility.phone.clone(),
            hours: facility.hours.clone(),
            map_url: facility.map_url.clone(),
            website: facility.website.clone(),
            note: facility.note.clone(),
            schedule: facility.schedule.as_ref().map(|s| {
                s.days()
                    .iter()
                    .map(|d| DayScheduleWire {
                        day_of_week: d.day_of_week,
                        closed: d.closed,
                        morning: d.morning.as_ref().map(range),
                        afternoon: d.afternoon.as_ref().map(range),
                        note: d.note.clone(),
                    })
                    .collect()
            }),
        }
    }
}

/// Parse a YAML list of facility records.
///
/// Uses `serde_path_to_error` so schema problems report the failing record
/// (e.g. `[3].departments[0]`).
///
/// # Errors
///
/// Returns [`TriageError::FacilityData`] if:
/// - the YAML does not match the facility schema,
/// - a record breaks one of the module invariants,
/// - two records share an id.
pub fn parse_facilities_yaml(yaml_text: &str) -> TriageResult<Vec<Facility>> {
    let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
    let wire: Vec<FacilityWire> = serde_path_to_error::deserialize(deserializer).map_err(|e| {
        TriageError::FacilityData(MalformedInputError::from_path_error(e).to_string())
    })?;

    let mut seen = HashSet::new();
    let mut facilities = Vec::with_capacity(wire.len());
    for record in wire {
        if !seen.insert(record.id) {
            return Err(TriageError::FacilityData(format!(
                "duplicate facility id {}",
                record.id
            )));
        }
        facilities.push(Facility::try_from(record)?);
    }

    Ok(facilities)
}

/// Render facilities back to the YAML data-file format.
pub fn render_facilities_yaml(facilities: &[Facility]) -> TriageResult<String> {
    let wire: Vec<FacilityWire> = facilities.iter().map(FacilityWire::from).collect();
    serde_yaml::to_string(&wire)
        .map_err(|e| TriageError::FacilityData(format!("failed to serialise facilities: {e}")))
}
