//! Department recommendation rules.
//!
//! A [`TriageRules`] value holds the location-to-department table and the emergency and skin
//! symptom sets. It is built once (either the built-in table or a YAML rules file) and never
//! mutated afterwards; recommending is a pure function over it.

use crate::catalog::{Department, Location, Symptom};
use crate::constants::{PRIMARY_CARE, SKIN_DEPARTMENT, UNMAPPED_LOCATION_DEPARTMENTS};
use crate::error::{MalformedInputError, TriageError, TriageResult};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageRules {
    locations: BTreeMap<Location, Vec<Department>>,
    emergency_symptoms: BTreeSet<Symptom>,
    skin_symptoms: BTreeSet<Symptom>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TriageRulesWire {
    locations: BTreeMap<Location, Vec<Department>>,
    emergency_symptoms: Vec<Symptom>,
    skin_symptoms: Vec<Symptom>,
}

impl TriageRules {
    /// Build a rule set, rejecting any location mapped to an empty list.
    ///
    /// Repeated departments within one location's list collapse to their first occurrence.
    pub fn new(
        locations: BTreeMap<Location, Vec<Department>>,
        emergency_symptoms: impl IntoIterator<Item = Symptom>,
        skin_symptoms: impl IntoIterator<Item = Symptom>,
    ) -> TriageResult<Self> {
        let mut table = BTreeMap::new();
        for (location, departments) in locations {
            if departments.is_empty() {
                return Err(TriageError::RulesFile(format!(
                    "location '{location}' maps to an empty department list"
                )));
            }
            table.insert(location, dedup_preserving_order(departments));
        }

        Ok(Self {
            locations: table,
            emergency_symptoms: emergency_symptoms.into_iter().collect(),
            skin_symptoms: skin_symptoms.into_iter().collect(),
        })
    }

    /// The rule table shipped with the service.
    pub fn builtin() -> Self {
        use Department::*;

        let locations = BTreeMap::from([
            (Location::Throat, vec![Ent, InternalMedicine]),
            (
                Location::Chest,
                vec![InternalMedicine, Cardiology, RespiratoryMedicine],
            ),
            (
                Location::Abdomen,
                vec![InternalMedicine, Gastroenterology, Surgery],
            ),
            (Location::Leg, vec![Orthopedics, InternalMedicine]),
            (Location::Arm, vec![Orthopedics, InternalMedicine]),
            (Location::Head, vec![InternalMedicine, Neurosurgery, Neurology]),
            (Location::Face, vec![Dermatology, Ent, InternalMedicine]),
            (Location::Back, vec![Orthopedics, InternalMedicine]),
            (Location::LowerBack, vec![Orthopedics, InternalMedicine]),
            (Location::Other, vec![InternalMedicine]),
        ]);

        Self {
            locations,
            emergency_symptoms: BTreeSet::from([
                Symptom::ShortOfBreath,
                Symptom::Fever,
                Symptom::Dizziness,
            ]),
            skin_symptoms: BTreeSet::from([
                Symptom::Itchy,
                Symptom::RedSwollen,
                Symptom::LumpSwelling,
            ]),
        }
    }

    /// Process-wide read-only copy of [`TriageRules::builtin`].
    pub fn shared() -> &'static TriageRules {
        static BUILTIN: OnceLock<TriageRules> = OnceLock::new();
        BUILTIN.get_or_init(TriageRules::builtin)
    }

    /// Parse a rule set from YAML text.
    ///
    /// Uses `serde_path_to_error` so a bad tag is reported with its location
    /// (e.g. `locations.throat[1]`).
    pub fn from_yaml_str(yaml_text: &str) -> TriageResult<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
        let wire: TriageRulesWire = serde_path_to_error::deserialize(deserializer)
            .map_err(|e| TriageError::RulesFile(MalformedInputError::from_path_error(e).to_string()))?;

        Self::new(wire.locations, wire.emergency_symptoms, wire.skin_symptoms)
    }

    /// Read and parse a YAML rules file.
    pub fn load(path: &Path) -> TriageResult<Self> {
        let text = std::fs::read_to_string(path).map_err(TriageError::FileRead)?;
        let rules = Self::from_yaml_str(&text)?;
        tracing::info!(
            "loaded triage rules from {} ({} locations)",
            path.display(),
            rules.locations.len()
        );
        Ok(rules)
    }

    /// Priority-ordered base departments for one location.
    ///
    /// Locations missing from the table fall back to internal medicine.
    pub fn base_departments(&self, location: Location) -> &[Department] {
        self.locations
            .get(&location)
            .map(Vec::as_slice)
            .unwrap_or(UNMAPPED_LOCATION_DEPARTMENTS)
    }

    pub fn is_emergency(&self, symptoms: &[Symptom]) -> bool {
        symptoms.iter().any(|s| self.emergency_symptoms.contains(s))
    }

    pub fn has_skin_symptom(&self, symptoms: &[Symptom]) -> bool {
        symptoms.iter().any(|s| self.skin_symptoms.contains(s))
    }

    pub fn emergency_symptoms(&self) -> impl Iterator<Item = Symptom> + '_ {
        self.emergency_symptoms.iter().copied()
    }

    pub fn skin_symptoms(&self) -> impl Iterator<Item = Symptom> + '_ {
        self.skin_symptoms.iter().copied()
    }

    /// Recommend departments for a set of locations and symptoms.
    ///
    /// 1. Union the base lists of every location, keeping first-seen order.
    /// 2. An emergency symptom moves (or inserts) internal medicine to the front.
    /// 3. A skin symptom adds dermatology right after internal medicine, or at the end when
    ///    internal medicine is absent. A dermatology entry already present is left where it is.
    ///
    /// The result never contains a department twice.
    pub fn recommend(&self, locations: &[Location], symptoms: &[Symptom]) -> Vec<Department> {
        let mut departments: Vec<Department> = Vec::new();
        for location in locations {
            for department in self.base_departments(*location) {
                if !departments.contains(department) {
                    departments.push(*department);
                }
            }
        }

        if self.is_emergency(symptoms) {
            departments.retain(|d| *d != PRIMARY_CARE);
            departments.insert(0, PRIMARY_CARE);
        }

        if self.has_skin_symptom(symptoms) && !departments.contains(&SKIN_DEPARTMENT) {
            match departments.iter().position(|d| *d == PRIMARY_CARE) {
                Some(index) => departments.insert(index + 1, SKIN_DEPARTMENT),
                None => departments.push(SKIN_DEPARTMENT),
            }
        }

        dedup_preserving_order(departments)
    }
}

impl Default for TriageRules {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Recommend departments using the built-in rules.
///
/// Single-location callers pass a one-element slice.
pub fn recommend(locations: &[Location], symptoms: &[Symptom]) -> Vec<Department> {
    TriageRules::shared().recommend(locations, symptoms)
}

fn dedup_preserving_order(departments: Vec<Department>) -> Vec<Department> {
    let mut seen = BTreeSet::new();
    departments
        .into_iter()
        .filter(|d| seen.insert(*d))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Department::*;

    fn has_duplicates(departments: &[Department]) -> bool {
        let unique: BTreeSet<_> = departments.iter().collect();
        unique.len() != departments.len()
    }

    #[test]
    fn every_catalog_location_maps_to_a_non_empty_list() {
        let rules = TriageRules::builtin();
        for location in Location::ALL {
            let base = rules.base_departments(*location);
            assert!(!base.is_empty(), "{location} has no departments");
            assert!(Department::ALL.contains(&base[0]));
        }
    }

    #[test]
    fn fever_in_throat_moves_internal_medicine_first() {
        assert_eq!(
            recommend(&[Location::Throat], &[Symptom::Fever]),
            vec![InternalMedicine, Ent]
        );
    }

    #[test]
    fn empty_symptoms_return_the_base_order() {
        assert_eq!(recommend(&[Location::Throat], &[]), vec![Ent, InternalMedicine]);
        assert_eq!(recommend(&[Location::Face], &[]), vec![Dermatology, Ent, InternalMedicine]);
    }

    #[test]
    fn emergency_inserts_internal_medicine_when_absent() {
        let mut locations = BTreeMap::new();
        locations.insert(Location::Leg, vec![Orthopedics]);
        let rules =
            TriageRules::new(locations, [Symptom::Dizziness], [Symptom::Itchy]).expect("valid");

        assert_eq!(
            rules.recommend(&[Location::Leg], &[Symptom::Dizziness]),
            vec![InternalMedicine, Orthopedics]
        );
    }

    #[test]
    fn skin_symptom_goes_after_internal_medicine() {
        assert_eq!(
            recommend(&[Location::Leg], &[Symptom::Itchy]),
            vec![Orthopedics, InternalMedicine, Dermatology]
        );
        assert_eq!(
            recommend(&[Location::Chest], &[Symptom::RedSwollen]),
            vec![InternalMedicine, Dermatology, Cardiology, RespiratoryMedicine]
        );
    }

    #[test]
    fn skin_symptom_appends_when_internal_medicine_is_absent() {
        let mut locations = BTreeMap::new();
        locations.insert(Location::Arm, vec![Orthopedics, Surgery]);
        let rules = TriageRules::new(locations, [], [Symptom::LumpSwelling]).expect("valid");

        assert_eq!(
            rules.recommend(&[Location::Arm], &[Symptom::LumpSwelling]),
            vec![Orthopedics, Surgery, Dermatology]
        );
    }

    #[test]
    fn existing_dermatology_is_not_moved() {
        assert_eq!(
            recommend(&[Location::Face], &[Symptom::Itchy]),
            vec![Dermatology, Ent, InternalMedicine]
        );
        assert_eq!(
            recommend(&[Location::Face], &[Symptom::Itchy, Symptom::Fever]),
            vec![InternalMedicine, Dermatology, Ent]
        );
    }

    #[test]
    fn multiple_locations_union_in_first_seen_order() {
        let departments = recommend(&[Location::Throat, Location::Abdomen], &[Symptom::Pain]);
        assert_eq!(
            departments,
            vec![Ent, InternalMedicine, Gastroenterology, Surgery]
        );

        for location in [Location::Throat, Location::Abdomen] {
            for department in recommend(&[location], &[Symptom::Pain]) {
                assert!(departments.contains(&department));
            }
        }
    }

    #[test]
    fn invariants_hold_for_every_location_and_symptom_pair() {
        let rules = TriageRules::builtin();
        for location in Location::ALL {
            for symptom in Symptom::ALL {
                let symptoms = [*symptom];
                let first = rules.recommend(&[*location], &symptoms);
                let second = rules.recommend(&[*location], &symptoms);
                assert_eq!(first, second, "not deterministic for {location}/{symptom}");
                assert!(!has_duplicates(&first), "duplicates for {location}/{symptom}");

                if rules.is_emergency(&symptoms) {
                    assert_eq!(first[0], InternalMedicine);
                }

                if rules.has_skin_symptom(&symptoms) {
                    let count = first.iter().filter(|d| **d == Dermatology).count();
                    assert_eq!(count, 1);
                    let base = rules.base_departments(*location);
                    if !base.contains(&Dermatology) {
                        let derm = first.iter().position(|d| *d == Dermatology);
                        match first.iter().position(|d| *d == InternalMedicine) {
                            Some(im) => assert_eq!(derm, Some(im + 1)),
                            None => assert_eq!(derm, Some(first.len() - 1)),
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn several_locations_with_emergency_and_skin_symptoms() {
        let rules = TriageRules::builtin();
        let locations = [Location::Leg, Location::Throat];
        let symptoms = [Symptom::Fever, Symptom::Itchy];

        let departments = rules.recommend(&locations, &symptoms);
        assert_eq!(
            departments,
            vec![InternalMedicine, Dermatology, Orthopedics, Ent]
        );
        assert_eq!(departments, rules.recommend(&locations, &symptoms));

        for location in Location::ALL {
            for other in Location::ALL {
                let pair = [*location, *other];
                let result = rules.recommend(&pair, &symptoms);
                assert!(!has_duplicates(&result), "duplicates for {location}+{other}");
                assert_eq!(result[0], InternalMedicine);
                for department in rules
                    .base_departments(*location)
                    .iter()
                    .chain(rules.base_departments(*other))
                {
                    assert!(result.contains(department), "{department} dropped");
                }
            }
        }
    }

    #[test]
    fn rules_file_without_a_location_falls_back_to_internal_medicine() {
        let rules = TriageRules::from_yaml_str(
            "locations:\n  throat: [ENT]\nemergency_symptoms: [fever]\nskin_symptoms: [itchy]\n",
        )
        .expect("valid rules");

        assert_eq!(rules.base_departments(Location::Throat), &[Ent]);
        assert_eq!(rules.base_departments(Location::Chest), &[InternalMedicine]);
        assert_eq!(
            rules.recommend(&[Location::Chest, Location::Throat], &[]),
            vec![InternalMedicine, Ent]
        );
    }

    #[test]
    fn rules_file_reports_unknown_tag_path() {
        let err = TriageRules::from_yaml_str(
            "locations:\n  throat: [ENT, podiatry]\nemergency_symptoms: []\nskin_symptoms: []\n",
        )
        .expect_err("unknown department");
        assert!(
            matches!(err, TriageError::RulesFile(ref msg)
                if msg.contains("locations") && msg.contains("podiatry")),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn rules_file_rejects_empty_department_list() {
        let err = TriageRules::from_yaml_str(
            "locations:\n  head: []\nemergency_symptoms: []\nskin_symptoms: []\n",
        )
        .expect_err("empty list");
        assert!(matches!(err, TriageError::RulesFile(msg) if msg.contains("head")));
    }

    #[test]
    fn load_reads_rules_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rules.yaml");
        std::fs::write(
            &path,
            "locations:\n  face: [dermatology]\nemergency_symptoms: [dizziness]\nskin_symptoms: []\n",
        )
        .expect("write rules");

        let rules = TriageRules::load(&path).expect("load");
        assert_eq!(
            rules.recommend(&[Location::Face], &[Symptom::Dizziness]),
            vec![InternalMedicine, Dermatology]
        );
    }

    #[test]
    fn shipped_rules_file_matches_the_builtin_table() {
        let text = include_str!("../../../data/triage-rules.yaml");
        assert_eq!(
            TriageRules::from_yaml_str(text).expect("parse"),
            TriageRules::builtin()
        );
    }
}
