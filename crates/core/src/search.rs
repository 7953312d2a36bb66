//! Facility search and ranking.
//!
//! Filtering is conjunctive: department overlap, city membership and a case-insensitive name
//! keyword. Ranking only happens when departments were requested, and is stable so callers can
//! pre-sort candidates (the store returns name order).

use crate::catalog::Department;
use crate::facility::Facility;
use std::cmp::Ordering;

/// Search predicates. Empty lists and a blank keyword mean "no filter".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Requested departments, highest priority first.
    pub departments: Vec<Department>,
    pub cities: Vec<String>,
    pub keyword: Option<String>,
}

impl SearchCriteria {
    pub fn for_departments(departments: Vec<Department>) -> Self {
        Self {
            departments,
            ..Self::default()
        }
    }

    /// The keyword, trimmed, if it holds anything.
    pub fn keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn matches(&self, facility: &Facility) -> bool {
        let department_ok =
            self.departments.is_empty() || facility.match_count(&self.departments) > 0;
        let city_ok = self.cities.is_empty()
            || self
                .cities
                .iter()
                .any(|city| city.trim() == facility.city.as_str());
        let keyword_ok = self
            .keyword()
            .is_none_or(|keyword| facility.name.contains_ignore_case(keyword));

        department_ok && city_ok && keyword_ok
    }
}

/// Filter then rank `facilities` against `criteria`.
pub fn search(facilities: Vec<Facility>, criteria: &SearchCriteria) -> Vec<Facility> {
    let mut found: Vec<Facility> = facilities
        .into_iter()
        .filter(|facility| criteria.matches(facility))
        .collect();

    if !criteria.departments.is_empty() {
        rank(&mut found, &criteria.departments);
    }

    found
}

/// Stable sort: more matching departments first, then holders of the top requested department.
pub fn rank(facilities: &mut [Facility], requested: &[Department]) {
    let Some(&top) = requested.first() else {
        return;
    };

    facilities.sort_by(|a, b| {
        b.match_count(requested)
            .cmp(&a.match_count(requested))
            .then_with(|| match (a.offers(top), b.offers(top)) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => Ordering::Equal,
            })
    });
}
