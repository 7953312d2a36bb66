//! Triage orchestration.
//!
//! [`TriageService`] is the only place that talks to the facility store. Each call runs the
//! pure engines in turn: validate, recommend, describe, then search.

use crate::catalog::{Department, Location, Symptom};
use crate::error::{TriageError, TriageResult};
use crate::facility::Facility;
use crate::narrative;
use crate::questionnaire::Questionnaire;
use crate::rules::TriageRules;
use crate::search::{self, SearchCriteria};
use crate::store::{FacilityQuery, FacilityStore};
use std::sync::Arc;
use uuid::Uuid;

/// Result of a full intake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assessment {
    pub departments: Vec<Department>,
    pub description: String,
    pub facilities: Vec<Facility>,
}

pub struct TriageService<S: ?Sized> {
    store: Arc<S>,
    rules: Arc<TriageRules>,
}

impl<S: ?Sized> Clone for TriageService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            rules: Arc::clone(&self.rules),
        }
    }
}

impl<S: FacilityStore + ?Sized> TriageService<S> {
    pub fn new(store: Arc<S>, rules: Arc<TriageRules>) -> Self {
        Self { store, rules }
    }

    /// Service over the built-in rule table.
    pub fn with_builtin_rules(store: Arc<S>) -> Self {
        Self::new(store, Arc::new(TriageRules::builtin()))
    }

    pub fn rules(&self) -> &TriageRules {
        &self.rules
    }

    pub fn recommend(&self, locations: &[Location], symptoms: &[Symptom]) -> Vec<Department> {
        self.rules.recommend(locations, symptoms)
    }

    /// Validate and render the clinician summary.
    pub fn describe(&self, questionnaire: &Questionnaire) -> TriageResult<String> {
        let validated = questionnaire
            .clone()
            .into_validated()
            .map_err(TriageError::Validation)?;
        Ok(narrative::describe(&validated))
    }

    /// Fetch candidates from the store, then filter and rank them.
    ///
    /// # Errors
    ///
    /// Store failures are logged in full and returned as [`TriageError::Dependency`]; no partial
    /// result is produced.
    pub fn search(&self, criteria: &SearchCriteria) -> TriageResult<Vec<Facility>> {
        let query = FacilityQuery {
            departments: criteria.departments.clone(),
            cities: criteria.cities.clone(),
            keyword: criteria.keyword().map(str::to_string),
        };

        let candidates = self.store.find_facilities(&query).map_err(|e| {
            tracing::error!("facility search failed: {:?}", e);
            TriageError::Dependency(e)
        })?;

        let found = search::search(candidates, criteria);
        tracing::info!(
            "search for {} department(s) returned {} facilities",
            criteria.departments.len(),
            found.len()
        );
        Ok(found)
    }

    /// Run the whole intake: validate, recommend, describe and search.
    pub fn assess(&self, questionnaire: &Questionnaire) -> TriageResult<Assessment> {
        let validated = questionnaire.clone().into_validated().map_err(|errors| {
            tracing::warn!("rejected questionnaire with {} problem(s)", errors.len());
            TriageError::Validation(errors)
        })?;

        let departments = self
            .rules
            .recommend(validated.locations(), validated.symptoms());
        let description = narrative::describe(&validated);
        let facilities = self.search(&SearchCriteria::for_departments(departments.clone()))?;

        Ok(Assessment {
            departments,
            description,
            facilities,
        })
    }

    /// Every facility, in name order.
    pub fn list_facilities(&self) -> TriageResult<Vec<Facility>> {
        self.search(&SearchCriteria::default())
    }

    pub fn get_facility(&self, id: Uuid) -> TriageResult<Option<Facility>> {
        self.store.get_facility(id).map_err(|e| {
            tracing::error!("facility lookup failed for {}: {:?}", id, e);
            TriageError::Dependency(e)
        })
    }
}
