//! Facility store port.
//!
//! The engines never fetch facilities themselves; [`crate::service::TriageService`] asks a
//! [`FacilityStore`] and hands the materialised list to the search engine.

use crate::catalog::Department;
use crate::error::{DependencyError, TriageError, TriageResult};
use crate::facility::{parse_facilities_yaml, Facility};
use std::path::Path;
use uuid::Uuid;

/// Predicates a store may push down. The engine re-applies all of them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FacilityQuery {
    pub departments: Vec<Department>,
    pub cities: Vec<String>,
    pub keyword: Option<String>,
}

pub trait FacilityStore: Send + Sync {
    /// Candidate facilities for a query, in name order.
    fn find_facilities(&self, query: &FacilityQuery) -> Result<Vec<Facility>, DependencyError>;

    fn get_facility(&self, id: Uuid) -> Result<Option<Facility>, DependencyError>;
}

/// Facilities held in memory, usually loaded from the YAML data file at startup.
#[derive(Clone, Debug, Default)]
pub struct InMemoryFacilityStore {
    facilities: Vec<Facility>,
}

impl InMemoryFacilityStore {
    pub fn new(mut facilities: Vec<Facility>) -> Self {
        facilities.sort_by(|a, b| a.name.cmp(&b.name));
        Self { facilities }
    }

    /// Load the store from a facility data file.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::FileRead`] if the file cannot be read, or
    /// [`TriageError::FacilityData`] if its contents are invalid.
    pub fn from_yaml_file(path: &Path) -> TriageResult<Self> {
        let text = std::fs::read_to_string(path).map_err(TriageError::FileRead)?;
        let facilities = parse_facilities_yaml(&text)?;
        tracing::info!(
            "loaded {} facilities from {}",
            facilities.len(),
            path.display()
        );
        Ok(Self::new(facilities))
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }
}

impl FacilityStore for InMemoryFacilityStore {
    fn find_facilities(&self, query: &FacilityQuery) -> Result<Vec<Facility>, DependencyError> {
        Ok(self
            .facilities
            .iter()
            .filter(|f| query.departments.is_empty() || f.match_count(&query.departments) > 0)
            .filter(|f| {
                query.cities.is_empty() || query.cities.iter().any(|c| c.trim() == f.city)
            })
            .cloned()
            .collect())
    }

    fn get_facility(&self, id: Uuid) -> Result<Option<Facility>, DependencyError> {
        Ok(self.facilities.iter().find(|f| f.id == id).cloned())
    }
}
