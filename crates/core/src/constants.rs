//! Constants used throughout the triage core crate.

use crate::catalog::Department;

/// Department that leads the recommendation whenever an emergency symptom is present.
pub const PRIMARY_CARE: Department = Department::InternalMedicine;

/// Department injected when a skin-related symptom is present.
pub const SKIN_DEPARTMENT: Department = Department::Dermatology;

/// Departments returned for a location the rule table does not map.
pub const UNMAPPED_LOCATION_DEPARTMENTS: &[Department] = &[Department::InternalMedicine];

/// Default facility data file, relative to the working directory or a workspace ancestor.
pub const DEFAULT_FACILITY_DATA_FILE: &str = "data/facilities.yaml";

/// Default file used by the CLI to keep an in-progress questionnaire.
pub const DEFAULT_DRAFT_FILE: &str = ".triage-draft.json";

/// Number of day slots in a weekly schedule.
pub const DAYS_PER_WEEK: usize = 7;
