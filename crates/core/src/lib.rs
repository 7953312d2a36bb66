//! # Triage Core
//!
//! Core logic for symptom intake and facility triage.
//!
//! This crate contains the pure engines and the ports they are fed through:
//! - intake validation of the symptom questionnaire
//! - department recommendation from body locations and symptoms
//! - the clinician-facing narrative summary
//! - facility search and ranking over a [`store::FacilityStore`]
//!
//! **No API concerns**: HTTP servers, DTOs and the command line belong in `api-rest`,
//! `api-shared` and `cli`.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod draft;
pub mod error;
pub mod facility;
pub mod narrative;
pub mod questionnaire;
pub mod rules;
pub mod search;
pub mod service;
pub mod store;
pub mod validation;

pub use catalog::{Condition, Department, Duration, Location, LumpSize, Medicine, Symptom};
pub use config::CoreConfig;
pub use draft::{DraftStore, FileDraftStore, InMemoryDraftStore};
pub use error::{
    DependencyError, MalformedInputError, TriageError, TriageResult, UnknownTag, ValidationError,
};
pub use facility::{DaySchedule, Facility, TimeRange, WeeklySchedule};
pub use narrative::describe;
pub use questionnaire::{Questionnaire, ValidatedQuestionnaire};
pub use rules::{recommend, TriageRules};
pub use search::{search, SearchCriteria};
pub use service::{Assessment, TriageService};
pub use store::{FacilityQuery, FacilityStore, InMemoryFacilityStore};
pub use validation::validate;
pub use triage_types::NonEmptyText;
