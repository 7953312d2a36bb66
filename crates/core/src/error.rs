use serde::{Serialize, Serializer};

/// One missing or inconsistent questionnaire answer.
///
/// These are never fatal: the validator returns every failure so the caller can re-prompt for all
/// of them at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("select where the problem is")]
    MissingLocations,
    #[error("select since when it has been going on")]
    MissingDuration,
    #[error("select what the problem is like")]
    MissingSymptoms,
    #[error("select the size of the lump")]
    MissingLumpSize,
    #[error("lump size is only allowed when a lump or swelling is selected")]
    UnexpectedLumpSize,
    #[error("select any pre-existing conditions (including none)")]
    MissingConditions,
    #[error("\"none\" cannot be combined with other pre-existing conditions")]
    NoneConditionNotExclusive,
    #[error("select whether you are taking any medicine")]
    MissingMedicine,
}

impl Serialize for ValidationError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// The submitted payload does not have the questionnaire's shape at all.
///
/// Distinct from [`ValidationError`] so callers can tell "needs more answers" from "payload is
/// broken".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed input at {path}: {message}")]
pub struct MalformedInputError {
    pub path: String,
    pub message: String,
}

impl MalformedInputError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            path: if path.is_empty() { "<root>".into() } else { path },
            message: message.into(),
        }
    }

    /// Build from a `serde_path_to_error` failure, keeping the failing path.
    ///
    /// A failure at the document root has no segments and reports `<root>`.
    pub(crate) fn from_path_error<E: std::fmt::Display>(err: serde_path_to_error::Error<E>) -> Self {
        let path = if err.path().iter().next().is_none() {
            String::new()
        } else {
            err.path().to_string()
        };
        let source = err.into_inner();
        Self::new(path, source.to_string())
    }
}

/// Parse a JSON payload, reporting the failing path on error.
///
/// # Errors
///
/// Returns [`MalformedInputError`] for invalid JSON, trailing data, or a shape mismatch.
pub fn parse_json_slice<T: serde::de::DeserializeOwned>(
    bytes: &[u8],
) -> Result<T, MalformedInputError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let parsed = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(MalformedInputError::from_path_error)?;
    deserializer
        .end()
        .map_err(|e| MalformedInputError::new("", e.to_string()))?;
    Ok(parsed)
}

/// The facility store failed to answer a query.
///
/// The message is for logs only; end users see a generic failure.
#[derive(Debug, thiserror::Error)]
#[error("facility store failure: {message}")]
pub struct DependencyError {
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DependencyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// A tag outside its closed catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {catalog} tag: {tag:?}")]
pub struct UnknownTag {
    pub catalog: &'static str,
    pub tag: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error(transparent)]
    Malformed(#[from] MalformedInputError),
    #[error("questionnaire incomplete: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),
    #[error(transparent)]
    Dependency(#[from] DependencyError),
    #[error(transparent)]
    UnknownTag(#[from] UnknownTag),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid facility data: {0}")]
    FacilityData(String),
    #[error("invalid triage rules: {0}")]
    RulesFile(String),
    #[error("failed to read file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write file: {0}")]
    FileWrite(std::io::Error),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type TriageResult<T> = std::result::Result<T, TriageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_input_defaults_to_root_path() {
        let err = MalformedInputError::new("", "expected a map");
        assert_eq!(err.path, "<root>");
        assert_eq!(err.to_string(), "malformed input at <root>: expected a map");
    }

    #[derive(Debug, serde::Deserialize)]
    #[allow(dead_code)]
    struct Pair {
        left: u32,
        right: u32,
    }

    #[test]
    fn root_failures_report_root_path() {
        let err = parse_json_slice::<Pair>(b"\"text\"").expect_err("not an object");
        assert_eq!(err.path, "<root>");

        let err = parse_json_slice::<Pair>(b"{\"left\": 1, \"right\": 2} extra")
            .expect_err("trailing data");
        assert_eq!(err.path, "<root>");
    }

    #[test]
    fn nested_failures_report_field_path() {
        let err = parse_json_slice::<Pair>(b"{\"left\": 1, \"right\": \"two\"}")
            .expect_err("wrong type");
        assert_eq!(err.path, "right");
        assert!(!err.message.contains("malformed input"));
    }

    #[test]
    fn validation_errors_serialize_as_messages() {
        let json = serde_json::to_string(&vec![ValidationError::MissingDuration])
            .expect("serialize");
        assert_eq!(json, "[\"select since when it has been going on\"]");
    }

    #[test]
    fn validation_variant_lists_every_message() {
        let err = TriageError::Validation(vec![
            ValidationError::MissingSymptoms,
            ValidationError::MissingMedicine,
        ]);
        let text = err.to_string();
        assert!(text.contains("what the problem is like"));
        assert!(text.contains("taking any medicine"));
    }
}
