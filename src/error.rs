use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Failure classification. Every [`FieldError`] message starts with the
/// kind's [`prefix`](FailureKind::prefix), which callers may key off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Required,
    Invalid,
    Type,
    Min,
    Max,
    NotBefore,
    NotAfter,
    NoEmpty,
    NotRegistered,
    Config,
}

impl FailureKind {
    pub fn prefix(self) -> &'static str {
        match self {
            FailureKind::Required => "required",
            FailureKind::Invalid => "invalid",
            FailureKind::Type => "type",
            FailureKind::Min => "min",
            FailureKind::Max => "max",
            FailureKind::NotBefore => "not before",
            FailureKind::NotAfter => "not after",
            FailureKind::NoEmpty => "no empty",
            FailureKind::NotRegistered => "not registered",
            FailureKind::Config => "config",
        }
    }
}

/// A single constraint violation recorded against one field path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct FieldError {
    pub kind: FailureKind,
    pub message: String,
}

impl FieldError {
    /// Builds an error whose message is `"<prefix>: <detail>"`.
    pub fn new(kind: FailureKind, detail: impl fmt::Display) -> Self {
        FieldError {
            kind,
            message: format!("{}: {}", kind.prefix(), detail),
        }
    }

    pub fn required(detail: impl fmt::Display) -> Self {
        Self::new(FailureKind::Required, detail)
    }

    pub fn invalid(detail: impl fmt::Display) -> Self {
        Self::new(FailureKind::Invalid, detail)
    }

    pub fn config(detail: impl fmt::Display) -> Self {
        Self::new(FailureKind::Config, detail)
    }

    /// `type: the value of <field> is of type <type_name> which is not valid`
    pub fn unsupported_type(field_name: &str, type_name: &str) -> Self {
        Self::new(
            FailureKind::Type,
            format!("the value of {field_name} is of type {type_name} which is not valid"),
        )
    }

    /// Error for an instruction naming a checker absent from the registry.
    pub fn not_registered(checker_name: &str) -> Self {
        FieldError {
            kind: FailureKind::NotRegistered,
            message: format!("Validator of type {checker_name} is not registered."),
        }
    }

    /// Error for a required pointer-like field holding no value.
    pub fn required_nil(field_name: &str) -> Self {
        Self::required(format!("field {field_name} was nil but is required"))
    }

    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.message.starts_with(prefix)
    }
}

/// Errors grouped by field path. Ordered so reports render deterministically.
pub type ErrorMap = BTreeMap<String, Vec<FieldError>>;

/// The aggregate result of a failed validation: every violation found, keyed
/// by field path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    pub errors: ErrorMap,
}

impl ValidationError {
    pub fn new(errors: ErrorMap) -> Self {
        ValidationError {
            data_type: None,
            errors,
        }
    }

    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    /// Errors recorded under `path`, or an empty slice.
    pub fn field(&self, path: &str) -> &[FieldError] {
        self.errors.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.errors.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// Total number of individual failures across all paths.
    pub fn len(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.data_type.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => "value",
        };
        write!(f, "{} validation failed:", label)?;
        for (path, errors) in &self.errors {
            write!(f, "\t{}: ", path)?;
            for (i, error) in errors.iter().enumerate() {
                if i > 0 {
                    write!(f, "; ")?;
                }
                write!(f, "{}", error)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Outcome of the ad-hoc [`validate_unit`](crate::Engine::validate_unit)
/// entry point.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UnitError {
    /// Precondition failure: nothing was handed to the engine.
    #[error("no unit provided")]
    NoUnit,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl UnitError {
    /// The aggregate report, when validation ran and found violations.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            UnitError::Invalid(e) => Some(e),
            UnitError::NoUnit => None,
        }
    }
}

/// Failure reported by an [`MxResolver`](crate::checkers::email::MxResolver).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct MxLookupError {
    pub message: String,
}

impl MxLookupError {
    pub fn new(message: impl Into<String>) -> Self {
        MxLookupError {
            message: message.into(),
        }
    }
}
