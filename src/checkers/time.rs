use super::{Checker, options, parse_i64_option};
use crate::enums::Kind;
use crate::error::{FailureKind, FieldError};
use crate::types::{Scalar, Shape, Validatable};
use chrono::{DateTime, Utc};

/// Timestamp window checks.
///
/// `nbf` (not before) and `naf` (not after) are Unix timestamps in seconds and
/// both bounds are inclusive. Integer epochs are accepted only with
/// `allowint`. The zero timestamp is the Unix epoch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimeChecker {
    pub allow_int: bool,
    pub not_before: Option<i64>,
    pub not_after: Option<i64>,
    pub required: bool,
}

impl TimeChecker {
    pub fn new() -> Self {
        Self::default()
    }
}

fn display_unix(seconds: i64) -> String {
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .map(|t| t.to_string())
        .unwrap_or_else(|| seconds.to_string())
}

impl Checker for TimeChecker {
    fn check(
        &self,
        value: &dyn Validatable,
        field_name: &str,
        kind: Kind,
    ) -> Result<(), FieldError> {
        let (seconds, no_value) = match (kind, value.shape()) {
            (Kind::Time, Shape::Leaf(Scalar::Time(t))) => {
                (t.timestamp(), t == DateTime::<Utc>::UNIX_EPOCH)
            }
            (Kind::Int, Shape::Leaf(Scalar::Int(n))) => {
                if !self.allow_int {
                    return Err(FieldError::new(
                        FailureKind::Type,
                        format!("the field {} is an int, but allowint was not provided", field_name),
                    ));
                }
                (n, false)
            }
            _ => return Err(FieldError::unsupported_type(field_name, value.type_name())),
        };

        if let Some(nbf) = self.not_before
            && seconds < nbf
        {
            return Err(FieldError::new(
                FailureKind::NotBefore,
                format!(
                    "the field {} has a value of '{}' which is before '{}'",
                    field_name,
                    display_unix(seconds),
                    display_unix(nbf)
                ),
            ));
        }

        if let Some(naf) = self.not_after
            && seconds > naf
        {
            return Err(FieldError::new(
                FailureKind::NotAfter,
                format!(
                    "the field {} has a value of '{}' which is after '{}'",
                    field_name,
                    display_unix(seconds),
                    display_unix(naf)
                ),
            ));
        }

        if self.required && no_value {
            return Err(FieldError::required(format!(
                "the field {} had an empty value",
                field_name
            )));
        }
        Ok(())
    }

    fn configure(&mut self, items: &[&str]) -> Result<(), FieldError> {
        for option in options(items) {
            match option.key {
                "allowint" => self.allow_int = true,
                "required" => self.required = true,
                "nbf" => self.not_before = Some(parse_i64_option("time", &option)?),
                "naf" => self.not_after = Some(parse_i64_option("time", &option)?),
                _ => {}
            }
        }
        Ok(())
    }
}
