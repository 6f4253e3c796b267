use super::{Checker, options};
use crate::enums::Kind;
use crate::error::FieldError;
use crate::types::{Scalar, Shape, Validatable};
use regex::Regex;
use std::sync::LazyLock;

static POSTAL_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{5}$").unwrap());

/// Five-digit postal codes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostalCodeChecker {
    pub required: bool,
}

impl PostalCodeChecker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Checker for PostalCodeChecker {
    fn check(
        &self,
        value: &dyn Validatable,
        field_name: &str,
        _kind: Kind,
    ) -> Result<(), FieldError> {
        let Shape::Leaf(Scalar::Str(code)) = value.shape() else {
            return Err(FieldError::unsupported_type(field_name, value.type_name()));
        };

        if code.is_empty() {
            if self.required {
                return Err(FieldError::required(format!(
                    "the field {} is required",
                    field_name
                )));
            }
            return Ok(());
        }

        if !POSTAL_CODE_RE.is_match(code) {
            return Err(FieldError::invalid(format!(
                "the field {} does not contain a valid postal code. '{}' was provided",
                field_name, code
            )));
        }
        Ok(())
    }

    fn configure(&mut self, items: &[&str]) -> Result<(), FieldError> {
        for option in options(items) {
            if option.key == "required" {
                self.required = true;
            }
        }
        Ok(())
    }
}
