use super::{Checker, options, parse_len_option};
use crate::enums::Kind;
use crate::error::{FailureKind, FieldError};
use crate::types::{Scalar, Shape, Validatable};

/// Length and presence constraints on strings.
///
/// Lengths count characters and both bounds are inclusive. An empty string is
/// only governed by `required`: a `min` bound is not applied to it, unless the
/// bound is `min=0`, which nothing can fall below anyway.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StringChecker {
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub required: bool,
}

impl StringChecker {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_str(&self, value: &str, field_name: &str) -> Result<(), FieldError> {
        let length = value.chars().count();
        let no_value = length == 0;

        if let Some(min) = self.min
            && (!no_value || min == 0)
            && length < min
        {
            return Err(FieldError::new(
                FailureKind::Min,
                format!(
                    "the value of {} is '{}' of length {} which is less than the minimum length {}",
                    field_name, value, length, min
                ),
            ));
        }

        if let Some(max) = self.max
            && length > max
        {
            return Err(FieldError::new(
                FailureKind::Max,
                format!(
                    "the value of {} is '{}' of length {} which is greater than the maximum length {}",
                    field_name, value, length, max
                ),
            ));
        }

        if self.required && no_value {
            return Err(FieldError::required(format!(
                "the value of {} is blank",
                field_name
            )));
        }
        Ok(())
    }
}

impl Checker for StringChecker {
    fn check(
        &self,
        value: &dyn Validatable,
        field_name: &str,
        _kind: Kind,
    ) -> Result<(), FieldError> {
        match value.shape() {
            Shape::Leaf(Scalar::Str(s)) => self.check_str(s, field_name),
            _ => Err(FieldError::unsupported_type(field_name, value.type_name())),
        }
    }

    fn configure(&mut self, items: &[&str]) -> Result<(), FieldError> {
        for option in options(items) {
            match option.key {
                "min" => self.min = Some(parse_len_option("string", &option)?),
                "max" => self.max = Some(parse_len_option("string", &option)?),
                "required" => self.required = true,
                _ => {}
            }
        }
        Ok(())
    }
}
