use super::{Checker, options, parse_i64_option};
use crate::enums::Kind;
use crate::error::{FailureKind, FieldError};
use crate::types::{Scalar, Shape, Validatable};

/// Inclusive bounds on signed integers of any width.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntChecker {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl IntChecker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Checker for IntChecker {
    fn check(
        &self,
        value: &dyn Validatable,
        field_name: &str,
        _kind: Kind,
    ) -> Result<(), FieldError> {
        let Shape::Leaf(Scalar::Int(n)) = value.shape() else {
            return Err(FieldError::unsupported_type(field_name, value.type_name()));
        };
        check_bounds(n, self.min, self.max, field_name)
    }

    fn configure(&mut self, items: &[&str]) -> Result<(), FieldError> {
        for option in options(items) {
            match option.key {
                "min" => self.min = Some(parse_i64_option("int", &option)?),
                "max" => self.max = Some(parse_i64_option("int", &option)?),
                _ => {}
            }
        }
        Ok(())
    }
}

/// Shared by the numeric checkers: inclusive `[min, max]` with either bound
/// optional.
pub(crate) fn check_bounds<T>(
    value: T,
    min: Option<T>,
    max: Option<T>,
    field_name: &str,
) -> Result<(), FieldError>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if let Some(min) = min
        && value < min
    {
        return Err(FieldError::new(
            FailureKind::Min,
            format!(
                "the field {} value {} is less than the minimum value {}",
                field_name, value, min
            ),
        ));
    }
    if let Some(max) = max
        && value > max
    {
        return Err(FieldError::new(
            FailureKind::Max,
            format!(
                "the field {} value {} is greater than the maximum value {}",
                field_name, value, max
            ),
        ));
    }
    Ok(())
}
