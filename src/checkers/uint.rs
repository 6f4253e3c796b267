use super::int::check_bounds;
use super::{Checker, options, parse_u64_option};
use crate::enums::Kind;
use crate::error::FieldError;
use crate::types::{Scalar, Shape, Validatable};

/// Inclusive bounds on unsigned integers of any width.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UintChecker {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl UintChecker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Checker for UintChecker {
    fn check(
        &self,
        value: &dyn Validatable,
        field_name: &str,
        _kind: Kind,
    ) -> Result<(), FieldError> {
        let Shape::Leaf(Scalar::Uint(n)) = value.shape() else {
            return Err(FieldError::unsupported_type(field_name, value.type_name()));
        };
        check_bounds(n, self.min, self.max, field_name)
    }

    fn configure(&mut self, items: &[&str]) -> Result<(), FieldError> {
        for option in options(items) {
            match option.key {
                "min" => self.min = Some(parse_u64_option("uint", &option)?),
                "max" => self.max = Some(parse_u64_option("uint", &option)?),
                _ => {}
            }
        }
        Ok(())
    }
}
