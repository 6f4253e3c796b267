use super::int::check_bounds;
use super::{Checker, options, parse_f64_option};
use crate::enums::Kind;
use crate::error::FieldError;
use crate::types::{Scalar, Shape, Validatable};

/// Inclusive bounds on `f32`/`f64` values.
///
/// NaN compares false against both bounds and therefore passes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FloatChecker {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FloatChecker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Checker for FloatChecker {
    fn check(
        &self,
        value: &dyn Validatable,
        field_name: &str,
        _kind: Kind,
    ) -> Result<(), FieldError> {
        let Shape::Leaf(Scalar::Float(n)) = value.shape() else {
            return Err(FieldError::unsupported_type(field_name, value.type_name()));
        };
        check_bounds(n, self.min, self.max, field_name)
    }

    fn configure(&mut self, items: &[&str]) -> Result<(), FieldError> {
        for option in options(items) {
            match option.key {
                "min" => self.min = Some(parse_f64_option("float", &option)?),
                "max" => self.max = Some(parse_f64_option("float", &option)?),
                _ => {}
            }
        }
        Ok(())
    }
}
