use super::{Checker, options};
use crate::enums::Kind;
use crate::error::{FailureKind, FieldError};
use crate::types::{Scalar, Shape, Validatable};
use uuid::Uuid;

/// UUID values, or UUID strings when `allowstring` is set.
///
/// The nil UUID is rejected unless `allowemptyuuid` is set. `required` only
/// concerns the empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UuidChecker {
    pub allow_empty_uuid: bool,
    pub allow_string: bool,
    pub required: bool,
}

impl UuidChecker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Checker for UuidChecker {
    fn check(
        &self,
        value: &dyn Validatable,
        field_name: &str,
        kind: Kind,
    ) -> Result<(), FieldError> {
        let mut no_value = false;
        let mut empty_uuid = false;
        let mut unparsable: Option<&str> = None;

        let shape = value.shape();
        match (kind, &shape) {
            (Kind::String, Shape::Leaf(Scalar::Str(s))) => {
                if !self.allow_string {
                    return Err(FieldError::new(
                        FailureKind::Type,
                        format!(
                            "the field {} is a string, but allowstring was not provided in the instruction",
                            field_name
                        ),
                    ));
                }
                if s.is_empty() {
                    no_value = true;
                } else {
                    match Uuid::parse_str(s) {
                        Ok(parsed) => empty_uuid = parsed.is_nil(),
                        Err(_) => unparsable = Some(*s),
                    }
                }
            }
            (Kind::Uuid, Shape::Leaf(Scalar::Uuid(id))) => empty_uuid = id.is_nil(),
            _ => return Err(FieldError::unsupported_type(field_name, value.type_name())),
        }

        if self.required && no_value {
            return Err(FieldError::required(format!(
                "the field {} had an empty value",
                field_name
            )));
        }

        if !self.allow_empty_uuid && empty_uuid {
            return Err(FieldError::new(
                FailureKind::NoEmpty,
                format!(
                    "the field {} has an empty uuid value, but allowemptyuuid was not provided",
                    field_name
                ),
            ));
        }

        if let Some(raw) = unparsable {
            return Err(FieldError::invalid(format!(
                "the field {} has the value {} which could not be parsed into a UUID",
                field_name, raw
            )));
        }
        Ok(())
    }

    fn configure(&mut self, items: &[&str]) -> Result<(), FieldError> {
        for option in options(items) {
            match option.key {
                "required" => self.required = true,
                "allowemptyuuid" => self.allow_empty_uuid = true,
                "allowstring" => self.allow_string = true,
                _ => {}
            }
        }
        Ok(())
    }
}
