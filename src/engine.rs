//! The traversal engine.
//!
//! Walks a value depth-first, resolving one [`Shape`] per step, and records
//! every failure under its field path. Nothing short of a missing root unit
//! stops the walk: sibling and descendant fields are always visited.

use crate::checkers::Checker;
use crate::enums::Kind;
use crate::error::{ErrorMap, FailureKind, FieldError, UnitError, ValidationError};
use crate::instruction::{Instruction, Target};
use crate::registry::{self, Registry};
use crate::types::{Field, Shape, Validatable, short_type_name};
use std::fmt;

/// Name given to a unit that is not a struct field.
pub const DEFAULT_UNIT_NAME: &str = "value";

// ─── Unit ───────────────────────────────────────────────────────────────────

/// One step of work for the engine: a value plus the metadata needed to
/// validate it.
#[derive(Clone)]
pub struct Unit<'a> {
    pub value: &'a dyn Validatable,
    /// Path under which failures for this value are recorded.
    pub name: String,
    /// Whether a nil value is itself a failure.
    pub required: bool,
    /// Sequence levels still to unwrap before the checker applies.
    pub array_depth: u8,
    /// Record boundaries crossed since the root.
    pub struct_depth: u8,
    /// Leaf checker. `None` while the value still needs record traversal.
    pub checker: Option<&'a dyn Checker>,
}

impl<'a> Unit<'a> {
    pub fn new(value: &'a dyn Validatable) -> Self {
        Unit {
            value,
            name: DEFAULT_UNIT_NAME.to_string(),
            required: false,
            array_depth: 0,
            struct_depth: 0,
            checker: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_checker(mut self, checker: &'a dyn Checker) -> Self {
        self.checker = Some(checker);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_array_depth(mut self, array_depth: u8) -> Self {
        self.array_depth = array_depth;
        self
    }

    pub fn with_struct_depth(mut self, struct_depth: u8) -> Self {
        self.struct_depth = struct_depth;
        self
    }

    /// Same metadata, different value and path.
    fn descend<'b>(&self, value: &'b dyn Validatable, name: String) -> Unit<'b>
    where
        'a: 'b,
    {
        Unit {
            value,
            name,
            required: self.required,
            array_depth: self.array_depth,
            struct_depth: self.struct_depth,
            checker: self.checker,
        }
    }
}

impl fmt::Debug for Unit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("type", &self.value.type_name())
            .field("name", &self.name)
            .field("required", &self.required)
            .field("array_depth", &self.array_depth)
            .field("struct_depth", &self.struct_depth)
            .field("has_checker", &self.checker.is_some())
            .finish()
    }
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Validation entry points bound to a checker registry.
#[derive(Clone, Copy, Debug)]
pub struct Engine<'r> {
    registry: &'r Registry,
}

impl Engine<'static> {
    /// An engine over the process-wide registry.
    pub fn global() -> Self {
        Engine::new(registry::global())
    }
}

impl<'r> Engine<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Engine { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Validates `value` against the instructions it declares for its own
    /// fields.
    ///
    /// The report is labelled with the value's type name.
    pub fn validate_tagged(&self, value: &dyn Validatable) -> Result<(), ValidationError> {
        let mut errors = ErrorMap::new();
        self.walk(&Unit::new(value), &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(errors).with_data_type(short_type_name(value.type_name())))
        }
    }

    /// Validates a caller-built unit, typically a non-record value with an
    /// explicit checker.
    ///
    /// # Errors
    ///
    /// [`UnitError::NoUnit`] if `unit` is `None`, before any traversal;
    /// [`UnitError::Invalid`] with every failure found otherwise.
    pub fn validate_unit(&self, unit: Option<&Unit<'_>>) -> Result<(), UnitError> {
        let unit = unit.ok_or(UnitError::NoUnit)?;
        let mut errors = ErrorMap::new();
        self.walk(unit, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(UnitError::Invalid(ValidationError::new(errors)))
        }
    }

    fn walk(&self, unit: &Unit<'_>, errors: &mut ErrorMap) {
        let shape = unit.value.shape();
        let kind = shape.kind();
        tracing::trace!(
            path = %unit.name,
            %kind,
            array_depth = unit.array_depth,
            struct_depth = unit.struct_depth,
            "visiting"
        );

        match shape {
            Shape::Pointer(None) => {
                if unit.required {
                    record(errors, &unit.name, FieldError::required_nil(&unit.name));
                }
            }
            Shape::Pointer(Some(pointee)) => {
                self.walk(&unit.descend(pointee, unit.name.clone()), errors);
            }
            Shape::Struct(fields) if unit.checker.is_none() => {
                self.walk_fields(unit, fields, errors);
            }
            shape if unit.array_depth > 0 => self.walk_sequence(unit, shape, errors),
            _ => {
                if let Some(checker) = unit.checker {
                    for e in checker.check_all(unit.value, &unit.name, kind) {
                        record(errors, &unit.name, e);
                    }
                }
            }
        }
    }

    fn walk_fields(&self, unit: &Unit<'_>, fields: Vec<Field<'_>>, errors: &mut ErrorMap) {
        let struct_depth = unit.struct_depth.saturating_add(1);

        for field in fields {
            let Some(raw) = field.instruction else {
                continue;
            };
            let instruction = Instruction::parse(raw);

            let path = if struct_depth > 1 {
                format!("{}.{}", unit.name, field.name)
            } else {
                field.name.to_string()
            };

            let checker = match instruction.target {
                Target::Skip => continue,
                Target::Struct => None,
                Target::Checker(name) => match self.registry.build(name, &instruction.options) {
                    Ok(checker) => Some(checker),
                    Err(e) => {
                        tracing::debug!(path = %path, checker = name, error = %e, "field not validated");
                        record(errors, &path, e);
                        continue;
                    }
                },
            };

            let child = Unit {
                value: field.value,
                name: path,
                required: instruction.required,
                array_depth: instruction.array_depth,
                struct_depth,
                checker: checker.as_deref(),
            };
            self.walk(&child, errors);
        }
    }

    fn walk_sequence(&self, unit: &Unit<'_>, shape: Shape<'_>, errors: &mut ErrorMap) {
        let items = match shape {
            Shape::Sequence(items) => items,
            other => {
                record(errors, &unit.name, array_depth_mismatch(unit, other.kind()));
                return;
            }
        };

        for (index, item) in items.into_iter().enumerate() {
            let mut child = unit.descend(item, format!("{}[{}]", unit.name, index));
            child.array_depth -= 1;
            // Records inside a sequence always key their fields under the
            // indexed element path, even at the root of an ad-hoc unit.
            if unit.checker.is_none() {
                child.struct_depth = child.struct_depth.max(1);
            }
            self.walk(&child, errors);
        }
    }
}

fn array_depth_mismatch(unit: &Unit<'_>, kind: Kind) -> FieldError {
    tracing::debug!(path = %unit.name, %kind, array_depth = unit.array_depth, "expected a sequence");
    FieldError::new(
        FailureKind::Type,
        format!(
            "the value of {} is of type {} ({}) but {} more array level(s) were declared",
            unit.name,
            unit.value.type_name(),
            kind,
            unit.array_depth
        ),
    )
}

fn record(errors: &mut ErrorMap, path: &str, error: FieldError) {
    errors.entry(path.to_string()).or_default().push(error);
}
