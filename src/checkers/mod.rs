//! Constraint checkers: the leaves of validation.
//!
//! A checker is built fresh for every field by a registry factory, configured
//! once from the field's instruction options, and then asked to check a single
//! value. Unknown option keys are ignored; only a recognized key with an
//! unusable value is a configuration error.

pub mod email;
pub mod float;
pub mod int;
pub mod postal_code;
pub mod string;
pub mod time;
pub mod uint;
pub mod uuid;

#[cfg(feature = "mx-lookup")]
pub use email::DnsMxResolver;
pub use email::{EmailChecker, MxLookupConfig, MxResolver, default_mx_resolver};
pub use float::FloatChecker;
pub use int::IntChecker;
pub use postal_code::PostalCodeChecker;
pub use string::StringChecker;
pub use time::TimeChecker;
pub use uint::UintChecker;
pub use self::uuid::UuidChecker;

use crate::enums::Kind;
use crate::error::FieldError;
use crate::instruction::{CheckerOption, parse_int_literal};
use crate::types::Validatable;

/// A configurable constraint over a single value.
pub trait Checker: Send + Sync {
    /// Checks `value`, reported under `field_name`.
    ///
    /// `kind` is the runtime kind the engine resolved for `value`. Values of a
    /// kind the checker does not support fail with a `type:` error.
    fn check(&self, value: &dyn Validatable, field_name: &str, kind: Kind)
    -> Result<(), FieldError>;

    /// Every failure for `value`, all recorded under `field_name`.
    ///
    /// The engine calls this rather than [`check`](Checker::check). Override it
    /// when one value can fail several independent constraints.
    fn check_all(&self, value: &dyn Validatable, field_name: &str, kind: Kind) -> Vec<FieldError> {
        self.check(value, field_name, kind).err().into_iter().collect()
    }

    /// Reads instruction options (`"key"` or `"key=value"`) into the checker.
    fn configure(&mut self, options: &[&str]) -> Result<(), FieldError>;
}

/// Iterates parsed options.
pub(crate) fn options<'a>(raw: &'a [&'a str]) -> impl Iterator<Item = CheckerOption<'a>> + 'a {
    raw.iter().map(|item| CheckerOption::parse(item))
}

fn option_value<'a>(checker: &str, option: &CheckerOption<'a>) -> Result<&'a str, FieldError> {
    option.value.ok_or_else(|| {
        FieldError::config(format!(
            "{} checker option {} requires a value",
            checker, option.key
        ))
    })
}

fn invalid_option(checker: &str, key: &str, reason: impl std::fmt::Display) -> FieldError {
    FieldError::config(format!(
        "{} checker option {} value invalid: {}",
        checker, key, reason
    ))
}

pub(crate) fn parse_i64_option(checker: &str, option: &CheckerOption<'_>) -> Result<i64, FieldError> {
    let raw = option_value(checker, option)?;
    let value = parse_int_literal(raw).map_err(|e| invalid_option(checker, option.key, e))?;
    i64::try_from(value).map_err(|_| invalid_option(checker, option.key, "value out of range"))
}

pub(crate) fn parse_u64_option(checker: &str, option: &CheckerOption<'_>) -> Result<u64, FieldError> {
    let raw = option_value(checker, option)?;
    let value = parse_int_literal(raw).map_err(|e| invalid_option(checker, option.key, e))?;
    u64::try_from(value).map_err(|_| invalid_option(checker, option.key, "value out of range"))
}

pub(crate) fn parse_f64_option(checker: &str, option: &CheckerOption<'_>) -> Result<f64, FieldError> {
    let raw = option_value(checker, option)?;
    raw.parse::<f64>()
        .map_err(|e| invalid_option(checker, option.key, e))
}

pub(crate) fn parse_len_option(checker: &str, option: &CheckerOption<'_>) -> Result<usize, FieldError> {
    let raw = option_value(checker, option)?;
    raw.parse::<usize>()
        .map_err(|e| invalid_option(checker, option.key, e))
}
