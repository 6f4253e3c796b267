//! Declarative validation of nested records.
//!
//! Each field of a record carries an *instruction*, a short comma-separated
//! directive naming a checker, whether the field is required, and checker
//! options. The engine walks the value (through optional values, nested and
//! embedded records, and sequences of any depth), runs the checkers on the
//! leaves and reports **every** violation in one pass, keyed by field path:
//!
//! ```text
//! validate_tagged(&record) → Ok(()) | Err(ValidationError { "Name": [..], "Items[2]": [..], "Detail.Value": [..] })
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use tagval::validatable;
//!
//! struct Details {
//!     value: i32,
//! }
//!
//! struct Signup {
//!     name: String,
//!     email: String,
//!     scores: Vec<i64>,
//!     details: Details,
//! }
//!
//! validatable!(Details { value as "Value": "int,min=0,max=150" });
//! validatable!(Signup {
//!     name as "Name": "string,required,min=3,max=50",
//!     email as "Email": "email,required",
//!     scores as "Scores": "[]int,min=0,max=150",
//!     details as "Details": "struct",
//! });
//!
//! let signup = Signup {
//!     name: String::new(),
//!     email: "not-an-email".to_string(),
//!     scores: vec![1, 2, 999],
//!     details: Details { value: 200 },
//! };
//!
//! let err = tagval::validate_tagged(&signup).unwrap_err();
//! assert!(err.field("Name")[0].message.starts_with("required:"));
//! assert!(err.field("Email")[0].message.starts_with("invalid:"));
//! assert!(err.field("Scores[2]")[0].message.starts_with("max:"));
//! assert!(err.field("Details.Value")[0].message.starts_with("max:"));
//! println!("{}", err);
//! ```
//!
//! # Instructions
//!
//! ```text
//! instruction := "[]"* checkerName ("," "required")? ("," option)*
//! ```
//!
//! | Checker      | Options                                         |
//! |--------------|-------------------------------------------------|
//! | `string`     | `required`, `min=N`, `max=N` (character length) |
//! | `int`/`uint` | `min=N`, `max=N`                                |
//! | `float`      | `min=X`, `max=X`                                |
//! | `email`      | `required`, `checkdomainmx`                     |
//! | `postalcode` | `required`                                      |
//! | `uuid`       | `required`, `allowemptyuuid`, `allowstring`     |
//! | `time`       | `required`, `allowint`, `nbf=SECS`, `naf=SECS`  |
//!
//! `struct` descends into a nested record without a checker; `-` or an empty
//! instruction skips the field. Unknown options are ignored; unknown checker
//! names are reported against the field.
//!
//! # Feature Flags
//!
//! | Feature     | Default | Description |
//! |-------------|---------|-------------|
//! | `mx-lookup` | yes     | DNS MX lookups for `email,checkdomainmx` via `hickory-resolver`. Enables [`checkers::email::DnsMxResolver`]. |

pub mod checkers;
pub mod engine;
pub mod enums;
pub mod error;
pub mod instruction;
pub mod registry;
pub mod types;

pub use checkers::Checker;
pub use engine::{Engine, Unit};
pub use enums::Kind;
pub use error::*;
pub use registry::{Registry, register_checker};
pub use types::{Field, Scalar, Shape, Validatable};

/// Validates `value` against its own field instructions using the
/// process-wide registry.
///
/// # Errors
///
/// Returns every violation found, keyed by field path.
pub fn validate_tagged(value: &dyn Validatable) -> Result<(), ValidationError> {
    Engine::global().validate_tagged(value)
}

/// Validates a caller-built [`Unit`] using the process-wide registry.
///
/// # Errors
///
/// [`UnitError::NoUnit`] when `unit` is `None`; [`UnitError::Invalid`] with
/// every violation found otherwise.
///
/// # Example
///
/// ```rust
/// use tagval::checkers::IntChecker;
/// use tagval::{Unit, UnitError};
///
/// let checker = IntChecker { min: Some(0), max: Some(10) };
/// let readings = vec![vec![1, 2], vec![3, 42]];
/// let unit = Unit::new(&readings)
///     .with_name("readings")
///     .with_checker(&checker)
///     .with_array_depth(2);
///
/// match tagval::validate_unit(Some(&unit)) {
///     Err(UnitError::Invalid(err)) => assert!(err.contains_path("readings[1][1]")),
///     other => panic!("unexpected: {:?}", other),
/// }
/// assert_eq!(tagval::validate_unit(None), Err(UnitError::NoUnit));
/// ```
pub fn validate_unit(unit: Option<&Unit<'_>>) -> Result<(), UnitError> {
    Engine::global().validate_unit(unit)
}
