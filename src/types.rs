//! The value model walked by the engine.
//!
//! Rust has no runtime reflection, so every type that takes part in
//! validation describes its own shape through [`Validatable`]. The engine
//! resolves one [`Shape`] per recursive step and dispatches on it.

use crate::enums::Kind;
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

// ─── Validatable ────────────────────────────────────────────────────────────

/// A value the engine can walk.
///
/// Records normally implement this through the [`validatable!`](crate::validatable)
/// macro; leaf types, containers and pointer-like wrappers are covered by the
/// implementations in this module.
pub trait Validatable {
    /// The shape of this value for one traversal step.
    fn shape(&self) -> Shape<'_>;

    /// Type name used in `type:` error messages.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A resolved traversal step.
pub enum Shape<'a> {
    /// A nilable indirection. `None` is nil.
    Pointer(Option<&'a dyn Validatable>),
    /// A record with declared fields, in declaration order.
    Struct(Vec<Field<'a>>),
    /// An ordered sequence of elements.
    Sequence(Vec<&'a dyn Validatable>),
    Leaf(Scalar<'a>),
    /// Anything the built-in checkers have no representation for.
    Opaque,
}

impl Shape<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            Shape::Pointer(_) => Kind::Pointer,
            Shape::Struct(_) => Kind::Struct,
            Shape::Sequence(_) => Kind::Sequence,
            Shape::Leaf(scalar) => scalar.kind(),
            Shape::Opaque => Kind::Opaque,
        }
    }
}

/// A terminal value, with numeric widths widened to 64 bits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar<'a> {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(&'a str),
    Uuid(Uuid),
    Time(DateTime<Utc>),
}

impl Scalar<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            Scalar::Bool(_) => Kind::Bool,
            Scalar::Int(_) => Kind::Int,
            Scalar::Uint(_) => Kind::Uint,
            Scalar::Float(_) => Kind::Float,
            Scalar::Str(_) => Kind::String,
            Scalar::Uuid(_) => Kind::Uuid,
            Scalar::Time(_) => Kind::Time,
        }
    }
}

/// One declared field of a record.
pub struct Field<'a> {
    /// Display name used when building field paths.
    pub name: &'a str,
    /// The field's instruction, e.g. `"string,required,min=3"`. `None` skips
    /// the field.
    pub instruction: Option<&'a str>,
    pub value: &'a dyn Validatable,
}

impl<'a> Field<'a> {
    pub fn new(name: &'a str, instruction: Option<&'a str>, value: &'a dyn Validatable) -> Self {
        Field {
            name,
            instruction,
            value,
        }
    }
}

/// Strips module paths from a fully qualified type name.
///
/// `alloc::vec::Vec<core::option::Option<i32>>` becomes `Vec<Option<i32>>`.
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
        } else {
            out.push(c);
            if !(c.is_alphanumeric() || c == '_') {
                segment_start = out.len();
            }
        }
    }
    out
}

// ─── Leaves ─────────────────────────────────────────────────────────────────

macro_rules! widened_leaf {
    ($variant:ident as $wide:ty: $($t:ty),+) => {
        $(
            impl Validatable for $t {
                fn shape(&self) -> Shape<'_> {
                    Shape::Leaf(Scalar::$variant(*self as $wide))
                }
            }
        )+
    };
}

widened_leaf!(Int as i64: i8, i16, i32, i64, isize);
widened_leaf!(Uint as u64: u8, u16, u32, u64, usize);
widened_leaf!(Float as f64: f32, f64);

impl Validatable for bool {
    fn shape(&self) -> Shape<'_> {
        Shape::Leaf(Scalar::Bool(*self))
    }
}

impl Validatable for str {
    fn shape(&self) -> Shape<'_> {
        Shape::Leaf(Scalar::Str(self))
    }
}

impl Validatable for String {
    fn shape(&self) -> Shape<'_> {
        Shape::Leaf(Scalar::Str(self.as_str()))
    }
}

impl Validatable for Cow<'_, str> {
    fn shape(&self) -> Shape<'_> {
        Shape::Leaf(Scalar::Str(self.as_ref()))
    }
}

impl Validatable for Uuid {
    fn shape(&self) -> Shape<'_> {
        Shape::Leaf(Scalar::Uuid(*self))
    }
}

impl Validatable for DateTime<Utc> {
    fn shape(&self) -> Shape<'_> {
        Shape::Leaf(Scalar::Time(*self))
    }
}

impl Validatable for DateTime<FixedOffset> {
    fn shape(&self) -> Shape<'_> {
        Shape::Leaf(Scalar::Time(self.with_timezone(&Utc)))
    }
}

// ─── Pointers ───────────────────────────────────────────────────────────────

impl<T: Validatable> Validatable for Option<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Pointer(self.as_ref().map(|v| v as &dyn Validatable))
    }
}

// References and owning smart pointers can never be nil, so they are
// transparent: they report the shape of what they point at.
macro_rules! transparent_pointer {
    ($($wrapper:ty),+) => {
        $(
            impl<T: Validatable + ?Sized> Validatable for $wrapper {
                fn shape(&self) -> Shape<'_> {
                    (**self).shape()
                }

                fn type_name(&self) -> &'static str {
                    (**self).type_name()
                }
            }
        )+
    };
}

transparent_pointer!(&T, &mut T, Box<T>, Rc<T>, Arc<T>);

// ─── Sequences ──────────────────────────────────────────────────────────────

impl<T: Validatable> Validatable for [T] {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(self.iter().map(|v| v as &dyn Validatable).collect())
    }
}

impl<T: Validatable, const N: usize> Validatable for [T; N] {
    fn shape(&self) -> Shape<'_> {
        self.as_slice().shape()
    }
}

impl<T: Validatable> Validatable for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        self.as_slice().shape()
    }
}

impl<T: Validatable> Validatable for VecDeque<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(self.iter().map(|v| v as &dyn Validatable).collect())
    }
}

// ─── JSON ───────────────────────────────────────────────────────────────────

/// `null` is a nil pointer and arrays are sequences. Integers are signed
/// unless they only fit in `u64`. Objects carry no instructions and are opaque.
impl Validatable for Value {
    fn shape(&self) -> Shape<'_> {
        match self {
            Value::Null => Shape::Pointer(None),
            Value::Bool(b) => Shape::Leaf(Scalar::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Shape::Leaf(Scalar::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Shape::Leaf(Scalar::Uint(u))
                } else {
                    Shape::Leaf(Scalar::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Value::String(s) => Shape::Leaf(Scalar::Str(s.as_str())),
            Value::Array(items) => items.as_slice().shape(),
            Value::Object(_) => Shape::Opaque,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

// ─── Records ────────────────────────────────────────────────────────────────

/// Implements [`Validatable`] for a record by listing its instructed fields.
///
/// Each entry is `field: "instruction"` or `field as "DisplayName":
/// "instruction"`. Fields that are not listed are never visited. The
/// instruction `"-"` also skips a field.
///
/// ```rust
/// use tagval::validatable;
///
/// struct Address {
///     zip: String,
/// }
///
/// struct Customer {
///     name: String,
///     age: u8,
///     address: Option<Address>,
///     notes: String,
/// }
///
/// validatable!(Address { zip: "postalcode,required" });
/// validatable!(Customer {
///     name as "Name": "string,required,min=2,max=64",
///     age: "uint,max=150",
///     address: "struct",
/// });
///
/// let customer = Customer {
///     name: "Al".to_string(),
///     age: 200,
///     address: Some(Address { zip: "123".to_string() }),
///     notes: String::new(),
/// };
/// let err = tagval::validate_tagged(&customer).unwrap_err();
/// assert!(err.contains_path("age"));
/// assert!(err.contains_path("address.zip"));
/// ```
#[macro_export]
macro_rules! validatable {
    (@name $field:ident) => {
        ::std::stringify!($field)
    };
    (@name $field:ident $display:literal) => {
        $display
    };
    ($ty:ty { $($field:ident $(as $display:literal)? : $instruction:literal),* $(,)? }) => {
        impl $crate::Validatable for $ty {
            fn shape(&self) -> $crate::Shape<'_> {
                $crate::Shape::Struct(::std::vec![
                    $(
                        $crate::Field::new(
                            $crate::validatable!(@name $field $($display)?),
                            ::std::option::Option::Some($instruction),
                            &self.$field,
                        )
                    ),*
                ])
            }
        }
    };
}
