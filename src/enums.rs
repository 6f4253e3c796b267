//! Closed enumerations shared by the engine and the checkers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime kind of a value, as seen by a checker.
///
/// Integer and float widths are folded into a single kind each: checkers
/// always receive values widened to 64 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Pointer,
    Struct,
    Sequence,
    Bool,
    Int,
    Uint,
    Float,
    String,
    Uuid,
    Time,
    Opaque,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Pointer => "pointer",
            Kind::Struct => "struct",
            Kind::Sequence => "sequence",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Uuid => "uuid",
            Kind::Time => "time",
            Kind::Opaque => "opaque",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
