//! Field instruction parsing.
//!
//! ```text
//! instruction := arrayPrefix* checkerName ("," "required")? ("," option)*
//! arrayPrefix := "[]"
//! option      := key | key "=" value
//! ```
//!
//! Parsing never fails: an unknown checker name is reported when the engine
//! resolves it, and option syntax is the checker's business.

/// Checker name reserved for records traversed without a leaf checker.
pub const STRUCT_MARKER: &str = "struct";

/// Instruction that excludes a field from validation.
pub const SKIP_MARKER: &str = "-";

const ARRAY_PREFIX: &str = "[]";
const REQUIRED_TOKEN: &str = "required";

/// What an instruction asks the engine to do with a field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target<'a> {
    /// Empty instruction or [`SKIP_MARKER`].
    Skip,
    /// [`STRUCT_MARKER`]: descend into the record without a checker.
    Struct,
    /// A registry name.
    Checker(&'a str),
}

/// A parsed field instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction<'a> {
    pub target: Target<'a>,
    /// Number of `[]` prefixes in front of the checker name.
    pub array_depth: u8,
    /// Set iff the second comma-separated token is exactly `required`.
    pub required: bool,
    /// Every token after the checker name, `required` included, in order.
    pub options: Vec<&'a str>,
}

impl<'a> Instruction<'a> {
    pub fn parse(raw: &'a str) -> Self {
        if raw.is_empty() || raw == SKIP_MARKER {
            return Instruction {
                target: Target::Skip,
                array_depth: 0,
                required: false,
                options: Vec::new(),
            };
        }

        let mut tokens = raw.split(',');
        let head = tokens.next().unwrap_or_default();
        let options: Vec<&str> = tokens.collect();
        let required = options.first() == Some(&REQUIRED_TOKEN);

        let (name, array_depth) = strip_array_prefixes(head);
        let target = if name == STRUCT_MARKER {
            Target::Struct
        } else if name.is_empty() {
            // Nothing after the prefixes: name the checker by what was written.
            Target::Checker(head)
        } else {
            Target::Checker(name)
        };

        Instruction {
            target,
            array_depth,
            required,
            options,
        }
    }

    pub fn is_skip(&self) -> bool {
        self.target == Target::Skip
    }
}

/// Splits leading `[]` pairs off a checker name, counting them.
pub fn strip_array_prefixes(head: &str) -> (&str, u8) {
    let mut name = head;
    let mut depth: u8 = 0;
    while let Some(rest) = name.strip_prefix(ARRAY_PREFIX) {
        name = rest;
        depth = depth.saturating_add(1);
    }
    (name, depth)
}

/// A single checker option, split on the first `=`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckerOption<'a> {
    pub key: &'a str,
    pub value: Option<&'a str>,
}

impl<'a> CheckerOption<'a> {
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once('=') {
            Some((key, value)) => CheckerOption {
                key,
                value: Some(value),
            },
            None => CheckerOption {
                key: raw,
                value: None,
            },
        }
    }
}

/// Parses an integer option literal.
///
/// Accepts an optional sign, `0x`/`0o`/`0b` radix prefixes, a leading `0` for
/// octal, and `_` separators between digits.
pub fn parse_int_literal(raw: &str) -> Result<i128, String> {
    let (negative, unsigned) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let lower = unsigned.to_ascii_lowercase();
    let (radix, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest.to_string())
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest.to_string())
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest.to_string())
    } else if lower.len() > 1 && lower.starts_with('0') {
        (8, lower[1..].to_string())
    } else {
        (10, lower.clone())
    };

    // A separator may follow a radix prefix ("0x_ff") but never leads a
    // plain decimal.
    let digits = if radix == 10 {
        digits.as_str()
    } else {
        digits.strip_prefix('_').unwrap_or(&digits)
    };
    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
        || !digits.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(format!("invalid syntax: {:?}", raw));
    }
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();

    let magnitude = u64::from_str_radix(&cleaned, radix)
        .map_err(|e| format!("parsing {:?}: {}", raw, e))?;
    let magnitude = i128::from(magnitude);
    Ok(if negative { -magnitude } else { magnitude })
}
