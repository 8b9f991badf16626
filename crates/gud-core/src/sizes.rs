//! Sizing constants and array extents.
//!
//! Array parameters are not sized by literal numbers alone. Most are bound to a
//! sizing constant supplied by the host model (the number of wavebands, `nlam`),
//! sometimes with an offset (`nlam+1` band edges). Those constants must be known
//! before a registry is created, so every extent is resolved exactly once at
//! declaration time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Floating point kind used for every real-valued parameter.
#[cfg(not(feature = "single-precision"))]
pub type FloatValue = f64;

/// Floating point kind used for every real-valued parameter.
#[cfg(feature = "single-precision")]
pub type FloatValue = f32;

/// Named sizing constants supplied by the host model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeConstants {
    values: BTreeMap<String, usize>,
}

impl SizeConstants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constant and return self for method chaining.
    pub fn with(mut self, name: impl Into<String>, value: usize) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: usize) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.values.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// The length of an array parameter.
///
/// Written as `"3"`, `"nlam"` or `"nlam+1"` in description tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Extent {
    /// A literal length
    Fixed(usize),
    /// A sizing constant plus an offset
    Named { constant: String, offset: i64 },
}

impl Extent {
    pub fn named(constant: impl Into<String>) -> Self {
        Self::Named {
            constant: constant.into(),
            offset: 0,
        }
    }

    pub fn named_with_offset(constant: impl Into<String>, offset: i64) -> Self {
        Self::Named {
            constant: constant.into(),
            offset,
        }
    }

    /// Resolve the extent to a concrete length.
    ///
    /// Returns `None` if the constant is unknown or the offset would make the
    /// length negative.
    pub fn resolve(&self, sizes: &SizeConstants) -> Option<usize> {
        match self {
            Extent::Fixed(n) => Some(*n),
            Extent::Named { constant, offset } => {
                let base = i64::try_from(sizes.get(constant)?).ok()?;
                usize::try_from(base.checked_add(*offset)?).ok()
            }
        }
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extent::Fixed(n) => write!(f, "{n}"),
            Extent::Named { constant, offset } => match offset {
                0 => write!(f, "{constant}"),
                o if *o > 0 => write!(f, "{constant}+{o}"),
                o => write!(f, "{constant}{o}"),
            },
        }
    }
}

impl FromStr for Extent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if s.is_empty() {
            return Err("empty extent".to_string());
        }
        if s.chars().all(|c| c.is_ascii_digit()) {
            return s
                .parse()
                .map(Extent::Fixed)
                .map_err(|_| format!("invalid extent '{s}'"));
        }

        let (constant, offset) = match s.find(|c| c == '+' || c == '-') {
            Some(idx) => {
                let offset: i64 = s[idx..]
                    .trim_start_matches('+')
                    .parse()
                    .map_err(|_| format!("invalid offset in extent '{s}'"))?;
                (&s[..idx], offset)
            }
            None => (s.as_str(), 0),
        };

        let valid_identifier = constant
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && constant
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_identifier {
            return Err(format!("invalid constant name in extent '{s}'"));
        }

        Ok(Extent::Named {
            constant: constant.to_string(),
            offset,
        })
    }
}

impl TryFrom<String> for Extent {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Extent> for String {
    fn from(value: Extent) -> Self {
        value.to_string()
    }
}
