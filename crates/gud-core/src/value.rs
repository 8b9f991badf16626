//! Parameter kinds and values.

use crate::errors::{GudError, GudResult};
use crate::FloatValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The declared type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    Logical,
    Integer,
    Real,
    /// Fixed-length character string (file names and paths)
    Text,
}

impl ParameterKind {
    pub fn name(&self) -> &'static str {
        match self {
            ParameterKind::Logical => "logical",
            ParameterKind::Integer => "integer",
            ParameterKind::Real => "real",
            ParameterKind::Text => "text",
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parameter value.
///
/// Only real parameters can be array-valued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Logical(bool),
    Integer(i64),
    Real(FloatValue),
    RealArray(Vec<FloatValue>),
    Text(String),
}

impl ParameterValue {
    pub fn kind(&self) -> ParameterKind {
        match self {
            ParameterValue::Logical(_) => ParameterKind::Logical,
            ParameterValue::Integer(_) => ParameterKind::Integer,
            ParameterValue::Real(_) | ParameterValue::RealArray(_) => ParameterKind::Real,
            ParameterValue::Text(_) => ParameterKind::Text,
        }
    }

    /// Human readable type, distinguishing scalar and array reals
    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterValue::RealArray(_) => "real array",
            other => other.kind().name(),
        }
    }

    pub fn as_logical(&self) -> Option<bool> {
        match self {
            ParameterValue::Logical(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ParameterValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<FloatValue> {
        match self {
            ParameterValue::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_real_array(&self) -> Option<&[FloatValue]> {
        match self {
            ParameterValue::RealArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParameterValue::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Convert a TOML value into a parameter value of the declared kind.
    ///
    /// `shape` is the resolved length for array parameters and `None` for
    /// scalars. Integers are accepted where reals are expected, and a single
    /// number given for an array fills every element.
    pub fn from_toml(
        name: &str,
        kind: ParameterKind,
        shape: Option<usize>,
        value: &toml::Value,
    ) -> GudResult<Self> {
        let mismatch = || GudError::TypeMismatch {
            name: name.to_string(),
            expected: match shape {
                Some(_) => "real array".to_string(),
                None => kind.name().to_string(),
            },
            found: value.type_str().to_string(),
        };

        match (kind, shape, value) {
            (ParameterKind::Logical, None, toml::Value::Boolean(v)) => {
                Ok(ParameterValue::Logical(*v))
            }
            (ParameterKind::Integer, None, toml::Value::Integer(v)) => {
                Ok(ParameterValue::Integer(*v))
            }
            (ParameterKind::Text, None, toml::Value::String(v)) => {
                Ok(ParameterValue::Text(v.clone()))
            }
            (ParameterKind::Real, None, v) => toml_number(v)
                .map(ParameterValue::Real)
                .ok_or_else(mismatch),
            (ParameterKind::Real, Some(n), toml::Value::Array(items)) => {
                let values = items
                    .iter()
                    .map(toml_number)
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(mismatch)?;
                if values.len() != n {
                    return Err(GudError::DimensionMismatch {
                        name: name.to_string(),
                        expected: n,
                        found: values.len(),
                    });
                }
                Ok(ParameterValue::RealArray(values))
            }
            (ParameterKind::Real, Some(n), v) => toml_number(v)
                .map(|fill| ParameterValue::RealArray(vec![fill; n]))
                .ok_or_else(mismatch),
            _ => Err(mismatch()),
        }
    }

    /// Convert the value back into TOML for writing values files.
    pub fn to_toml(&self) -> toml::Value {
        match self {
            ParameterValue::Logical(v) => toml::Value::Boolean(*v),
            ParameterValue::Integer(v) => toml::Value::Integer(*v),
            ParameterValue::Real(v) => toml::Value::Float(f64::from(*v)),
            ParameterValue::RealArray(v) => {
                toml::Value::Array(v.iter().map(|x| toml::Value::Float(f64::from(*x))).collect())
            }
            ParameterValue::Text(v) => toml::Value::String(v.clone()),
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Logical(v) => write!(f, "{v}"),
            ParameterValue::Integer(v) => write!(f, "{v}"),
            ParameterValue::Real(v) => write!(f, "{v:e}"),
            ParameterValue::RealArray(v) => {
                let items: Vec<String> = v.iter().map(|x| format!("{x:e}")).collect();
                write!(f, "[{}]", items.join(", "))
            }
            ParameterValue::Text(v) => write!(f, "{v:?}"),
        }
    }
}

#[allow(clippy::unnecessary_cast)]
fn toml_number(value: &toml::Value) -> Option<FloatValue> {
    match value {
        toml::Value::Float(v) => Some(*v as FloatValue),
        toml::Value::Integer(v) => Some(*v as FloatValue),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn test_logical_and_integer() {
        let v = ParameterValue::from_toml(
            "gud_read_phos",
            ParameterKind::Logical,
            None,
            &toml::Value::Boolean(true),
        )
        .unwrap();
        assert_eq!(v, ParameterValue::Logical(true));

        let v = ParameterValue::from_toml(
            "gud_seed",
            ParameterKind::Integer,
            None,
            &toml::Value::Integer(56),
        )
        .unwrap();
        assert_eq!(v.as_integer(), Some(56));
    }

    #[test]
    fn test_integer_accepted_for_real() {
        let v = ParameterValue::from_toml(
            "depthfesed",
            ParameterKind::Real,
            None,
            &toml::Value::Integer(1000),
        )
        .unwrap();
        assert!(is_close!(v.as_real().unwrap() as f64, 1000.0));
    }

    #[test]
    fn test_real_not_accepted_for_integer() {
        let err = ParameterValue::from_toml(
            "gud_seed",
            ParameterKind::Integer,
            None,
            &toml::Value::Float(1.5),
        )
        .unwrap_err();
        assert!(matches!(err, GudError::TypeMismatch { .. }));
        assert!(err.to_string().contains("gud_seed"));
    }

    #[test]
    fn test_array_length_is_checked() {
        let value = toml::Value::Array(vec![toml::Value::Float(1.0), toml::Value::Float(2.0)]);
        let err =
            ParameterValue::from_toml("gud_scatSlopeSmall", ParameterKind::Real, Some(3), &value)
                .unwrap_err();
        match err {
            GudError::DimensionMismatch {
                name,
                expected,
                found,
            } => {
                assert_eq!(name, "gud_scatSlopeSmall");
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("Unexpected error: {other}"),
        }
    }

    #[test]
    fn test_scalar_fills_array() {
        let v = ParameterValue::from_toml(
            "gud_scatSlopeLarge",
            ParameterKind::Real,
            Some(4),
            &toml::Value::Float(0.5),
        )
        .unwrap();
        assert_eq!(v.as_real_array().unwrap().len(), 4);
        assert!(v.as_real_array().unwrap().iter().all(|x| *x == 0.5));
        assert_eq!(v.type_name(), "real array");
    }

    #[test]
    fn test_array_rejected_for_scalar() {
        let value = toml::Value::Array(vec![toml::Value::Float(1.0)]);
        let err =
            ParameterValue::from_toml("phymin", ParameterKind::Real, None, &value).unwrap_err();
        assert!(matches!(err, GudError::TypeMismatch { .. }));
    }

    #[test]
    fn test_to_toml() {
        let v = ParameterValue::RealArray(vec![1.0, 2.5]);
        let t = v.to_toml();
        let back = ParameterValue::from_toml("x", ParameterKind::Real, Some(2), &t).unwrap();
        assert_eq!(v, back);

        assert_eq!(
            ParameterValue::Text("abs.dat".to_string()).to_toml(),
            toml::Value::String("abs.dat".to_string())
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ParameterValue::Logical(false).to_string(), "false");
        assert_eq!(ParameterValue::Integer(3).to_string(), "3");
        assert_eq!(ParameterValue::Text("a".to_string()).to_string(), "\"a\"");
    }
}
