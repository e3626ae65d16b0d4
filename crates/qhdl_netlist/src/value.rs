//! Generic parameter types and their elaboration-time values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of a generic parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenericType {
    /// `real`
    Real,
    /// `integer`, also written `int`.
    Integer,
    /// `natural`: an integer of at least 0.
    Natural,
    /// `positive`: an integer of at least 1.
    Positive,
    /// `boolean`
    Boolean,
    /// `string`
    String,
}

impl GenericType {
    /// Maps a type name (case-insensitive) to a supported type.
    pub fn from_name(name: &str) -> Option<GenericType> {
        match name.to_ascii_lowercase().as_str() {
            "real" => Some(GenericType::Real),
            "integer" | "int" => Some(GenericType::Integer),
            "natural" => Some(GenericType::Natural),
            "positive" => Some(GenericType::Positive),
            "boolean" | "bool" => Some(GenericType::Boolean),
            "string" => Some(GenericType::String),
            _ => None,
        }
    }

    /// Smallest integer this type admits, if it is an integer type.
    pub fn integer_floor(self) -> Option<i64> {
        match self {
            GenericType::Integer => Some(i64::MIN),
            GenericType::Natural => Some(0),
            GenericType::Positive => Some(1),
            GenericType::Real | GenericType::Boolean | GenericType::String => None,
        }
    }
}

impl fmt::Display for GenericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GenericType::Real => "real",
            GenericType::Integer => "integer",
            GenericType::Natural => "natural",
            GenericType::Positive => "positive",
            GenericType::Boolean => "boolean",
            GenericType::String => "string",
        })
    }
}

/// A fully evaluated generic value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    /// A real number.
    Real(f64),
    /// An integer.
    Integer(i64),
    /// A boolean.
    Boolean(bool),
    /// A string.
    String(String),
}

impl Value {
    /// The type of this value.
    pub fn ty(&self) -> GenericType {
        match self {
            Value::Real(_) => GenericType::Real,
            Value::Integer(_) => GenericType::Integer,
            Value::Boolean(_) => GenericType::Boolean,
            Value::String(_) => GenericType::String,
        }
    }

    /// Converts to `ty`, widening integers to reals.
    ///
    /// Returns `None` when the value cannot be represented as `ty`, including
    /// an integer below the range of `natural` or `positive`.
    pub fn coerce_to(self, ty: GenericType) -> Option<Value> {
        match (self, ty) {
            (Value::Integer(i), GenericType::Real) => Some(Value::Real(i as f64)),
            (Value::Integer(i), ty) => ty
                .integer_floor()
                .filter(|&floor| i >= floor)
                .map(|_| Value::Integer(i)),
            (value, ty) if value.ty() == ty => Some(value),
            _ => None,
        }
    }

    /// The value as a real, if numeric.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(r) => Some(*r),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Bytes identifying this value exactly, used in graph fingerprints.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = vec![self.ty() as u8];
        match self {
            Value::Real(r) => out.extend_from_slice(&r.to_bits().to_le_bytes()),
            Value::Integer(i) => out.extend_from_slice(&i.to_le_bytes()),
            Value::Boolean(b) => out.push(u8::from(*b)),
            Value::String(s) => out.extend_from_slice(s.as_bytes()),
        }
        out
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Real(r) => write!(f, "{r:?}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::String(s) => write!(f, "{s:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_and_aliases() {
        assert_eq!(GenericType::from_name("REAL"), Some(GenericType::Real));
        assert_eq!(GenericType::from_name("int"), Some(GenericType::Integer));
        assert_eq!(GenericType::from_name("Natural"), Some(GenericType::Natural));
        assert_eq!(GenericType::from_name("POSITIVE"), Some(GenericType::Positive));
        assert_eq!(GenericType::from_name("Boolean"), Some(GenericType::Boolean));
        assert_eq!(GenericType::from_name("fieldmode"), None);
    }

    #[test]
    fn integer_widens_to_real() {
        assert_eq!(Value::Integer(2).coerce_to(GenericType::Real), Some(Value::Real(2.0)));
        assert_eq!(Value::Real(0.5).coerce_to(GenericType::Integer), None);
        assert_eq!(Value::Boolean(true).coerce_to(GenericType::String), None);
        assert_eq!(
            Value::String("x".into()).coerce_to(GenericType::String),
            Some(Value::String("x".into()))
        );
    }

    #[test]
    fn integer_subtypes_are_range_checked() {
        assert_eq!(Value::Integer(0).coerce_to(GenericType::Natural), Some(Value::Integer(0)));
        assert_eq!(Value::Integer(-1).coerce_to(GenericType::Natural), None);
        assert_eq!(Value::Integer(1).coerce_to(GenericType::Positive), Some(Value::Integer(1)));
        assert_eq!(Value::Integer(0).coerce_to(GenericType::Positive), None);
        assert_eq!(Value::Integer(-5).coerce_to(GenericType::Positive), None);
        assert_eq!(Value::Integer(i64::MIN).coerce_to(GenericType::Integer), Some(Value::Integer(i64::MIN)));
        assert_eq!(Value::Real(1.0).coerce_to(GenericType::Natural), None);
        assert_eq!(GenericType::Positive.to_string(), "positive");
    }

    #[test]
    fn display() {
        assert_eq!(Value::Real(0.7853981633974483).to_string(), "0.7853981633974483");
        assert_eq!(Value::Real(1.0).to_string(), "1.0");
        assert_eq!(Value::Integer(-3).to_string(), "-3");
        assert_eq!(Value::String("bs".into()).to_string(), "\"bs\"");
    }

    #[test]
    fn canonical_bytes_distinguish_types() {
        assert_ne!(
            Value::Integer(1).canonical_bytes(),
            Value::Real(1.0).canonical_bytes()
        );
        assert_eq!(Value::Real(0.25).canonical_bytes(), Value::Real(0.25).canonical_bytes());
    }

    #[test]
    fn serde_roundtrip() {
        for value in [
            Value::Real(0.7853981633974483),
            Value::Integer(-100),
            Value::Boolean(false),
            Value::String("phase".into()),
        ] {
            let json = serde_json::to_string(&value).unwrap();
            assert_eq!(serde_json::from_str::<Value>(&json).unwrap(), value);
        }
    }
}
