//! Field-level conversion between tree values and typed struct fields
//!
//! Scalar coercion follows one fixed convention so encode and decode agree:
//! numbers parse with `str::parse` after trimming, booleans accept
//! `true`/`false` in any ASCII case plus `1`/`0`, and dates are RFC 3339.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::{Error, Result};
use crate::value::{Array, Value};

/// Static type tag for a declared model field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Text, number, boolean, or date
    Scalar,
    /// A nested model type
    Model,
    /// Sequence of scalars
    ScalarList,
    /// Sequence of a model type
    ModelList,
}

/// One row of a model type's field descriptor table.
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    /// Declared field name, used as the tree key (case-sensitive).
    pub name: &'static str,
    /// Static type tag of the declared field type.
    pub kind: FieldKind,
    /// True when the field is `Option`-typed and may be unset.
    pub optional: bool,
}

/// Conversion between a tree value and one typed field.
///
/// Implemented here for the scalar types a field may declare, for `Option`
/// (an unset field, omitted on output) and `Vec` (a sequence field with
/// single/many normalization), and by [`model!`](crate::model!) for every
/// model type so models nest.
pub trait TreeField: Sized {
    /// Static type tag recorded in the field descriptor table.
    const KIND: FieldKind;
    /// Whether an unset value exists for this type.
    const OPTIONAL: bool = false;

    /// Coerces a tree value into this type.
    fn from_tree_value(value: &Value) -> Result<Self>;

    /// Projects the field back into a tree value; `None` means unset.
    fn to_tree_value(&self) -> Option<Value>;
}

impl TreeField for String {
    const KIND: FieldKind = FieldKind::Scalar;

    fn from_tree_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(text) => Ok(text.clone()),
            Value::Number(n) => Ok(format_number(*n)),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(coercion_error("text", other)),
        }
    }

    fn to_tree_value(&self) -> Option<Value> {
        Some(Value::String(self.clone()))
    }
}

impl TreeField for i64 {
    const KIND: FieldKind = FieldKind::Scalar;

    #[allow(clippy::as_conversions)]
    fn from_tree_value(value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) if n.fract() == 0.0 && in_i64_range(*n) => Ok(*n as Self),
            Value::String(text) => text
                .trim()
                .parse()
                .map_err(|_| coercion_error("integer", value)),
            other => Err(coercion_error("integer", other)),
        }
    }

    #[allow(clippy::as_conversions)]
    fn to_tree_value(&self) -> Option<Value> {
        Some(Value::Number(*self as f64))
    }
}

impl TreeField for f64 {
    const KIND: FieldKind = FieldKind::Scalar;

    fn from_tree_value(value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) => Ok(*n),
            Value::String(text) => text
                .trim()
                .parse()
                .map_err(|_| coercion_error("number", value)),
            other => Err(coercion_error("number", other)),
        }
    }

    fn to_tree_value(&self) -> Option<Value> {
        Some(Value::Number(*self))
    }
}

impl TreeField for bool {
    const KIND: FieldKind = FieldKind::Scalar;

    fn from_tree_value(value: &Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::String(text) => {
                parse_bool(text).ok_or_else(|| coercion_error("boolean", value))
            }
            other => Err(coercion_error("boolean", other)),
        }
    }

    fn to_tree_value(&self) -> Option<Value> {
        Some(Value::Bool(*self))
    }
}

impl TreeField for OffsetDateTime {
    const KIND: FieldKind = FieldKind::Scalar;

    fn from_tree_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(text) => Self::parse(text.trim(), &Rfc3339)
                .map_err(|_| coercion_error("date", value)),
            other => Err(coercion_error("date", other)),
        }
    }

    fn to_tree_value(&self) -> Option<Value> {
        Some(Value::String(self.format(&Rfc3339).unwrap_or_default()))
    }
}

impl<T: TreeField> TreeField for Option<T> {
    const KIND: FieldKind = T::KIND;
    const OPTIONAL: bool = true;

    fn from_tree_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_tree_value(other).map(Some),
        }
    }

    fn to_tree_value(&self) -> Option<Value> {
        self.as_ref().and_then(TreeField::to_tree_value)
    }
}

impl<T: TreeField> TreeField for Vec<T> {
    const KIND: FieldKind = match T::KIND {
        FieldKind::Model => FieldKind::ModelList,
        _ => FieldKind::ScalarList,
    };

    fn from_tree_value(value: &Value) -> Result<Self> {
        match value {
            Value::Array(items) => items.iter().map(T::from_tree_value).collect(),
            // Single/many normalization: XML cannot distinguish one
            // repetition of a repeatable element from a singular child, so
            // a lone entry becomes a one-element sequence.
            single => Ok(vec![T::from_tree_value(single)?]),
        }
    }

    fn to_tree_value(&self) -> Option<Value> {
        let items: Array = self
            .iter()
            .filter_map(TreeField::to_tree_value)
            .collect();
        Some(Value::Array(items))
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") || text == "1" {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") || text == "0" {
        Some(false)
    } else {
        None
    }
}

#[allow(clippy::as_conversions)]
fn in_i64_range(n: f64) -> bool {
    n >= i64::MIN as f64 && n <= i64::MAX as f64
}

/// Renders a number the way the JSON encoder does, so coercion into text
/// fields agrees with serialized output.
#[allow(clippy::as_conversions)]
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && in_i64_range(n) {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

fn coercion_error(target: &'static str, value: &Value) -> Error {
    let rendered = match value {
        Value::String(text) => text.clone(),
        Value::Number(n) => format_number(*n),
        Value::Bool(b) => b.to_string(),
        other => other.kind_name().to_string(),
    };
    Error::TypeCoercion {
        target,
        value: rendered,
    }
}
