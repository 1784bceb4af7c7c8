//! Object mapping driven by a static field descriptor table
//!
//! A model type's declared field set is its only schema: populating from a
//! tree and serializing back both iterate the same compile-time table, so
//! callers never write per-field mapping code. The table and the per-field
//! match arms are generated by [`model!`](crate::model!).

use tracing::trace;

use crate::error::{Error, Result};
use crate::value::{Object, Value};
use crate::{json, xml};

pub mod field;

pub use field::{FieldKind, FieldSpec, TreeField};

/// A typed value whose declared field set is its mapping schema.
///
/// Implementations are generated by [`model!`](crate::model!); everything
/// below `field` is a provided operation composed from the table.
///
/// Population is all-or-nothing: a coercion failure on any field aborts the
/// call and the partially built instance is dropped.
pub trait Model: Default {
    /// Field descriptor table, in declaration order.
    const FIELDS: &'static [FieldSpec];

    /// Populates one declared field from a tree entry.
    fn apply(&mut self, name: &str, value: &Value) -> Result<()>;

    /// Projects one declared field into a tree value; `None` means unset
    /// and the field is omitted from serialized output.
    fn field(&self, name: &str) -> Option<Value>;

    /// Builds an instance from a tree value, which must be a mapping.
    ///
    /// Entries with no matching field are ignored, and declared fields with
    /// no matching entry (or a null entry) keep their default value; both
    /// are deliberate tolerance for schema evolution.
    fn from_tree(tree: &Value) -> Result<Self> {
        let Value::Object(entries) = tree else {
            return Err(Error::InvalidInput {
                expected: "mapping",
                found: tree.kind_name(),
            });
        };
        trace!(fields = Self::FIELDS.len(), "populating model from tree");
        let mut instance = Self::default();
        for spec in Self::FIELDS {
            match entries.get(spec.name) {
                None | Some(Value::Null) => {}
                Some(value) => instance.apply(spec.name, value)?,
            }
        }
        Ok(instance)
    }

    /// Serializes the instance into a tree mapping, keyed by field name in
    /// declaration order. Unset fields are omitted. Always succeeds.
    fn to_tree(&self) -> Value {
        let mut entries = Object::new();
        for spec in Self::FIELDS {
            if let Some(value) = self.field(spec.name) {
                entries.insert(spec.name, value);
            }
        }
        Value::Object(entries)
    }

    /// Builds an instance from JSON text.
    fn from_json_str(input: &str) -> Result<Self> {
        Self::from_tree(&json::from_str(input)?)
    }

    /// Builds an instance from JSON bytes.
    fn from_json(input: &[u8]) -> Result<Self> {
        Self::from_tree(&json::from_slice(input)?)
    }

    /// Builds an instance from an XML document; the root element's tag name
    /// is discarded and its content populates the fields.
    fn from_xml(input: &[u8]) -> Result<Self> {
        Self::from_tree(&xml::build(input)?)
    }

    /// Builds an instance from an XML document whose outermost element must
    /// be named `root`.
    fn from_xml_with_root(input: &[u8], root: &str) -> Result<Self> {
        Self::from_tree(&xml::build_with_root(input, root)?)
    }

    /// Compact JSON rendition of the instance.
    fn to_json(&self) -> String {
        json::to_string(&self.to_tree())
    }

    /// Indented JSON rendition of the instance.
    fn to_json_pretty(&self) -> String {
        json::to_string_pretty(&self.to_tree())
    }

    /// Declared field names, in declaration order.
    fn all_keys() -> Vec<&'static str> {
        Self::FIELDS.iter().map(|spec| spec.name).collect()
    }
}
