//! modelmap - schema-less mapping between JSON/XML documents and typed models
//!
//! A model struct's declared field set is its only schema: there is no
//! schema file and no per-field mapping code. JSON and XML inputs are both
//! normalized into one generic tree value (mapping / sequence / scalar), so
//! a model populated from either source behaves identically. XML quirks -
//! repeated elements, attributes, mixed text content, and the inability to
//! distinguish one repetition from a singular child - are absorbed by the
//! tree builder and the mapper's single/many normalization.
//!
//! # Quick Start
//!
//! ```
//! use modelmap::{model, Model};
//!
//! model! {
//!     pub struct Employee {
//!         pub name: String,
//!         pub age: i64,
//!     }
//! }
//!
//! # fn main() -> Result<(), modelmap::Error> {
//! let employee = Employee::from_json_str(r#"{"name": "Ada", "age": 36}"#)?;
//! assert_eq!(employee.name, "Ada");
//!
//! let same = Employee::from_xml(b"<employee><name>Ada</name><age>36</age></employee>")?;
//! assert_eq!(same, employee);
//!
//! assert_eq!(employee.to_json(), r#"{"name":"Ada","age":36}"#);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, Result};

pub mod value;
pub use value::{Array, Object, Value};

pub mod json;
pub mod xml;

pub mod model;
pub use model::{FieldKind, FieldSpec, Model, TreeField};

mod macros;

/// Parse JSON text into a tree value.
pub fn from_json_str(input: &str) -> Result<Value> {
    json::from_str(input)
}

/// Parse JSON bytes into a tree value.
pub fn from_json_bytes(input: &[u8]) -> Result<Value> {
    json::from_slice(input)
}

/// Convert an XML document into a tree value; the root element's own
/// children are promoted to the top level.
pub fn from_xml_bytes(input: &[u8]) -> Result<Value> {
    xml::build(input)
}

/// Convert an XML document into a tree value, requiring the outermost
/// element to be named `root`.
pub fn from_xml_bytes_with_root(input: &[u8], root: &str) -> Result<Value> {
    xml::build_with_root(input, root)
}
