//! XML-to-tree conversion
//!
//! Normalizes an XML document into the same mapping/sequence/scalar shape a
//! JSON decoder produces, so the object mapper never needs to know which
//! source format a tree came from.

pub mod builder;

pub use builder::{build, build_with_root, TEXT_KEY};
