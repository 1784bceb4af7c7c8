//! Error taxonomy for tree building and model mapping

use thiserror::Error;

/// Failure classes shared by the tree builder and the object mapper.
///
/// Every variant is terminal for the call that produced it: nothing in this
/// crate performs I/O or retries internally, and a failed populate never
/// leaks a half-populated instance.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The underlying tokenizer or decoder rejected the input.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The document contains no root element.
    #[error("document contains no root element")]
    EmptyDocument,

    /// The outermost element's name differs from the expected root name.
    #[error("root element mismatch: expected `{expected}`, found `{found}`")]
    RootElementMismatch {
        expected: String,
        found: String,
    },

    /// A tree scalar could not be converted to the field's static type.
    #[error("cannot coerce `{value}` into {target}")]
    TypeCoercion {
        target: &'static str,
        value: String,
    },

    /// The top-level tree value has the wrong shape for the conversion.
    #[error("invalid input: expected {expected}, found {found}")]
    InvalidInput {
        expected: &'static str,
        found: &'static str,
    },
}

impl Error {
    /// Wraps a collaborator failure (tokenizer, JSON decoder, UTF-8
    /// validation) into the malformed-input class.
    pub(crate) fn malformed(source: impl std::fmt::Display) -> Self {
        Self::MalformedInput(source.to_string())
    }
}

/// Result type alias for modelmap
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_wraps_display() {
        let err = Error::malformed("unexpected token at 3:1");
        assert_eq!(
            err.to_string(),
            "malformed input: unexpected token at 3:1"
        );
    }

    #[test]
    fn test_root_mismatch_display() {
        let err = Error::RootElementMismatch {
            expected: "company".to_string(),
            found: "employee".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("`company`"));
        assert!(display.contains("`employee`"));
    }

    #[test]
    fn test_coercion_display_names_target() {
        let err = Error::TypeCoercion {
            target: "integer",
            value: "forty-two".to_string(),
        };
        assert_eq!(err.to_string(), "cannot coerce `forty-two` into integer");
    }
}
