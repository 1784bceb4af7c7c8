//! Model declaration macro

/// Declares a model struct and generates its mapping schema.
///
/// The macro emits the struct itself, the static field descriptor table,
/// the per-field population and projection arms driven by the
/// [`Model`](crate::Model) trait, and a [`TreeField`](crate::TreeField)
/// impl so the type can nest inside other models and sequences. Callers
/// never write per-field mapping code.
///
/// Field types may be `String`, `i64`, `f64`, `bool`,
/// `Option<time::OffsetDateTime>`, another `model!` type, `Option<_>` of
/// any of these, or `Vec<_>` of any non-`Option` of these. Every field
/// type must implement `Default` for the derived struct default.
///
/// ```
/// use modelmap::{model, Model};
///
/// model! {
///     pub struct Company {
///         pub name: String,
///         pub tags: Vec<String>,
///     }
/// }
///
/// let company = Company::from_json_str(r#"{"name": "Acme", "tags": ["a", "b"]}"#)?;
/// assert_eq!(company.name, "Acme");
/// assert_eq!(company.tags, vec!["a", "b"]);
/// # Ok::<(), modelmap::Error>(())
/// ```
#[macro_export]
macro_rules! model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $field_type:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $field_type,
            )*
        }

        impl $crate::Model for $name {
            const FIELDS: &'static [$crate::FieldSpec] = &[
                $(
                    $crate::FieldSpec {
                        name: stringify!($field),
                        kind: <$field_type as $crate::TreeField>::KIND,
                        optional: <$field_type as $crate::TreeField>::OPTIONAL,
                    },
                )*
            ];

            fn apply(&mut self, name: &str, value: &$crate::Value) -> $crate::Result<()> {
                match name {
                    $(
                        stringify!($field) => {
                            self.$field =
                                <$field_type as $crate::TreeField>::from_tree_value(value)?;
                            Ok(())
                        }
                    )*
                    _ => Ok(()),
                }
            }

            fn field(&self, name: &str) -> Option<$crate::Value> {
                match name {
                    $(
                        stringify!($field) =>
                            <$field_type as $crate::TreeField>::to_tree_value(&self.$field),
                    )*
                    _ => None,
                }
            }
        }

        impl $crate::TreeField for $name {
            const KIND: $crate::FieldKind = $crate::FieldKind::Model;

            fn from_tree_value(value: &$crate::Value) -> $crate::Result<Self> {
                <Self as $crate::Model>::from_tree(value)
            }

            fn to_tree_value(&self) -> Option<$crate::Value> {
                Some(<Self as $crate::Model>::to_tree(self))
            }
        }
    };
}
