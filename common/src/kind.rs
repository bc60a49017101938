//! Macros for defining kind enums.

/// Macro for defining a kind enum.
///
/// Variants are rendered in `kebab-case` both for [`Display`]/[`FromStr`] and
/// for Serde, matching the wire representation of the API.
///
/// [`Display`]: std::fmt::Display
/// [`FromStr`]: std::str::FromStr
///
/// # Example
///
/// ```rust
/// # use crate::common::define_kind;
///
/// define_kind! {
///     #[doc = "Shape kind."]
///     enum Kind {
///         #[doc = "A cube"]
///         Cube,
///
///         #[doc = "A sphere"]
///         Sphere,
///     }
/// }
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            Eq,
            PartialEq,
        )]
        #[derive(
            $crate::private::serde::Deserialize,
            $crate::private::serde::Serialize,
        )]
        #[serde(
            crate = "common::private::serde",
            rename_all = "kebab-case"
        )]
        #[doc = $doc]
        #[strum(
            crate = "common::private::strum",
            serialize_all = "kebab-case"
        )]
        pub enum $name {
            $(
                 #[doc = $variant_doc]
                 $variant,
            )*
        }
    };
}
