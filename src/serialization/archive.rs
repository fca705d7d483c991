use super::error::Result;
use super::serializer::Serializer;

/// Walks a fixed, ordered list of fields through a bound [`Serializer`].
///
/// The same walk serves both directions: each call such as `s.data(&mut x)`
/// writes `x` when serializing and overwrites it when deserializing.
pub trait Fields {
    fn fields(&mut self, s: &mut Serializer<'_>) -> Result<()>;
}

/// A versioned record. The version is written ahead of the fields and the
/// value read back is stored on the instance so gated fields can test it.
pub trait Archive: Fields {
    const VERSION: i32 = 0;

    fn version(&self) -> i32;
    fn set_version(&mut self, version: i32);
}

/// Declares a versioned record together with its field walk.
///
/// Each field names the [`Serializer`] method that carries it (`data`,
/// `list`, `bulk`, `archive`, `archives` or `inline`). Fields added after the
/// first release are marked `@since(n)` and are only present in streams whose
/// stored version is at least `n`. New fields go at the end.
///
/// ```ignore
/// archive! {
///     pub struct FogData: 1 {
///         data enabled: bool = false,
///         @since(1) data density: f32 = 0.05,
///     }
/// }
/// ```
#[macro_export]
macro_rules! archive {
    (
        $(#[$meta:meta])*
        pub struct $name:ident : $version:literal {
            $(
                $(#[$field_meta:meta])*
                $(@since($since:literal))?
                $how:ident $field:ident : $ty:ty = $default:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize)]
        pub struct $name {
            pub version: i32,
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )*
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self {
                    version: $version,
                    $( $field: $default, )*
                }
            }
        }

        impl $crate::serialization::Fields for $name {
            fn fields(
                &mut self,
                s: &mut $crate::serialization::Serializer<'_>,
            ) -> $crate::serialization::Result<()> {
                $(
                    if self.version >= 0 $(+ $since)? {
                        s.$how(&mut self.$field)?;
                    }
                )*
                Ok(())
            }
        }

        impl $crate::serialization::Archive for $name {
            const VERSION: i32 = $version;

            fn version(&self) -> i32 {
                self.version
            }

            fn set_version(&mut self, version: i32) {
                self.version = version;
            }
        }
    };
}
