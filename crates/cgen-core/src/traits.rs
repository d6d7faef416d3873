use crate::error::Result;
use crate::timestamp::TimeStamp;

/// Validate structural integrity of an input or configuration.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// An input whose modification time drives lazy recomputation downstream.
pub trait Tracked {
    /// Stamp of the last modification.
    fn mtime(&self) -> TimeStamp;
}

/// A closed set of configuration choices with stable string names.
///
/// The names are the ones used in serialized configuration records.
pub trait NamedVariant: Sized + Copy + 'static {
    /// What kind of choice this is, for diagnostics ("curve type", ...).
    const KIND: &'static str;
    /// Every variant, in declaration order.
    const VARIANTS: &'static [Self];

    fn as_str(self) -> &'static str;

    /// Look up a variant by its name.
    fn from_name(name: &str) -> Result<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| v.as_str() == name)
            .ok_or_else(|| {
                crate::CurveError::ConfigurationMismatch(format!(
                    "Unknown {}: {:?}",
                    Self::KIND,
                    name
                ))
            })
    }
}

/// Implement `FromStr` and `Display` for a [`NamedVariant`] through its names.
#[macro_export]
macro_rules! named_variant_str {
    ($ty:ty) => {
        impl ::std::str::FromStr for $ty {
            type Err = $crate::CurveError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                <$ty as $crate::traits::NamedVariant>::from_name(s)
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::traits::NamedVariant::as_str(*self))
            }
        }
    };
}
