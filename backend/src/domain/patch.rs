//! Partial updates.
//!
//! Every resource kind declares its patch with [`define_patch!`]: one optional
//! field per mutable attribute. Absent fields keep the stored value.

/// Partial update for a record of type `R`.
pub trait Patch<R>: Default {
    /// True when no field is present.
    fn is_empty(&self) -> bool;

    /// Overwrite the fields of `target` that are present in this patch.
    fn apply_to(self, target: &mut R);
}

/// Merge `patch` into `existing`, keeping every absent field unchanged.
pub fn merge<R, P: Patch<R>>(mut existing: R, patch: P) -> R {
    patch.apply_to(&mut existing);
    existing
}

macro_rules! define_patch {
    (
        $(#[$outer:meta])*
        pub struct $name:ident for $target:ty {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Deserialize)]
        #[serde(default, rename_all = "camelCase")]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: Option<$ty>,
            )*
        }

        impl $crate::domain::patch::Patch<$target> for $name {
            fn is_empty(&self) -> bool {
                true $( && self.$field.is_none() )*
            }

            fn apply_to(self, target: &mut $target) {
                $(
                    if let Some(value) = self.$field {
                        target.$field = value;
                    }
                )*
            }
        }
    };
}

pub(crate) use define_patch;
