//! Strongly typed record identifiers.
//!
//! Identifiers are assigned by the store as positive integers. Each kind gets
//! its own newtype so a `PetId` can never be handed to an activity lookup.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw store identifier.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Raw store identifier.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_record_id! {
    /// Identifier of a registered [`super::User`].
    UserId
}
define_record_id! {
    /// Identifier of a [`super::Pet`].
    PetId
}
define_record_id! {
    /// Identifier of an [`super::Activity`].
    ActivityId
}
define_record_id! {
    /// Identifier of a [`super::Consultation`].
    ConsultationId
}
define_record_id! {
    /// Identifier of a [`super::Treatment`].
    TreatmentId
}
define_record_id! {
    /// Identifier of a [`super::VaccinationRecord`].
    VaccinationRecordId
}
define_record_id! {
    /// Identifier of a [`super::Vaccination`].
    VaccinationId
}
