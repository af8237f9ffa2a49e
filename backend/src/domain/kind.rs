//! Resource kinds handled by the clinic.

use std::fmt;

use serde::Serialize;

/// Every kind of record the clinic stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    User,
    Pet,
    Activity,
    Consultation,
    Treatment,
    VaccinationRecord,
    Vaccination,
}

impl ResourceKind {
    /// Human-readable singular name used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Pet => "pet",
            Self::Activity => "activity",
            Self::Consultation => "consultation",
            Self::Treatment => "treatment",
            Self::VaccinationRecord => "vaccination record",
            Self::Vaccination => "vaccination",
        }
    }

    /// Human-readable plural name used in messages.
    #[must_use]
    pub const fn plural_label(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Pet => "pets",
            Self::Activity => "activities",
            Self::Consultation => "consultations",
            Self::Treatment => "treatments",
            Self::VaccinationRecord => "vaccination records",
            Self::Vaccination => "vaccinations",
        }
    }

    /// JSON key naming a single entity in a response envelope.
    #[must_use]
    pub const fn singular_key(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Pet => "pet",
            Self::Activity => "activity",
            Self::Consultation => "consultation",
            Self::Treatment => "treatment",
            Self::VaccinationRecord => "vaccinationRecord",
            Self::Vaccination => "vaccination",
        }
    }

    /// JSON key naming a list of entities in a response envelope.
    #[must_use]
    pub const fn plural_key(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Pet => "pets",
            Self::Activity => "activities",
            Self::Consultation => "consultations",
            Self::Treatment => "treatments",
            Self::VaccinationRecord => "vaccinationRecords",
            Self::Vaccination => "vaccinations",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
