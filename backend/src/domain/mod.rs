//! Clinic domain: records, the rules that guard them and the ports they
//! are stored through.
//!
//! Purpose: every mutation of a clinic record passes an ownership check, an
//! authorization check and the kind's date and eligibility rules before the
//! store is touched. The types here are transport agnostic.
//!
//! Public surface:
//! - [`RecordMutationPipeline`]: create/read/update/delete for every record kind.
//! - [`UserAccountsService`] and [`AuthService`]: accounts and authentication.
//! - [`Error`] / [`ErrorCode`]: the error payload every operation returns.
//! - `ports`: traits implemented by outbound adapters.

pub mod access_policy;
pub mod activity;
pub mod auth;
pub mod auth_service;
pub mod consultation;
pub mod eligibility;
pub mod envelope;
pub mod error;
pub mod ids;
pub mod kind;
pub mod ownership;
pub mod patch;
pub mod pet;
pub mod pipeline;
pub mod ports;
pub mod resource;
pub mod rules;
pub mod stores;
pub mod temporal;
pub mod trace_id;
pub mod treatment;
pub mod user;
pub mod user_accounts_service;
pub mod vaccination;
pub mod vaccination_record;

pub use self::access_policy::{AccessDecision, AccessPolicy};
pub use self::activity::{Activity, ActivityPatch, NewActivity};
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::auth_service::AuthService;
pub use self::consultation::{Consultation, ConsultationPatch, NewConsultation};
pub use self::eligibility::{Species, VaccinationEligibilityEngine, age_in_months};
pub use self::envelope::Envelope;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{
    ActivityId, ConsultationId, PetId, TreatmentId, UserId, VaccinationId, VaccinationRecordId,
};
pub use self::kind::ResourceKind;
pub use self::ownership::OwnershipResolver;
pub use self::pet::{NewPet, Pet, PetPatch};
pub use self::pipeline::RecordMutationPipeline;
pub use self::resource::{OwnerRef, Resource};
pub use self::rules::{ManagedResource, RuleContext};
pub use self::stores::ClinicStores;
pub use self::temporal::{TemporalRule, TemporalRuleEvaluator};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::treatment::{NewTreatment, Treatment, TreatmentPatch};
pub use self::user::{NewUser, Principal, Role, User, is_valid_email};
pub use self::user_accounts_service::UserAccountsService;
pub use self::vaccination::{NewVaccination, Vaccination, VaccinationPatch};
pub use self::vaccination_record::{
    NewVaccinationRecord, RecordType, VaccinationRecord, VaccinationRecordPatch,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use vetclinic::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
