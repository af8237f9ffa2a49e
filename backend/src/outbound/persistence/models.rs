//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Each table has a `*Row` read through
//! `Selectable` and a borrowed `*Values` struct used for both inserts and
//! full-row updates.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::domain::ports::{RecordStoreError, UserPersistenceError};
use crate::domain::{
    Activity, Consultation, NewActivity, NewConsultation, NewPet, NewTreatment, NewVaccination,
    NewVaccinationRecord, Pet, RecordType, Role, Treatment, User, UserId, Vaccination,
    VaccinationRecord,
};

use super::schema::{
    activities, consultations, pets, treatments, users, vaccination_records, vaccinations,
};

/// Conversion from a database row into its domain record.
pub(crate) trait IntoDomain {
    type Domain;

    fn into_domain(self) -> Result<Self::Domain, RecordStoreError>;
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, UserPersistenceError> {
        let role = Role::from_str(&self.role)
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        Ok(User {
            id: UserId::new(self.id),
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role,
        })
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserValues<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'static str,
}

// ---------------------------------------------------------------------------
// Pets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PetRow {
    pub id: i64,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub birth_date: DateTime<Utc>,
    pub color: String,
    pub owner_id: i64,
}

impl IntoDomain for PetRow {
    type Domain = Pet;

    fn into_domain(self) -> Result<Pet, RecordStoreError> {
        Ok(Pet {
            id: self.id.into(),
            name: self.name,
            species: self.species,
            breed: self.breed,
            birth_date: self.birth_date,
            color: self.color,
            owner_id: self.owner_id.into(),
        })
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = pets)]
pub(crate) struct PetValues<'a> {
    pub name: &'a str,
    pub species: &'a str,
    pub breed: &'a str,
    pub birth_date: DateTime<Utc>,
    pub color: &'a str,
    pub owner_id: i64,
}

impl<'a> From<&'a NewPet> for PetValues<'a> {
    fn from(pet: &'a NewPet) -> Self {
        Self {
            name: &pet.name,
            species: &pet.species,
            breed: &pet.breed,
            birth_date: pet.birth_date,
            color: &pet.color,
            owner_id: pet.owner_id.get(),
        }
    }
}

impl<'a> From<&'a Pet> for PetValues<'a> {
    fn from(pet: &'a Pet) -> Self {
        Self {
            name: &pet.name,
            species: &pet.species,
            breed: &pet.breed,
            birth_date: pet.birth_date,
            color: &pet.color,
            owner_id: pet.owner_id.get(),
        }
    }
}

// ---------------------------------------------------------------------------
// Activities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = activities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ActivityRow {
    pub id: i64,
    pub activity_type: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub pet_id: i64,
}

impl IntoDomain for ActivityRow {
    type Domain = Activity;

    fn into_domain(self) -> Result<Activity, RecordStoreError> {
        Ok(Activity {
            id: self.id.into(),
            activity_type: self.activity_type,
            description: self.description,
            date: self.date,
            pet_id: self.pet_id.into(),
        })
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = activities)]
pub(crate) struct ActivityValues<'a> {
    pub activity_type: &'a str,
    pub description: &'a str,
    pub date: DateTime<Utc>,
    pub pet_id: i64,
}

impl<'a> From<&'a NewActivity> for ActivityValues<'a> {
    fn from(activity: &'a NewActivity) -> Self {
        Self {
            activity_type: &activity.activity_type,
            description: &activity.description,
            date: activity.date,
            pet_id: activity.pet_id.get(),
        }
    }
}

impl<'a> From<&'a Activity> for ActivityValues<'a> {
    fn from(activity: &'a Activity) -> Self {
        Self {
            activity_type: &activity.activity_type,
            description: &activity.description,
            date: activity.date,
            pet_id: activity.pet_id.get(),
        }
    }
}

// ---------------------------------------------------------------------------
// Consultations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = consultations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ConsultationRow {
    pub id: i64,
    pub veterinarian: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub pet_id: i64,
}

impl IntoDomain for ConsultationRow {
    type Domain = Consultation;

    fn into_domain(self) -> Result<Consultation, RecordStoreError> {
        Ok(Consultation {
            id: self.id.into(),
            veterinarian: self.veterinarian,
            description: self.description,
            date: self.date,
            pet_id: self.pet_id.into(),
        })
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = consultations)]
pub(crate) struct ConsultationValues<'a> {
    pub veterinarian: &'a str,
    pub description: &'a str,
    pub date: DateTime<Utc>,
    pub pet_id: i64,
}

impl<'a> From<&'a NewConsultation> for ConsultationValues<'a> {
    fn from(consultation: &'a NewConsultation) -> Self {
        Self {
            veterinarian: &consultation.veterinarian,
            description: &consultation.description,
            date: consultation.date,
            pet_id: consultation.pet_id.get(),
        }
    }
}

impl<'a> From<&'a Consultation> for ConsultationValues<'a> {
    fn from(consultation: &'a Consultation) -> Self {
        Self {
            veterinarian: &consultation.veterinarian,
            description: &consultation.description,
            date: consultation.date,
            pet_id: consultation.pet_id.get(),
        }
    }
}

// ---------------------------------------------------------------------------
// Treatments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = treatments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TreatmentRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub pet_id: i64,
}

impl IntoDomain for TreatmentRow {
    type Domain = Treatment;

    fn into_domain(self) -> Result<Treatment, RecordStoreError> {
        Ok(Treatment {
            id: self.id.into(),
            name: self.name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            pet_id: self.pet_id.into(),
        })
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = treatments)]
pub(crate) struct TreatmentValues<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub pet_id: i64,
}

impl<'a> From<&'a NewTreatment> for TreatmentValues<'a> {
    fn from(treatment: &'a NewTreatment) -> Self {
        Self {
            name: &treatment.name,
            description: &treatment.description,
            start_date: treatment.start_date,
            end_date: treatment.end_date,
            pet_id: treatment.pet_id.get(),
        }
    }
}

impl<'a> From<&'a Treatment> for TreatmentValues<'a> {
    fn from(treatment: &'a Treatment) -> Self {
        Self {
            name: &treatment.name,
            description: &treatment.description,
            start_date: treatment.start_date,
            end_date: treatment.end_date,
            pet_id: treatment.pet_id.get(),
        }
    }
}

// ---------------------------------------------------------------------------
// Vaccination records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = vaccination_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VaccinationRecordRow {
    pub id: i64,
    pub record_type: String,
    pub pet_id: i64,
}

impl IntoDomain for VaccinationRecordRow {
    type Domain = VaccinationRecord;

    fn into_domain(self) -> Result<VaccinationRecord, RecordStoreError> {
        let record_type = RecordType::from_str(&self.record_type)
            .map_err(|err| RecordStoreError::query(err.to_string()))?;
        Ok(VaccinationRecord {
            id: self.id.into(),
            record_type,
            pet_id: self.pet_id.into(),
        })
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = vaccination_records)]
pub(crate) struct VaccinationRecordValues {
    pub record_type: &'static str,
    pub pet_id: i64,
}

impl From<&NewVaccinationRecord> for VaccinationRecordValues {
    fn from(record: &NewVaccinationRecord) -> Self {
        Self {
            record_type: record.record_type.as_str(),
            pet_id: record.pet_id.get(),
        }
    }
}

impl From<&VaccinationRecord> for VaccinationRecordValues {
    fn from(record: &VaccinationRecord) -> Self {
        Self {
            record_type: record.record_type.as_str(),
            pet_id: record.pet_id.get(),
        }
    }
}

// ---------------------------------------------------------------------------
// Vaccinations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = vaccinations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VaccinationRow {
    pub id: i64,
    pub name: String,
    pub application_date: DateTime<Utc>,
    pub weight: BigDecimal,
    pub pet_id: i64,
    pub vaccination_record_id: i64,
}

/// NUMERIC values travel through their decimal string form.
fn numeric_to_decimal(value: &BigDecimal) -> Result<Decimal, RecordStoreError> {
    let text = value.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|err| RecordStoreError::query(format!("weight {text} out of range: {err}")))
}

fn decimal_to_numeric(value: Decimal) -> BigDecimal {
    BigDecimal::new(value.mantissa().into(), i64::from(value.scale()))
}

impl IntoDomain for VaccinationRow {
    type Domain = Vaccination;

    fn into_domain(self) -> Result<Vaccination, RecordStoreError> {
        Ok(Vaccination {
            id: self.id.into(),
            name: self.name,
            application_date: self.application_date,
            weight: numeric_to_decimal(&self.weight)?,
            pet_id: self.pet_id.into(),
            vaccination_record_id: self.vaccination_record_id.into(),
        })
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = vaccinations)]
pub(crate) struct VaccinationValues<'a> {
    pub name: &'a str,
    pub application_date: DateTime<Utc>,
    pub weight: BigDecimal,
    pub pet_id: i64,
    pub vaccination_record_id: i64,
}

impl<'a> From<&'a NewVaccination> for VaccinationValues<'a> {
    fn from(vaccination: &'a NewVaccination) -> Self {
        Self {
            name: &vaccination.name,
            application_date: vaccination.application_date,
            weight: decimal_to_numeric(vaccination.weight),
            pet_id: vaccination.pet_id.get(),
            vaccination_record_id: vaccination.vaccination_record_id.get(),
        }
    }
}

impl<'a> From<&'a Vaccination> for VaccinationValues<'a> {
    fn from(vaccination: &'a Vaccination) -> Self {
        Self {
            name: &vaccination.name,
            application_date: vaccination.application_date,
            weight: decimal_to_numeric(vaccination.weight),
            pet_id: vaccination.pet_id.get(),
            vaccination_record_id: vaccination.vaccination_record_id.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Decimal::new(1_235, 2))]
    #[case(Decimal::new(700, 2))]
    #[case(Decimal::new(-5, 1))]
    fn weights_survive_numeric_conversion(#[case] weight: Decimal) {
        let numeric = decimal_to_numeric(weight);
        assert_eq!(numeric_to_decimal(&numeric).expect("in range"), weight);
    }

    #[rstest]
    fn unknown_record_type_is_a_query_error() {
        let row = VaccinationRecordRow {
            id: 1,
            record_type: "senior".into(),
            pet_id: 2,
        };
        assert!(matches!(
            row.into_domain(),
            Err(RecordStoreError::Query { .. })
        ));
    }
}
