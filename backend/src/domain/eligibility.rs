//! Species and age eligibility for vaccination cards.
//!
//! Dogs start on a `cachorro` card and cats on a `gatito` card; both move to
//! `adulto` at twelve months. A pet holds at most one card of each type.
//! Species outside this matrix are not checked.

use chrono::{Datelike, NaiveDate};

use super::ports::{RecordFilter, RecordStore};
use super::stores::map_store_error;
use super::vaccination_record::record_key;
use super::{Error, Pet, PetId, RecordType, ResourceKind, VaccinationRecord};

/// Age at which a pet moves onto an adult card.
pub const ADULT_AGE_MONTHS: i32 = 12;

/// Species with an eligibility matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Species {
    Dog,
    Cat,
}

impl Species {
    /// Recognise a free-text species, in Spanish or English, ignoring case.
    #[must_use]
    pub fn recognise(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "perro" | "dog" => Some(Self::Dog),
            "gato" | "cat" => Some(Self::Cat),
            _ => None,
        }
    }

    /// Card type for pets younger than [`ADULT_AGE_MONTHS`].
    #[must_use]
    pub const fn juvenile_card(self) -> RecordType {
        match self {
            Self::Dog => RecordType::Cachorro,
            Self::Cat => RecordType::Gatito,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Dog => "dog",
            Self::Cat => "cat",
        }
    }
}

/// Whole months from `birth` to `today`, dropping an incomplete final month.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use vetclinic::domain::age_in_months;
///
/// let birth = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
/// let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
/// assert_eq!(age_in_months(birth, today), 11);
/// ```
#[must_use]
pub fn age_in_months(birth: NaiveDate, today: NaiveDate) -> i32 {
    let months = month_index(today) - month_index(birth);
    if today.day() < birth.day() {
        months - 1
    } else {
        months
    }
}

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + i32::try_from(date.month0()).unwrap_or_default()
}

/// Apply the species/age matrix to a requested card type.
pub fn check_matrix(species: Species, age_months: i32, record_type: RecordType) -> Result<(), Error> {
    let juvenile = species.juvenile_card();
    if record_type != juvenile && record_type != RecordType::Adulto {
        return Err(Error::invalid_field(
            "recordType",
            format!("must be adulto or {juvenile} for a {}", species.label()),
        ));
    }
    let is_adult = age_months >= ADULT_AGE_MONTHS;
    match (record_type == RecordType::Adulto, is_adult) {
        (false, true) => Err(Error::invalid_field(
            "recordType",
            format!("{juvenile} requires an age under {ADULT_AGE_MONTHS} months"),
        )),
        (true, false) => Err(Error::invalid_field(
            "recordType",
            format!("adulto requires an age of at least {ADULT_AGE_MONTHS} months"),
        )),
        _ => Ok(()),
    }
}

/// Checks whether a pet may receive a vaccination card of a given type.
pub struct VaccinationEligibilityEngine<'a> {
    records: &'a dyn RecordStore<VaccinationRecord>,
}

impl<'a> VaccinationEligibilityEngine<'a> {
    pub fn new(records: &'a dyn RecordStore<VaccinationRecord>) -> Self {
        Self { records }
    }

    /// Whether the pet already holds a card of `record_type`.
    pub async fn exists(&self, pet_id: PetId, record_type: RecordType) -> Result<bool, Error> {
        let cards = self
            .records
            .find_by(RecordFilter::ForPet(pet_id))
            .await
            .map_err(|err| map_store_error(ResourceKind::VaccinationRecord, err))?;
        Ok(cards.iter().any(|card| card.record_type == record_type))
    }

    /// Matrix check followed by the per-pet uniqueness check.
    ///
    /// Unrecognised species skip both; the store's own constraint still
    /// guards uniqueness for them.
    pub async fn ensure_eligible(
        &self,
        pet: &Pet,
        record_type: RecordType,
        today: NaiveDate,
    ) -> Result<(), Error> {
        let Some(species) = Species::recognise(&pet.species) else {
            return Ok(());
        };
        let age = age_in_months(pet.birth_date.date_naive(), today);
        check_matrix(species, age, record_type)?;
        if self.exists(pet.id, record_type).await? {
            return Err(Error::duplicate(
                ResourceKind::VaccinationRecord,
                record_key(pet.id, record_type),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[rstest]
    #[case(date(2023, 6, 15), date(2024, 6, 10), 11)]
    #[case(date(2023, 6, 15), date(2024, 6, 20), 12)]
    #[case(date(2023, 6, 15), date(2024, 6, 15), 12)]
    #[case(date(2024, 1, 31), date(2024, 2, 29), 0)]
    #[case(date(2024, 3, 1), date(2024, 3, 1), 0)]
    fn whole_months(#[case] birth: NaiveDate, #[case] today: NaiveDate, #[case] expected: i32) {
        assert_eq!(age_in_months(birth, today), expected);
    }

    #[rstest]
    #[case(" Perro ", Some(Species::Dog))]
    #[case("DOG", Some(Species::Dog))]
    #[case("gato", Some(Species::Cat))]
    #[case("Cat", Some(Species::Cat))]
    #[case("Conejo", None)]
    fn species_recognition(#[case] raw: &str, #[case] expected: Option<Species>) {
        assert_eq!(Species::recognise(raw), expected);
    }

    #[rstest]
    #[case(Species::Dog, 11, RecordType::Cachorro)]
    #[case(Species::Dog, 12, RecordType::Adulto)]
    #[case(Species::Cat, 0, RecordType::Gatito)]
    #[case(Species::Cat, 30, RecordType::Adulto)]
    fn matrix_accepts(#[case] species: Species, #[case] age: i32, #[case] record: RecordType) {
        assert!(check_matrix(species, age, record).is_ok());
    }

    #[rstest]
    #[case(Species::Dog, 13, RecordType::Cachorro)]
    #[case(Species::Dog, 11, RecordType::Adulto)]
    #[case(Species::Dog, 3, RecordType::Gatito)]
    #[case(Species::Cat, 12, RecordType::Gatito)]
    #[case(Species::Cat, 3, RecordType::Cachorro)]
    fn matrix_rejects(#[case] species: Species, #[case] age: i32, #[case] record: RecordType) {
        let err = check_matrix(species, age, record).expect_err("ineligible card");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
