//! PostgreSQL-backed implementation of every clinic store port.
//!
//! Adapters only translate between Diesel rows and domain records; the
//! database's unique constraints surface as conflicts.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    RecordFilter, RecordStore, RecordStoreError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Activity, ActivityId, Consultation, ConsultationId, NewActivity, NewConsultation, NewPet,
    NewTreatment, NewUser, NewVaccination, NewVaccinationRecord, Pet, PetId, Treatment,
    TreatmentId, User, UserId, Vaccination, VaccinationId, VaccinationRecord,
    VaccinationRecordId,
};

use super::diesel_error_mapping::{map_basic_pool_error, map_diesel_error};
use super::models::{
    ActivityRow, ActivityValues, ConsultationRow, ConsultationValues, IntoDomain, PetRow,
    PetValues, TreatmentRow, TreatmentValues, UserRow, UserValues, VaccinationRecordRow,
    VaccinationRecordValues, VaccinationRow, VaccinationValues,
};
use super::pool::{DbPool, PoolError};
use super::schema::{
    activities, consultations, pets, treatments, users, vaccination_records, vaccinations,
};

/// Diesel-backed implementation of the user and record store ports.
#[derive(Clone)]
pub struct DieselStore {
    pool: DbPool,
}

impl DieselStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecordStoreError {
    map_basic_pool_error(error, RecordStoreError::connection)
}

fn map_record_error(error: diesel::result::Error) -> RecordStoreError {
    map_diesel_error(
        error,
        RecordStoreError::query,
        RecordStoreError::connection,
        RecordStoreError::conflict,
    )
}

fn map_user_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_user_diesel_error(error: diesel::result::Error, email: &str) -> UserPersistenceError {
    let email = email.to_owned();
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
        |_| UserPersistenceError::conflict(email),
    )
}

fn into_domain_all<R: IntoDomain>(rows: Vec<R>) -> Result<Vec<R::Domain>, RecordStoreError> {
    rows.into_iter().map(IntoDomain::into_domain).collect()
}

macro_rules! impl_record_store {
    (@owned_by pets, $row:ty, $owner:expr, $conn:expr) => {
        pets::table
            .filter(pets::owner_id.eq($owner))
            .select(<$row>::as_select())
            .order(pets::id)
            .load::<$row>($conn)
            .await
    };
    (@owned_by $table:ident, $row:ty, $owner:expr, $conn:expr) => {
        $table::table
            .inner_join(pets::table)
            .filter(pets::owner_id.eq($owner))
            .select(<$row>::as_select())
            .order($table::id)
            .load::<$row>($conn)
            .await
    };
    (@for_pet pets, $row:ty, $pet:expr, $conn:expr) => {
        pets::table
            .filter(pets::id.eq($pet))
            .select(<$row>::as_select())
            .load::<$row>($conn)
            .await
    };
    (@for_pet $table:ident, $row:ty, $pet:expr, $conn:expr) => {
        $table::table
            .filter($table::pet_id.eq($pet))
            .select(<$row>::as_select())
            .order($table::id)
            .load::<$row>($conn)
            .await
    };
    ($($resource:ty, $id:ty, $draft:ty => $table:ident, $row:ty, $values:ident;)*) => {
        $(
            #[async_trait]
            impl RecordStore<$resource> for DieselStore {
                async fn find_by_id(&self, id: $id) -> Result<Option<$resource>, RecordStoreError> {
                    let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                    $table::table
                        .find(id.get())
                        .select(<$row>::as_select())
                        .first::<$row>(&mut conn)
                        .await
                        .optional()
                        .map_err(map_record_error)?
                        .map(IntoDomain::into_domain)
                        .transpose()
                }

                async fn find_by(
                    &self,
                    filter: RecordFilter,
                ) -> Result<Vec<$resource>, RecordStoreError> {
                    let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                    let rows = match filter {
                        RecordFilter::All => {
                            $table::table
                                .select(<$row>::as_select())
                                .order($table::id)
                                .load::<$row>(&mut conn)
                                .await
                        }
                        RecordFilter::OwnedBy(owner) => {
                            impl_record_store!(@owned_by $table, $row, owner.get(), &mut conn)
                        }
                        RecordFilter::ForPet(pet_id) => {
                            impl_record_store!(@for_pet $table, $row, pet_id.get(), &mut conn)
                        }
                    }
                    .map_err(map_record_error)?;
                    into_domain_all(rows)
                }

                async fn create(&self, draft: &$draft) -> Result<$resource, RecordStoreError> {
                    let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                    let values = $values::from(draft);
                    diesel::insert_into($table::table)
                        .values(&values)
                        .returning(<$row>::as_returning())
                        .get_result::<$row>(&mut conn)
                        .await
                        .map_err(map_record_error)?
                        .into_domain()
                }

                async fn update(
                    &self,
                    record: &$resource,
                ) -> Result<Option<$resource>, RecordStoreError> {
                    let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                    let values = $values::from(record);
                    diesel::update($table::table.find(record.id.get()))
                        .set(&values)
                        .returning(<$row>::as_returning())
                        .get_result::<$row>(&mut conn)
                        .await
                        .optional()
                        .map_err(map_record_error)?
                        .map(IntoDomain::into_domain)
                        .transpose()
                }

                async fn delete(&self, id: $id) -> Result<Option<$resource>, RecordStoreError> {
                    let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                    diesel::delete($table::table.find(id.get()))
                        .returning(<$row>::as_returning())
                        .get_result::<$row>(&mut conn)
                        .await
                        .optional()
                        .map_err(map_record_error)?
                        .map(IntoDomain::into_domain)
                        .transpose()
                }
            }
        )*
    };
}

impl_record_store! {
    Pet, PetId, NewPet => pets, PetRow, PetValues;
    Activity, ActivityId, NewActivity => activities, ActivityRow, ActivityValues;
    Consultation, ConsultationId, NewConsultation => consultations, ConsultationRow, ConsultationValues;
    Treatment, TreatmentId, NewTreatment => treatments, TreatmentRow, TreatmentValues;
    VaccinationRecord, VaccinationRecordId, NewVaccinationRecord =>
        vaccination_records, VaccinationRecordRow, VaccinationRecordValues;
    Vaccination, VaccinationId, NewVaccination => vaccinations, VaccinationRow, VaccinationValues;
}

fn user_values<'a>(
    name: &'a str,
    email: &'a str,
    password_hash: &'a str,
    role: &'static str,
) -> UserValues<'a> {
    UserValues {
        name,
        email,
        password_hash,
        role,
    }
}

fn rows_into_users(rows: Vec<UserRow>) -> Result<Vec<User>, UserPersistenceError> {
    rows.into_iter().map(UserRow::into_user).collect()
}

#[async_trait]
impl UserRepository for DieselStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_user_diesel_error(err, ""))?
            .map(UserRow::into_user)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_user_diesel_error(err, email))?
            .map(UserRow::into_user)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        let rows = users::table
            .select(UserRow::as_select())
            .order(users::id)
            .load::<UserRow>(&mut conn)
            .await
            .map_err(|err| map_user_diesel_error(err, ""))?;
        rows_into_users(rows)
    }

    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        let values = user_values(
            &user.name,
            &user.email,
            &user.password_hash,
            user.role.as_str(),
        );
        diesel::insert_into(users::table)
            .values(&values)
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .map_err(|err| map_user_diesel_error(err, &user.email))?
            .into_user()
    }

    async fn update(&self, user: &User) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        let values = user_values(
            &user.name,
            &user.email,
            &user.password_hash,
            user.role.as_str(),
        );
        diesel::update(users::table.find(user.id.get()))
            .set(&values)
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_user_diesel_error(err, &user.email))?
            .map(UserRow::into_user)
            .transpose()
    }

    async fn delete(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        diesel::delete(users::table.find(id.get()))
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_user_diesel_error(err, ""))?
            .map(UserRow::into_user)
            .transpose()
    }
}
