//! In-process store backing every persistence port.
//!
//! All tables live behind one mutex, so a uniqueness check and the insert it
//! guards are atomic. Used when no database is configured and in tests.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    RecordFilter, RecordStore, RecordStoreError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Activity, Consultation, NewUser, OwnerRef, Pet, Resource, Treatment, User, UserId,
    Vaccination, VaccinationRecord,
};

struct Table<R> {
    rows: BTreeMap<i64, R>,
    last_id: i64,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<R> Table<R> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Default)]
struct Tables {
    users: Table<User>,
    pets: Table<Pet>,
    activities: Table<Activity>,
    consultations: Table<Consultation>,
    treatments: Table<Treatment>,
    vaccination_records: Table<VaccinationRecord>,
    vaccinations: Table<Vaccination>,
}

impl Tables {
    fn owner_of(&self, reference: OwnerRef) -> Option<UserId> {
        match reference {
            OwnerRef::User(owner) => Some(owner),
            OwnerRef::Pet(pet_id) => self.pets.rows.get(&pet_id.get()).map(|pet| pet.owner_id),
        }
    }
}

/// Record kinds with a table in [`MemoryStore`].
trait MemoryTable: Resource {
    fn table(tables: &Tables) -> &Table<Self>;
    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;
}

macro_rules! impl_memory_table {
    ($($resource:ty => $field:ident),* $(,)?) => {
        $(
            impl MemoryTable for $resource {
                fn table(tables: &Tables) -> &Table<Self> {
                    &tables.$field
                }

                fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
                    &mut tables.$field
                }
            }
        )*
    };
}

impl_memory_table! {
    Pet => pets,
    Activity => activities,
    Consultation => consultations,
    Treatment => treatments,
    VaccinationRecord => vaccination_records,
    Vaccination => vaccinations,
}

/// Thread-safe in-memory implementation of every store port.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn conflicting_key<R: Resource>(table: &Table<R>, candidate: &R, skip: Option<i64>) -> Option<String> {
    let key = candidate.unique_key()?;
    table
        .rows
        .iter()
        .filter(|(id, _)| Some(**id) != skip)
        .any(|(_, row)| row.unique_key().as_ref() == Some(&key))
        .then_some(key)
}

#[async_trait]
impl<R: MemoryTable> RecordStore<R> for MemoryStore {
    async fn find_by_id(&self, id: R::Id) -> Result<Option<R>, RecordStoreError> {
        let tables = self.lock();
        Ok(R::table(&tables).rows.get(&id.into()).cloned())
    }

    async fn find_by(&self, filter: RecordFilter) -> Result<Vec<R>, RecordStoreError> {
        let tables = self.lock();
        let rows = R::table(&tables).rows.values();
        let selected = match filter {
            RecordFilter::All => rows.cloned().collect(),
            RecordFilter::OwnedBy(owner) => rows
                .filter(|row| tables.owner_of(row.owner()) == Some(owner))
                .cloned()
                .collect(),
            RecordFilter::ForPet(pet_id) => rows
                .filter(|row| row.owner() == OwnerRef::Pet(pet_id))
                .cloned()
                .collect(),
        };
        Ok(selected)
    }

    async fn create(&self, draft: &R::Draft) -> Result<R, RecordStoreError> {
        let mut tables = self.lock();
        let table = R::table_mut(&mut tables);
        let candidate = R::from_draft(R::Id::from(table.last_id + 1), draft.clone());
        if let Some(key) = conflicting_key(table, &candidate, None) {
            return Err(RecordStoreError::conflict(key));
        }
        let id = table.next_id();
        table.rows.insert(id, candidate.clone());
        Ok(candidate)
    }

    async fn update(&self, record: &R) -> Result<Option<R>, RecordStoreError> {
        let mut tables = self.lock();
        let table = R::table_mut(&mut tables);
        let id: i64 = record.id().into();
        if !table.rows.contains_key(&id) {
            return Ok(None);
        }
        if let Some(key) = conflicting_key(table, record, Some(id)) {
            return Err(RecordStoreError::conflict(key));
        }
        table.rows.insert(id, record.clone());
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: R::Id) -> Result<Option<R>, RecordStoreError> {
        let mut tables = self.lock();
        Ok(R::table_mut(&mut tables).rows.remove(&id.into()))
    }
}

fn email_taken(table: &Table<User>, email: &str, skip: Option<UserId>) -> bool {
    table
        .rows
        .values()
        .any(|user| user.email == email && Some(user.id) != skip)
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().users.rows.get(&id.get()).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .rows
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.lock().users.rows.values().cloned().collect())
    }

    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut tables = self.lock();
        if email_taken(&tables.users, &user.email, None) {
            return Err(UserPersistenceError::conflict(user.email.clone()));
        }
        let id = UserId::new(tables.users.next_id());
        let stored = User {
            id,
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
        };
        tables.users.rows.insert(id.get(), stored.clone());
        Ok(stored)
    }

    async fn update(&self, user: &User) -> Result<Option<User>, UserPersistenceError> {
        let mut tables = self.lock();
        if !tables.users.rows.contains_key(&user.id.get()) {
            return Ok(None);
        }
        if email_taken(&tables.users, &user.email, Some(user.id)) {
            return Err(UserPersistenceError::conflict(user.email.clone()));
        }
        tables.users.rows.insert(user.id.get(), user.clone());
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().users.rows.remove(&id.get()))
    }
}
