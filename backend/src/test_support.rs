//! Shared fixtures for unit tests across the crate.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{RecordStore, UserRepository};
use crate::domain::{
    ClinicStores, NewPet, NewUser, Pet, Principal, RecordMutationPipeline, Role, User,
};
use crate::outbound::persistence::MemoryStore;

/// Clock frozen at a single instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 2024-06-10T12:00:00Z, the instant every clinic fixture runs at.
pub fn clinic_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0)
        .single()
        .expect("valid fixture instant")
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s)
        .single()
        .expect("valid fixture instant")
}

/// A memory-backed pipeline plus the store it writes to.
pub struct Clinic {
    pub store: Arc<MemoryStore>,
    pub pipeline: RecordMutationPipeline,
}

impl Clinic {
    pub fn new() -> Self {
        Self::at(clinic_now())
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let pipeline = RecordMutationPipeline::new(
            ClinicStores::from_backend(store.clone()),
            Arc::new(FixedClock(now)),
        );
        Self { store, pipeline }
    }

    pub async fn user(&self, email: &str, role: Role) -> Principal {
        let user: User = UserRepository::create(
            self.store.as_ref(),
            &NewUser {
                name: "Fixture".into(),
                email: email.into(),
                password_hash: "fixture-hash".into(),
                role,
            },
        )
        .await
        .expect("fixture user");
        user.principal()
    }

    pub async fn pet(&self, owner: &Principal, species: &str, birth: DateTime<Utc>) -> Pet {
        RecordStore::<Pet>::create(
            self.store.as_ref(),
            &NewPet {
                name: "Firulais".into(),
                species: species.into(),
                breed: "Mestizo".into(),
                birth_date: birth,
                color: "Café".into(),
                owner_id: owner.id,
            },
        )
        .await
        .expect("fixture pet")
    }
}
