//! Shared fixtures for the integration tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use vetclinic::domain::ports::{RecordStore, UserRepository};
use vetclinic::domain::{
    ClinicStores, NewPet, NewUser, Pet, Principal, RecordMutationPipeline, Role,
};
use vetclinic::outbound::persistence::MemoryStore;

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

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
        .single()
        .expect("valid instant")
}

pub struct ClinicFixture {
    pub store: Arc<MemoryStore>,
    pub pipeline: RecordMutationPipeline,
}

impl ClinicFixture {
    pub fn at(now: DateTime<Utc>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let pipeline = RecordMutationPipeline::new(
            ClinicStores::from_backend(store.clone()),
            Arc::new(FixedClock(now)),
        );
        Self { store, pipeline }
    }

    pub async fn principal(&self, email: &str, role: Role) -> Principal {
        UserRepository::create(
            self.store.as_ref(),
            &NewUser {
                name: "Fixture".into(),
                email: email.into(),
                password_hash: "unused".into(),
                role,
            },
        )
        .await
        .expect("seed user")
        .principal()
    }

    pub async fn pet(&self, owner: &Principal, species: &str, birth: DateTime<Utc>) -> Pet {
        RecordStore::<Pet>::create(
            self.store.as_ref(),
            &NewPet {
                name: "Michi".into(),
                species: species.into(),
                breed: "Criollo".into(),
                birth_date: birth,
                color: "Negro".into(),
                owner_id: owner.id,
            },
        )
        .await
        .expect("seed pet")
    }
}
