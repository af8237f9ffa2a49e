//! Storage adapters for users and clinical records.
//!
//! Two backends implement the same ports:
//!
//! - [`MemoryStore`]: a process-local store used for development and tests.
//! - [`DieselStore`]: PostgreSQL via Diesel with `diesel-async` and `bb8`
//!   pooling.
//!
//! Row structs (`models.rs`) and the table definitions (`schema.rs`) stay
//! private to this module; adapters hand domain records back to callers and
//! surface every database failure as a typed port error.
//!
//! # Example
//!
//! ```ignore
//! use vetclinic::outbound::persistence::{DbPool, DieselStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/clinic")).await?;
//! let stores = ClinicStores::from_backend(Arc::new(DieselStore::new(pool)));
//! ```

mod diesel_error_mapping;
mod diesel_store;
mod memory;
mod models;
mod pool;
mod schema;

pub use diesel_store::DieselStore;
pub use memory::MemoryStore;
pub use pool::{DbPool, PoolConfig, PoolError};
