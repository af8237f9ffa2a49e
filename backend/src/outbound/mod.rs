//! Outbound adapters implementing the clinic's domain ports.
//!
//! - **persistence**: in-memory and PostgreSQL-backed stores
//! - **credentials**: Argon2id password hashing
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business rules.

pub mod credentials;
pub mod persistence;
