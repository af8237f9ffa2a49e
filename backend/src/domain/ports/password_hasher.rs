//! Driven port for one-way password hashing.

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hash could not be produced.
        Hash { message: String } => "password hashing failed: {message}",
        /// Stored hash is not in a recognised format.
        Malformed { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Hashes new passwords and verifies presented ones.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
