//! Veterinary clinic backend: clinical records behind ownership,
//! authorization and domain rules.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

#[cfg(test)]
mod test_support;

pub use middleware::Trace;
