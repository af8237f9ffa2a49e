//! Inbound adapters translating HTTP requests into domain service calls.
//!
//! Framework details stay at this edge; handlers under [`http`] depend only
//! on the ports and the record pipeline.

pub mod http;
