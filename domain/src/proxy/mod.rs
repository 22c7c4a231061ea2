//! Proxy delegation: who may vote for whom within a meeting

pub mod book;
pub mod delegation;

pub use book::{DelegationBook, DelegationViolation};
pub use delegation::ProxyDelegation;
