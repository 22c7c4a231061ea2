//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`]: newtype identifiers for every record
//! - [`verdict::Verdict`]: tri-state policy outcome
//! - [`numeric`]: threshold comparison and denominator flooring
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod ids;
pub mod numeric;
pub mod verdict;
