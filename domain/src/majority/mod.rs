//! Majority (vote policy) resolution
//!
//! `ratio = for / base`, adopted when the ratio reaches the threshold, unless
//! nothing was expressed or quorum explicitly failed.

pub mod resolver;

pub use resolver::{MajorityContext, MajorityOutcome, MajorityResolver};
