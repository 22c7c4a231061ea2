//! Members and eligible rosters

pub mod entities;

pub use entities::{Member, Roster};
