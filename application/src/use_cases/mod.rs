//! Use cases (application business logic)

pub mod cast_ballot;
pub mod compute_result;
pub mod consolidate;
pub mod meeting_lifecycle;
pub mod motion_lifecycle;
pub mod motion_locks;
pub mod proxy_registry;
pub mod readiness;

#[cfg(test)]
pub(crate) mod testing;
