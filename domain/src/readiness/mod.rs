//! Meeting readiness: may this meeting be validated?

pub mod report;

pub use report::{ReadinessDiff, ReadinessFacts, ReadinessReport, ReadinessViolation};
