//! Official results: source selection, decision and persisted record

pub mod evaluation;
pub mod official;

pub use evaluation::{MotionResult, ResultInputs, decide, select_source};
pub use official::{Decision, OfficialResult, ResultSource};
