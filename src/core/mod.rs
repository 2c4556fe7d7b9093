//! Core orchestration logic.
//!
//! This module contains:
//! - Discovery: Finding candidate recordings under a path
//! - Eligibility: Guards deciding whether a recording may be touched
//! - Cutter: Running markad and reading its marks
//! - Validator: Comparing durations before and after the cut
//! - Commit: Replacing the originals with the cut recording
//! - Lock: Keeping two runs from overlapping
//! - Orchestrator: Main execution engine

pub mod commit;
pub mod cutter;
pub mod discovery;
pub mod eligibility;
pub mod lock;
pub mod orchestrator;
pub mod validator;

// Re-export commonly used types
pub use discovery::discover;
pub use eligibility::EligibilityFilter;
pub use lock::RunLock;
pub use orchestrator::Orchestrator;
