//! Project initialization pipeline
//!
//! Sequences the scanner, the manifest writer and the verifier. The run is
//! linear: each stage either hands over to the next or ends the run with an
//! [`AbortReason`].

pub mod orchestrator;
pub mod outcome;

pub use orchestrator::PipelineOrchestrator;
pub use outcome::{AbortReason, PipelineOutcome, PipelineReport};
