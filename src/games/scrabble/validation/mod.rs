//! Move validation.
//!
//! Validators are registered in order under a name; pipelines select a
//! subset and a policy. Results separate blocking errors from warnings and
//! informational notes, and carry each validator's data under its name.

mod candidate;
mod pipeline;
mod result;
pub mod validators;

pub use candidate::{MoveCandidate, ValidationContext};
pub use pipeline::{
    DEFAULT_PIPELINE, DEFAULT_VALIDATOR_TIMEOUT, PipelineDefinition, PipelineError, PipelineEvent,
    SUBMISSION_PIPELINE, ValidationPipeline, Validator, ValidatorMetadata, ValidatorOutcome,
};
pub use result::{ResultMetadata, Severity, ValidationIssue, ValidationResult};
