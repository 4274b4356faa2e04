//! Ordered, named validator pipelines.
//!
//! Validators are registered once, in order, under a name. A pipeline
//! definition picks a subset of them and an execution policy. Running a
//! pipeline never fails for a move-related reason: every validator failure,
//! timeout, error, or panic is folded into the [`ValidationResult`].

use super::candidate::{MoveCandidate, ValidationContext};
use super::result::{Severity, ValidationIssue, ValidationResult};
use super::validators;
use crate::config::PipelineConfig;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

/// Name of the pipeline that runs the four placement checks.
pub const DEFAULT_PIPELINE: &str = "default";

/// Name of the pipeline used for turn submission.
pub const SUBMISSION_PIPELINE: &str = "submission";

/// Timeout applied to asynchronous validators when nothing else is set.
pub const DEFAULT_VALIDATOR_TIMEOUT: Duration = Duration::from_secs(5);

const EVENT_CAPACITY: usize = 64;

/// What a single validator concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorOutcome {
    /// True if the check passed.
    pub valid: bool,
    /// Message to report when the check failed.
    pub message: Option<String>,
    /// Detail kept in the result under the validator's name.
    pub data: Option<Value>,
}

impl ValidatorOutcome {
    /// A passing outcome.
    pub fn pass() -> Self {
        Self {
            valid: true,
            message: None,
            data: None,
        }
    }

    /// A passing outcome carrying data.
    pub fn pass_with(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::pass()
        }
    }

    /// A failing outcome.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
            data: None,
        }
    }

    /// A failing outcome carrying data.
    pub fn fail_with(message: impl Into<String>, data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::fail(message)
        }
    }
}

/// A single check over a candidate move.
///
/// Returning `Err` signals an unexpected failure; the pipeline turns it
/// into a blocking issue.
#[async_trait::async_trait]
pub trait Validator: Send + Sync {
    /// Evaluates the candidate.
    async fn evaluate(
        &self,
        candidate: &MoveCandidate,
        context: &ValidationContext,
    ) -> anyhow::Result<ValidatorOutcome>;
}

/// Fixed facts about a registered validator.
#[derive(Debug, Clone, PartialEq, Eq, Setters)]
#[setters(prefix = "with_")]
pub struct ValidatorMetadata {
    /// Registered name.
    #[setters(skip)]
    pub name: String,
    /// Effect of a failure on the overall result.
    pub severity: Severity,
    /// If true, the validator races a deadline.
    pub is_async: bool,
    /// Deadline overriding the pipeline's default.
    #[setters(strip_option)]
    pub timeout: Option<Duration>,
}

impl ValidatorMetadata {
    /// Metadata for a synchronous blocking validator.
    pub fn blocking(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            severity: Severity::Blocking,
            is_async: false,
            timeout: None,
        }
    }
}

struct RegisteredValidator {
    metadata: ValidatorMetadata,
    validator: Arc<dyn Validator>,
}

/// Which validators a pipeline runs and how.
#[derive(Debug, Clone, PartialEq, Eq, Setters)]
#[setters(prefix = "with_")]
pub struct PipelineDefinition {
    /// Pipeline name.
    #[setters(skip)]
    pub name: String,
    /// Validator names in execution order.
    #[setters(skip)]
    pub validators: Vec<String>,
    /// Halt after the first blocking failure.
    pub stop_on_first_error: bool,
    /// Deadline for asynchronous validators without their own.
    pub validator_timeout: Duration,
}

impl PipelineDefinition {
    /// A definition that stops on the first error.
    pub fn new<I, S>(name: impl Into<String>, validators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            validators: validators.into_iter().map(Into::into).collect(),
            stop_on_first_error: true,
            validator_timeout: DEFAULT_VALIDATOR_TIMEOUT,
        }
    }
}

/// Lifecycle signal published around every pipeline run.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// Emitted before the first validator runs.
    Started {
        /// Pipeline being run.
        pipeline_name: String,
        /// Move being validated.
        candidate: Arc<MoveCandidate>,
        /// Context supplied by the caller.
        context: Arc<ValidationContext>,
    },
    /// Emitted after the result is complete.
    Completed {
        /// Pipeline that ran.
        pipeline_name: String,
        /// Final result.
        result: Box<ValidationResult>,
        /// Move that was validated.
        candidate: Arc<MoveCandidate>,
        /// Context supplied by the caller.
        context: Arc<ValidationContext>,
    },
}

/// Pipeline failures.
///
/// Only [`PipelineError::UnknownPipeline`] is ever returned to a caller;
/// the rest are logged or folded into issues.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum PipelineError {
    /// No pipeline is defined under this name.
    #[display("Unknown validation pipeline '{}'", name)]
    UnknownPipeline {
        /// Requested pipeline.
        name: String,
    },
    /// A definition names a validator that was never registered.
    #[display("Validator '{}' is not registered", name)]
    ValidatorNotFound {
        /// Missing validator.
        name: String,
    },
    /// An asynchronous validator missed its deadline.
    #[display("Validator '{}' timed out after {}ms", name, timeout_ms)]
    ValidatorTimeout {
        /// Validator that timed out.
        name: String,
        /// Deadline in milliseconds.
        timeout_ms: u128,
    },
    /// A validator returned an error or panicked.
    #[display("Validator '{}' failed: {}", name, detail)]
    ValidatorException {
        /// Validator that failed.
        name: String,
        /// Original failure detail.
        detail: String,
    },
}

/// Registry of validators plus the pipelines built from them.
pub struct ValidationPipeline {
    registry: Vec<RegisteredValidator>,
    pipelines: BTreeMap<String, PipelineDefinition>,
    events: broadcast::Sender<PipelineEvent>,
}

impl std::fmt::Debug for ValidationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationPipeline")
            .field("validators", &self.validator_names())
            .field("pipelines", &self.pipelines.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ValidationPipeline {
    /// A pipeline with no validators and no definitions.
    #[instrument]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            registry: Vec::new(),
            pipelines: BTreeMap::new(),
            events,
        }
    }

    /// Registers the built-in validators and the `default` and
    /// `submission` pipelines, using `config` for their policy.
    #[instrument]
    pub fn with_defaults(config: &PipelineConfig) -> Self {
        let mut pipeline = Self::new();
        pipeline.register(
            ValidatorMetadata::blocking(validators::BOUNDARY),
            validators::BoundaryValidator,
        );
        pipeline.register(
            ValidatorMetadata::blocking(validators::CONNECTION),
            validators::ConnectionValidator,
        );
        pipeline.register(
            ValidatorMetadata::blocking(validators::TILE_AVAILABILITY),
            validators::TileAvailabilityValidator,
        );
        pipeline.register(
            ValidatorMetadata::blocking(validators::WORD_FORMATION),
            validators::WordFormationValidator,
        );
        pipeline.register(
            ValidatorMetadata::blocking(validators::TURN_ORDER),
            validators::TurnOrderValidator,
        );
        pipeline.register(
            ValidatorMetadata::blocking(validators::BOARD_INTEGRITY),
            validators::BoardIntegrityValidator,
        );

        let timeout = Duration::from_millis(config.validator_timeout_ms);
        pipeline.define(
            PipelineDefinition::new(DEFAULT_PIPELINE, validators::DEFAULT_ORDER)
                .with_stop_on_first_error(config.stop_on_first_error)
                .with_validator_timeout(timeout),
        );
        pipeline.define(
            PipelineDefinition::new(
                SUBMISSION_PIPELINE,
                validators::DEFAULT_ORDER
                    .iter()
                    .chain(&[validators::TURN_ORDER, validators::BOARD_INTEGRITY])
                    .copied(),
            )
            .with_stop_on_first_error(config.stop_on_first_error)
            .with_validator_timeout(timeout),
        );
        info!(
            validators = pipeline.registry.len(),
            pipelines = pipeline.pipelines.len(),
            "Validation pipeline ready"
        );
        pipeline
    }

    /// Appends a validator, or replaces one registered under the same name
    /// in place.
    #[instrument(skip(self, validator), fields(name = %metadata.name))]
    pub fn register(&mut self, metadata: ValidatorMetadata, validator: impl Validator + 'static) {
        let entry = RegisteredValidator {
            metadata,
            validator: Arc::new(validator),
        };
        match self
            .registry
            .iter_mut()
            .find(|r| r.metadata.name == entry.metadata.name)
        {
            Some(existing) => {
                debug!("Replacing registered validator");
                *existing = entry;
            }
            None => self.registry.push(entry),
        }
    }

    /// Adds or replaces a pipeline definition.
    #[instrument(skip(self), fields(name = %definition.name))]
    pub fn define(&mut self, definition: PipelineDefinition) {
        self.pipelines.insert(definition.name.clone(), definition);
    }

    /// Registered validator names, in registration order.
    pub fn validator_names(&self) -> Vec<&str> {
        self.registry
            .iter()
            .map(|r| r.metadata.name.as_str())
            .collect()
    }

    /// The definition registered under `name`.
    pub fn definition(&self, name: &str) -> Option<&PipelineDefinition> {
        self.pipelines.get(name)
    }

    /// Subscribes to lifecycle signals.
    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: PipelineEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Runs the named pipeline over a candidate move.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownPipeline`] if `pipeline_name` is not
    /// defined. Validator problems never surface as `Err`.
    #[instrument(skip(self, candidate, context), fields(word = %candidate.word))]
    pub async fn run(
        &self,
        pipeline_name: &str,
        candidate: MoveCandidate,
        context: ValidationContext,
    ) -> Result<ValidationResult, PipelineError> {
        let definition =
            self.pipelines
                .get(pipeline_name)
                .ok_or_else(|| PipelineError::UnknownPipeline {
                    name: pipeline_name.to_string(),
                })?;

        let candidate = Arc::new(candidate);
        let context = Arc::new(context);
        self.emit(PipelineEvent::Started {
            pipeline_name: definition.name.clone(),
            candidate: Arc::clone(&candidate),
            context: Arc::clone(&context),
        });

        let started = Instant::now();
        let mut result = ValidationResult::new(&definition.name);

        for name in &definition.validators {
            let Some(entry) = self.registry.iter().find(|r| &r.metadata.name == name) else {
                let err = PipelineError::ValidatorNotFound { name: name.clone() };
                warn!(error = %err, "Skipping validator");
                continue;
            };

            result.metadata.validators_executed.push(name.clone());
            let blocked = match self
                .execute(entry, definition, &candidate, &context)
                .await
            {
                Ok(outcome) => {
                    if let Some(data) = &outcome.data {
                        result.supplemental.insert(name.clone(), data.clone());
                    }
                    if outcome.valid {
                        debug!(validator = %name, "Validator passed");
                        false
                    } else {
                        let message = outcome
                            .message
                            .unwrap_or_else(|| format!("{} check failed", name));
                        debug!(
                            validator = %name,
                            %message,
                            severity = %entry.metadata.severity,
                            "Validator failed"
                        );
                        result.record(ValidationIssue {
                            kind: entry.metadata.severity,
                            validator_name: name.clone(),
                            message,
                            data: outcome.data,
                            context: (*context).clone(),
                        });
                        entry.metadata.severity == Severity::Blocking
                    }
                }
                Err(err) => {
                    warn!(validator = %name, error = %err, "Validator did not complete");
                    result.record(ValidationIssue {
                        kind: Severity::Blocking,
                        validator_name: name.clone(),
                        message: err.to_string(),
                        data: None,
                        context: (*context).clone(),
                    });
                    true
                }
            };

            if blocked && definition.stop_on_first_error {
                debug!(validator = %name, "Stopping on first error");
                break;
            }
        }

        result.metadata.execution_time_ms = started.elapsed().as_millis() as u64;
        result.metadata.timestamp = chrono::Utc::now();
        info!(
            pipeline = %definition.name,
            valid = result.valid,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "Validation complete"
        );

        self.emit(PipelineEvent::Completed {
            pipeline_name: definition.name.clone(),
            result: Box::new(result.clone()),
            candidate,
            context,
        });
        Ok(result)
    }

    /// Runs one validator on its own task so panics and deadlines are contained.
    async fn execute(
        &self,
        entry: &RegisteredValidator,
        definition: &PipelineDefinition,
        candidate: &Arc<MoveCandidate>,
        context: &Arc<ValidationContext>,
    ) -> Result<ValidatorOutcome, PipelineError> {
        let name = entry.metadata.name.clone();
        let validator = Arc::clone(&entry.validator);
        let candidate = Arc::clone(candidate);
        let context = Arc::clone(context);
        let mut handle =
            tokio::spawn(async move { validator.evaluate(&candidate, &context).await });

        let joined = if entry.metadata.is_async {
            let deadline = entry
                .metadata
                .timeout
                .unwrap_or(definition.validator_timeout);
            match tokio::time::timeout(deadline, &mut handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    handle.abort();
                    return Err(PipelineError::ValidatorTimeout {
                        name,
                        timeout_ms: deadline.as_millis(),
                    });
                }
            }
        } else {
            handle.await
        };

        match joined {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(e)) => Err(PipelineError::ValidatorException {
                name,
                detail: format!("{:#}", e),
            }),
            Err(join_err) => Err(PipelineError::ValidatorException {
                name,
                detail: join_err.to_string(),
            }),
        }
    }
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        Self::with_defaults(&PipelineConfig::default())
    }
}
