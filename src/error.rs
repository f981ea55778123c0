use thiserror::Error;

/// Named lookup failures raised to the orchestrator's caller. Per-item
/// resolution problems (missing keys, malformed descriptors, absent
/// directories) are logged and skipped instead, so one bad entry never
/// aborts a batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("group '{0}' has not been built")]
    UnknownGroup(String),

    #[error("illuminant '{0}' is not defined")]
    UnknownIlluminant(String),
}
