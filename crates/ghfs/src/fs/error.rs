use crate::github::ApiError;

/// Failure of a node operation
///
/// Remote failures of every kind (absent entity, network, authentication,
/// rate limiting) collapse into `NotFound`.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("no such entry")]
    NotFound,
}

/// Collapse a remote error into `NotFound`, keeping the cause in the log.
pub(crate) fn collapse(operation: &str, target: &str, err: ApiError) -> NodeError {
    if err.is_not_found() {
        tracing::debug!(operation, target, "remote entry does not exist");
    } else {
        tracing::debug!(operation, target, error = %err, "remote lookup failed");
    }
    NodeError::NotFound
}
