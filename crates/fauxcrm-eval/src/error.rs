//! Evaluation errors for the query engine

use fauxcrm_fetchxml::FetchError;
use fauxcrm_store::StoreError;
use fauxcrm_types::CoercionError;
use thiserror::Error;

/// Result type for query evaluation
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while evaluating a query.
///
/// Parse and projection errors indicate a caller defect and are raised
/// immediately; nothing is retried and partial results are never returned
/// alongside a suppressed error.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Projection or condition references an attribute absent from metadata
    #[error("the attribute '{attribute}' does not exist on entity '{entity}'")]
    UnknownAttribute { entity: String, attribute: String },

    /// Structurally invalid condition (wrong value arity and the like)
    #[error("invalid condition on '{attribute}': {message}")]
    InvalidCondition { attribute: String, message: String },

    /// Literal could not be coerced to the attribute's declared type
    #[error(transparent)]
    TypeConversion(#[from] CoercionError),

    /// The query document failed to parse
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Store-level failure surfaced through the engine
    #[error(transparent)]
    Store(#[from] StoreError),
}
