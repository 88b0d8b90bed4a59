//! FetchXML parse errors

use thiserror::Error;

/// Result type for FetchXML parsing
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors raised while turning a FetchXML document into a query tree.
///
/// All of these indicate a caller defect and are never retried.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Malformed document, unknown node kind, or missing mandatory attribute
    #[error("invalid query document: {message}")]
    InvalidDocument { message: String },

    /// Operator token outside the closed vocabulary
    #[error("unknown condition operator '{token}'")]
    UnknownOperator { token: String },

    /// Non-integer top/count/page attribute
    #[error("invalid paging value for '{attribute}': '{value}'")]
    InvalidPagingValue { attribute: String, value: String },

    /// Underlying XML reader error
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Underlying XML attribute error
    #[error("XML attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
}

impl FetchError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }
}
