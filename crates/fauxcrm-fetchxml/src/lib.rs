//! FetchXML query document parser.
//!
//! Turns a FetchXML document into a [`fauxcrm_query::QueryExpression`].
//! Validation is strict: mandatory attributes per node kind, a closed
//! operator vocabulary, and integer paging attributes. Unknown node kinds
//! fail; unknown XML attributes are ignored.

mod error;
mod parser;

pub use error::{FetchError, FetchResult};
pub use parser::parse_fetch;
