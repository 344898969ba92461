//! Reshaping of flat SPARQL query solutions into nested, GraphQL-shaped
//! JSON trees.
//!
//! Variable names encode their position in the result tree as a
//! delimiter-joined path (`books_author_name`). Each solution row
//! contributes its bound values at those paths; a singularization map
//! decides per path whether values collapse to a single scalar or
//! accumulate into arrays.

mod converter;
mod error;

use std::collections::HashMap;

pub use converter::{ConverterConfig, SparqlResultsToTreeConverter};
pub use error::TreeError;

/// Result paths to collapse to a single value, keyed by delimiter-joined
/// path. The root path is the empty string; absent paths are plural.
pub type SingularizeVariables = HashMap<String, bool>;
