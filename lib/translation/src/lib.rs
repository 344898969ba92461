//! Translation of GraphQL queries into
//! [SPARQL algebra](https://www.w3.org/TR/sparql11-query/#sparqlAlgebra).
//!
//! Field names are given meaning by a JSON-LD context
//! ([`graphql_ld_context`]): every selected field becomes a triple pattern,
//! nested selections chain patterns through shared variables, and the
//! variable of each field is named by its `_`-joined selection path so that
//! flat query solutions can later be reassembled into the selection shape.
//!
//! Singularization directives (`@single` / `@plural`, optionally with
//! `scope: all`) do not influence the algebra; they are collected into a
//! separate [`SingularizeVariables`] map that travels with the query.

mod converter;
mod error;
mod query;

use std::collections::HashMap;

pub use converter::{ConvertOptions, ConverterConfig, GraphQlToSparqlConverter, Translation};
pub use error::TranslationError;
pub use query::GraphQlQuery;

/// Result paths marked singular, keyed by delimiter-joined path.
///
/// The root path is the empty string. Paths absent from the map are plural.
pub type SingularizeVariables = HashMap<String, bool>;
