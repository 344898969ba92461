//! A [GraphQL-LD](https://comunica.github.io/Article-ISWC2018-Demo-GraphQlLD/)
//! client: execute GraphQL queries over Linked Data through any SPARQL query
//! engine, using a JSON-LD context to interpret field names as RDF
//! predicates.
//!
//! The entry point is the [`Client`]. It resolves a JSON-LD context once at
//! construction and then runs each query through three sequential phases:
//!
//! 1. translate GraphQL to SPARQL algebra
//!    ([`graphql_ld_translation`], exposed as [`translation`]),
//! 2. execute the algebra on a pluggable [`QueryEngine`],
//! 3. reshape the flat solutions into a GraphQL-shaped tree
//!    ([`graphql_ld_results`], exposed as [`results`]).
//!
//! Usage example against a remote SPARQL endpoint:
//! ```no_run
//! use graphql_ld::{Client, ClientConfig, SparqlEndpointEngine};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let config = ClientConfig::new(
//!     json!({ "label": "http://www.w3.org/2000/01/rdf-schema#label" }),
//!     SparqlEndpointEngine::new("https://dbpedia.org/sparql"),
//! );
//! let client = Client::new(config).await?;
//! let result = client.query("{ label }").await?;
//! # let _ = result;
//! # Result::<_, graphql_ld::ClientError>::Ok(())
//! # }).unwrap();
//! ```

mod client;
mod engine;
mod error;

pub use client::{Client, ClientConfig, ExecutionResult, GraphQlToSparqlResult, QueryArgs};
pub use engine::{QueryEngine, QueryEngineError, SparqlEndpointEngine};
pub use error::ClientError;

pub use graphql_ld_context::JsonLdContextSource;
pub use graphql_ld_translation::{GraphQlQuery, SingularizeVariables};

pub mod context {
    pub use graphql_ld_context::*;
}

pub mod translation {
    pub use graphql_ld_translation::*;
}

pub mod results {
    pub use graphql_ld_results::*;
}
