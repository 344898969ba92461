//! The query engine contract and bundled engine implementations.

mod sparql_endpoint;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sparesults::QuerySolution;
use spargebra::Query;

pub use sparql_endpoint::SparqlEndpointEngine;

/// An error raised by a [`QueryEngine`] implementation.
///
/// Engines are arbitrary external systems, so their failures are carried as
/// opaque [`anyhow::Error`]s rather than flattened into a fixed taxonomy.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct QueryEngineError(#[from] anyhow::Error);

impl QueryEngineError {
    pub fn new(error: impl Into<anyhow::Error>) -> Self {
        Self(error.into())
    }
}

/// A query engine that takes SPARQL algebra and outputs query solutions.
///
/// This is the seam between GraphQL-LD and SPARQL execution: any conforming
/// implementation may be substituted, from an embedded store to a remote
/// endpoint (see [`SparqlEndpointEngine`]). The solutions correspond to the
/// rows of a [SPARQL results JSON](https://www.w3.org/TR/sparql11-results-json/)
/// document; engines speaking that wire format can parse it with
/// [`sparesults`].
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Executes a SPARQL algebra expression.
    ///
    /// `options` are engine-specific and arrive exactly as the caller passed
    /// them to [`Client::query`](crate::Client::query), or `None` when the
    /// caller omitted them.
    async fn query(
        &self,
        algebra: &Query,
        options: Option<&JsonValue>,
    ) -> Result<Vec<QuerySolution>, QueryEngineError>;
}
