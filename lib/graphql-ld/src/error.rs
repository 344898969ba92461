use crate::engine::QueryEngineError;
use graphql_ld_context::ContextError;
use graphql_ld_results::TreeError;
use graphql_ld_translation::TranslationError;

/// An error raised by a [`Client`](crate::Client).
///
/// Every failure of the underlying phases propagates unmodified: nothing is
/// caught, retried or downgraded on the way to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The JSON-LD context could not be resolved.
    #[error(transparent)]
    Context(#[from] ContextError),
    /// The GraphQL query could not be translated to SPARQL algebra.
    #[error(transparent)]
    Translation(#[from] TranslationError),
    /// The query engine rejected the query.
    #[error("Query engine execution failed")]
    QueryEngine(#[from] QueryEngineError),
    /// The query solutions could not be reshaped into a tree.
    #[error(transparent)]
    Results(#[from] TreeError),
}
