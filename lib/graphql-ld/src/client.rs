use crate::engine::QueryEngine;
use crate::error::ClientError;
use graphql_ld_context::{
    ContextParser, ContextParserOptions, JsonLdContextSource, ParsedJsonLdContext,
};
use graphql_ld_results::SparqlResultsToTreeConverter;
use graphql_ld_translation::{
    ConvertOptions, ConverterConfig, GraphQlQuery, GraphQlToSparqlConverter,
    SingularizeVariables,
};
use serde::Serialize;
use serde_json::{Map as JsonMap, Value as JsonValue};
use spargebra::Query;

/// Configuration for a [`Client`].
///
/// Only the context and the query engine are required; the context parser
/// and the two converters fall back to defaults tuned for GraphQL-LD
/// (context coverage is required for every field, and RDF terms are
/// materialized to raw JSON values).
pub struct ClientConfig<E> {
    /// The JSON-LD context: an object, an array, or a URL of a remote
    /// context.
    pub context: JsonLdContextSource,
    /// The query engine SPARQL queries are executed against.
    pub query_engine: E,
    /// An optional base IRI for resolving relative IRIs.
    pub base_iri: Option<String>,
    /// Overrides the default JSON-LD context parser.
    pub context_parser: Option<ContextParser>,
    /// Overrides the default GraphQL to SPARQL converter.
    pub graphql_to_sparql_converter: Option<GraphQlToSparqlConverter>,
    /// Overrides the default solutions-to-tree converter.
    pub sparql_results_to_tree_converter: Option<SparqlResultsToTreeConverter>,
}

impl<E> ClientConfig<E> {
    pub fn new(context: impl Into<JsonLdContextSource>, query_engine: E) -> Self {
        Self {
            context: context.into(),
            query_engine,
            base_iri: None,
            context_parser: None,
            graphql_to_sparql_converter: None,
            sparql_results_to_tree_converter: None,
        }
    }
}

/// The arguments of one [`Client::query`] call.
///
/// Either a GraphQL query (raw or parsed) with optional variables, or the
/// output of an earlier [`Client::graphql_to_sparql`] call. Bare strings and
/// parsed documents convert directly:
///
/// ```
/// use graphql_ld::QueryArgs;
///
/// let _args = QueryArgs::from("{ label }");
/// let _args = QueryArgs::graphql("{ label }").query_engine_options(serde_json::json!({
///     "timeout_ms": 5000,
/// }));
/// ```
#[derive(Debug, Clone)]
pub enum QueryArgs {
    /// A GraphQL query to translate and execute.
    GraphQl {
        query: GraphQlQuery,
        /// Bindings for GraphQL variables referenced by the query.
        variables: Option<JsonMap<String, JsonValue>>,
        /// Engine-specific options, forwarded unchanged.
        query_engine_options: Option<JsonValue>,
    },
    /// Pre-translated SPARQL algebra, as produced by
    /// [`Client::graphql_to_sparql`].
    Sparql {
        sparql_algebra: Query,
        singularize_variables: SingularizeVariables,
        /// Engine-specific options, forwarded unchanged.
        query_engine_options: Option<JsonValue>,
    },
}

impl QueryArgs {
    pub fn graphql(query: impl Into<GraphQlQuery>) -> Self {
        Self::GraphQl {
            query: query.into(),
            variables: None,
            query_engine_options: None,
        }
    }

    pub fn sparql(sparql_algebra: Query, singularize_variables: SingularizeVariables) -> Self {
        Self::Sparql {
            sparql_algebra,
            singularize_variables,
            query_engine_options: None,
        }
    }

    /// Sets variable bindings; only meaningful for GraphQL queries.
    pub fn variables(mut self, bindings: JsonMap<String, JsonValue>) -> Self {
        if let Self::GraphQl { variables, .. } = &mut self {
            *variables = Some(bindings);
        }
        self
    }

    /// Sets engine-specific options, forwarded to the engine unchanged.
    pub fn query_engine_options(mut self, options: JsonValue) -> Self {
        match &mut self {
            Self::GraphQl {
                query_engine_options,
                ..
            }
            | Self::Sparql {
                query_engine_options,
                ..
            } => *query_engine_options = Some(options),
        }
        self
    }
}

impl From<&str> for QueryArgs {
    fn from(query: &str) -> Self {
        Self::graphql(query)
    }
}

impl From<String> for QueryArgs {
    fn from(query: String) -> Self {
        Self::graphql(query)
    }
}

impl From<GraphQlQuery> for QueryArgs {
    fn from(query: GraphQlQuery) -> Self {
        Self::graphql(query)
    }
}

impl From<GraphQlToSparqlResult> for QueryArgs {
    fn from(result: GraphQlToSparqlResult) -> Self {
        Self::sparql(result.sparql_algebra, result.singularize_variables)
    }
}

/// The output of [`Client::graphql_to_sparql`]: everything needed to
/// execute and reshape the query later.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQlToSparqlResult {
    /// The translated SPARQL algebra expression.
    pub sparql_algebra: Query,
    /// The result paths marked singular by the query's directives.
    pub singularize_variables: SingularizeVariables,
}

/// The result of a GraphQL-LD query, mirroring the `data` field of a
/// GraphQL execution result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub data: JsonValue,
}

/// A GraphQL-LD client.
///
/// The client resolves its JSON-LD context once at construction and then
/// orchestrates three strictly sequential phases per query: translate the
/// GraphQL query to SPARQL algebra, execute the algebra on the configured
/// [`QueryEngine`], and reshape the flat solutions into a GraphQL-shaped
/// tree.
///
/// Typical usage:
/// ```
/// use graphql_ld::{Client, ClientConfig, QueryEngine, QueryEngineError};
/// use serde_json::json;
/// use sparesults::QuerySolution;
/// use spargebra::term::{Literal, Term, Variable};
///
/// struct FixedEngine;
///
/// #[async_trait::async_trait]
/// impl QueryEngine for FixedEngine {
///     async fn query(
///         &self,
///         _algebra: &spargebra::Query,
///         _options: Option<&serde_json::Value>,
///     ) -> Result<Vec<QuerySolution>, QueryEngineError> {
///         let variables = vec![Variable::new_unchecked("label")];
///         let terms = vec![Some(Term::from(Literal::new_simple_literal("Book 1")))];
///         Ok(vec![QuerySolution::from((variables, terms))])
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let config = ClientConfig::new(
///     json!({ "ex": "http://example.org/", "label": "ex:label" }),
///     FixedEngine,
/// );
/// let client = Client::new(config).await?;
///
/// let result = client.query("{ label }").await?;
/// assert_eq!(result.data, json!([{ "label": ["Book 1"] }]));
/// # Result::<_, graphql_ld::ClientError>::Ok(())
/// # }).unwrap();
/// ```
#[derive(Debug)]
pub struct Client<E> {
    context: ParsedJsonLdContext,
    query_engine: E,
    graphql_to_sparql_converter: GraphQlToSparqlConverter,
    sparql_results_to_tree_converter: SparqlResultsToTreeConverter,
}

impl<E: QueryEngine> Client<E> {
    /// Creates a client, resolving the configured JSON-LD context.
    ///
    /// An invalid or unreachable context fails here, before any query runs.
    pub async fn new(config: ClientConfig<E>) -> Result<Self, ClientError> {
        let parser = config.context_parser.unwrap_or_default();
        let context = parser
            .parse(
                &config.context,
                &ContextParserOptions {
                    base_iri: config.base_iri,
                },
            )
            .await?;
        tracing::debug!("resolved JSON-LD context");

        Ok(Self {
            context,
            query_engine: config.query_engine,
            graphql_to_sparql_converter: config.graphql_to_sparql_converter.unwrap_or_else(
                || {
                    GraphQlToSparqlConverter::new(ConverterConfig {
                        require_context: true,
                    })
                },
            ),
            sparql_results_to_tree_converter: config
                .sparql_results_to_tree_converter
                .unwrap_or_default(),
        })
    }

    /// The resolved JSON-LD context.
    pub fn context(&self) -> &ParsedJsonLdContext {
        &self.context
    }

    /// A reference to the configured query engine.
    pub fn query_engine(&self) -> &E {
        &self.query_engine
    }

    /// Executes a GraphQL-LD query.
    ///
    /// There are three ways of invoking this method:
    /// 1. with a GraphQL query string: `client.query("{ label }")`,
    /// 2. with a parsed GraphQL document and optional variables:
    ///    `client.query(QueryArgs::graphql(document).variables(bindings))`,
    /// 3. with SPARQL algebra and a singularization map as returned by
    ///    [`Client::graphql_to_sparql`]:
    ///    `client.query(QueryArgs::sparql(algebra, singularize))`.
    ///
    /// Failures of any phase propagate unchanged; there is no retry and no
    /// partial result.
    pub async fn query(
        &self,
        args: impl Into<QueryArgs>,
    ) -> Result<ExecutionResult, ClientError> {
        let (translation, query_engine_options) = match args.into() {
            QueryArgs::GraphQl {
                query,
                variables,
                query_engine_options,
            } => (
                self.graphql_to_sparql_with(query, variables)?,
                query_engine_options,
            ),
            QueryArgs::Sparql {
                sparql_algebra,
                singularize_variables,
                query_engine_options,
            } => (
                GraphQlToSparqlResult {
                    sparql_algebra,
                    singularize_variables,
                },
                query_engine_options,
            ),
        };

        tracing::debug!("executing SPARQL algebra on the query engine");
        let solutions = self
            .query_engine
            .query(&translation.sparql_algebra, query_engine_options.as_ref())
            .await?;

        tracing::debug!(solutions = solutions.len(), "reshaping query solutions");
        let data = self
            .sparql_results_to_tree_converter
            .solutions_to_tree(&solutions, &translation.singularize_variables)?;
        Ok(ExecutionResult { data })
    }

    /// Converts a GraphQL query to SPARQL algebra and a singularization map
    /// without executing it, so callers can inspect or cache the algebra.
    pub fn graphql_to_sparql(
        &self,
        query: impl Into<GraphQlQuery>,
        variables: Option<JsonMap<String, JsonValue>>,
    ) -> Result<GraphQlToSparqlResult, ClientError> {
        self.graphql_to_sparql_with(query.into(), variables)
    }

    fn graphql_to_sparql_with(
        &self,
        query: GraphQlQuery,
        variables: Option<JsonMap<String, JsonValue>>,
    ) -> Result<GraphQlToSparqlResult, ClientError> {
        let options = ConvertOptions {
            variables: variables.unwrap_or_default(),
        };
        let translation = self.graphql_to_sparql_converter.graphql_to_sparql_algebra(
            query,
            &self.context,
            &options,
        )?;
        Ok(GraphQlToSparqlResult {
            sparql_algebra: translation.query,
            singularize_variables: translation.singularize_variables,
        })
    }
}
