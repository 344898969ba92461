use super::{QueryEngine, QueryEngineError};
use anyhow::Context as _;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sparesults::{
    QueryResultsFormat, QueryResultsParser, QuerySolution, ReaderQueryResultsParserOutput,
};
use spargebra::Query;

/// A [`QueryEngine`] backed by a remote SPARQL endpoint.
///
/// The algebra is serialized back to SPARQL text and sent as an HTTP POST
/// form; the `application/sparql-results+json` response is parsed into
/// query solutions.
#[derive(Debug, Clone)]
pub struct SparqlEndpointEngine {
    endpoint: String,
    http: reqwest::Client,
}

impl SparqlEndpointEngine {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
        }
    }

    /// The endpoint URL queries are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl QueryEngine for SparqlEndpointEngine {
    async fn query(
        &self,
        algebra: &Query,
        _options: Option<&JsonValue>,
    ) -> Result<Vec<QuerySolution>, QueryEngineError> {
        let sparql = algebra.to_string();
        tracing::debug!(endpoint = %self.endpoint, "sending SPARQL query");

        let response = self
            .http
            .post(&self.endpoint)
            .header(
                reqwest::header::ACCEPT,
                "application/sparql-results+json",
            )
            .form(&[("query", sparql.as_str())])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(anyhow::Error::from)?;
        let body = response.bytes().await.map_err(anyhow::Error::from)?;

        let parser = QueryResultsParser::from_format(QueryResultsFormat::Json)
            .for_reader(body.as_ref())
            .context("invalid SPARQL results response")?;
        match parser {
            ReaderQueryResultsParserOutput::Solutions(solutions) => Ok(solutions
                .collect::<Result<Vec<_>, _>>()
                .context("invalid SPARQL results response")?),
            ReaderQueryResultsParserOutput::Boolean(_) => Err(QueryEngineError::new(
                anyhow::anyhow!("endpoint returned an ASK result instead of solutions"),
            )),
        }
    }
}
