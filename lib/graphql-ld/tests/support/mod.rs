use graphql_ld::{QueryEngine, QueryEngineError};
use serde_json::Value as JsonValue;
use sparesults::QuerySolution;
use spargebra::term::{Literal, Term, Variable};
use spargebra::Query;
use std::sync::Mutex;

/// A query engine returning a fixed solution table regardless of the query,
/// recording every invocation for assertions.
#[derive(Debug)]
pub struct QueryEngineMock {
    variables: Vec<Variable>,
    rows: Vec<Vec<Option<Term>>>,
    calls: Mutex<Vec<(Query, Option<JsonValue>)>>,
}

impl QueryEngineMock {
    pub fn new(variables: &[&str], rows: Vec<Vec<Option<Term>>>) -> Self {
        Self {
            variables: variables
                .iter()
                .map(|name| Variable::new_unchecked(*name))
                .collect(),
            rows,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The fixed books/authors table the original test suite uses.
    pub fn books() -> Self {
        let rows = (1..=3)
            .map(|row| {
                vec![
                    Some(Term::from(Literal::new_simple_literal(format!(
                        "Book {row}"
                    )))),
                    Some(Term::from(Literal::new_simple_literal(format!(
                        "Person {row}"
                    )))),
                ]
            })
            .collect();
        Self::new(&["books_name", "books_author_name"], rows)
    }

    pub fn calls(&self) -> Vec<(Query, Option<JsonValue>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl QueryEngine for QueryEngineMock {
    async fn query(
        &self,
        algebra: &Query,
        options: Option<&JsonValue>,
    ) -> Result<Vec<QuerySolution>, QueryEngineError> {
        self.calls
            .lock()
            .unwrap()
            .push((algebra.clone(), options.cloned()));
        Ok(self
            .rows
            .iter()
            .map(|row| QuerySolution::from((self.variables.clone(), row.clone())))
            .collect())
    }
}

/// A query engine that rejects every query.
pub struct FailingEngine;

#[async_trait::async_trait]
impl QueryEngine for FailingEngine {
    async fn query(
        &self,
        _algebra: &Query,
        _options: Option<&JsonValue>,
    ) -> Result<Vec<QuerySolution>, QueryEngineError> {
        Err(QueryEngineError::new(anyhow::anyhow!(
            "the endpoint is on fire"
        )))
    }
}
