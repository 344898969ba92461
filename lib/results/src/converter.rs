use crate::error::TreeError;
use crate::SingularizeVariables;
use oxrdf::Term;
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use sparesults::{
    QueryResultsFormat, QueryResultsParser, QuerySolution, ReaderQueryResultsParserOutput,
};
use std::io::Read;

/// Configuration of a [`SparqlResultsToTreeConverter`].
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// The string separating path segments in variable names.
    pub delimiter: String,
    /// Emit raw JSON values for RDF terms (IRI string, literal lexical form,
    /// blank node label) instead of `{"termType": ..., "value": ...}`
    /// objects.
    pub materialize_terms: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            delimiter: "_".to_owned(),
            materialize_terms: true,
        }
    }
}

/// Reshapes flat SPARQL query solutions into a nested JSON tree.
///
/// Merging works per path: a plural inner node is a one-element array
/// holding the object all rows merge into, a plural leaf accumulates one
/// value per row, and singular paths keep the first value seen. The root
/// follows the same rule under the empty path, so an unsingularized result
/// is a one-element array around the merged tree.
#[derive(Debug, Clone, Default)]
pub struct SparqlResultsToTreeConverter {
    config: ConverterConfig,
}

impl SparqlResultsToTreeConverter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Reshapes already materialized query solutions into a tree.
    pub fn solutions_to_tree(
        &self,
        solutions: &[QuerySolution],
        singularize: &SingularizeVariables,
    ) -> Result<JsonValue, TreeError> {
        let mut root = JsonMap::new();
        let mut any_binding = false;
        for solution in solutions {
            for (variable, term) in solution.iter() {
                any_binding = true;
                let segments: Vec<&str> = variable
                    .as_str()
                    .split(self.config.delimiter.as_str())
                    .collect();
                self.add_term(&mut root, &segments, 0, "", term, singularize)?;
            }
        }

        if is_singular(singularize, "") {
            Ok(JsonValue::Object(root))
        } else if any_binding {
            Ok(JsonValue::Array(vec![JsonValue::Object(root)]))
        } else {
            Ok(JsonValue::Array(Vec::new()))
        }
    }

    /// Parses a SPARQL results JSON document and reshapes its solutions.
    ///
    /// Boolean (ASK) documents are rejected.
    pub fn sparql_json_to_tree(
        &self,
        reader: impl Read,
        singularize: &SingularizeVariables,
    ) -> Result<JsonValue, TreeError> {
        let parser =
            QueryResultsParser::from_format(QueryResultsFormat::Json).for_reader(reader)?;
        match parser {
            ReaderQueryResultsParserOutput::Solutions(solutions) => {
                let solutions = solutions.collect::<Result<Vec<_>, _>>()?;
                self.solutions_to_tree(&solutions, singularize)
            }
            ReaderQueryResultsParserOutput::Boolean(_) => Err(TreeError::NotASolutionSet),
        }
    }

    fn add_term(
        &self,
        node: &mut JsonMap<String, JsonValue>,
        segments: &[&str],
        index: usize,
        path: &str,
        term: &Term,
        singularize: &SingularizeVariables,
    ) -> Result<(), TreeError> {
        let key = segments[index];
        let child_path = if path.is_empty() {
            key.to_owned()
        } else {
            format!("{path}{}{key}", self.config.delimiter)
        };
        let singular = is_singular(singularize, &child_path);

        if index == segments.len() - 1 {
            let value = self.term_to_json(term);
            if singular {
                // First value wins.
                node.entry(key).or_insert(value);
            } else {
                match node
                    .entry(key)
                    .or_insert_with(|| JsonValue::Array(Vec::new()))
                {
                    JsonValue::Array(values) => values.push(value),
                    _ => return Err(TreeError::ConflictingPath(child_path)),
                }
            }
            return Ok(());
        }

        let child = if singular {
            match node
                .entry(key)
                .or_insert_with(|| JsonValue::Object(JsonMap::new()))
            {
                JsonValue::Object(map) => map,
                _ => return Err(TreeError::ConflictingPath(child_path)),
            }
        } else {
            // All rows merge into the single element of the array.
            let entry = node.entry(key).or_insert_with(|| {
                JsonValue::Array(vec![JsonValue::Object(JsonMap::new())])
            });
            match entry {
                JsonValue::Array(items) => match items.first_mut() {
                    Some(JsonValue::Object(map)) => map,
                    _ => return Err(TreeError::ConflictingPath(child_path)),
                },
                _ => return Err(TreeError::ConflictingPath(child_path)),
            }
        };
        self.add_term(child, segments, index + 1, &child_path, term, singularize)
    }

    fn term_to_json(&self, term: &Term) -> JsonValue {
        if self.config.materialize_terms {
            match term {
                Term::NamedNode(node) => JsonValue::String(node.as_str().to_owned()),
                Term::BlankNode(node) => JsonValue::String(node.as_str().to_owned()),
                Term::Literal(literal) => JsonValue::String(literal.value().to_owned()),
            }
        } else {
            match term {
                Term::NamedNode(node) => json!({
                    "termType": "NamedNode",
                    "value": node.as_str(),
                }),
                Term::BlankNode(node) => json!({
                    "termType": "BlankNode",
                    "value": node.as_str(),
                }),
                Term::Literal(literal) => {
                    let mut object = JsonMap::new();
                    object.insert("termType".to_owned(), json!("Literal"));
                    object.insert("value".to_owned(), json!(literal.value()));
                    if let Some(language) = literal.language() {
                        object.insert("language".to_owned(), json!(language));
                    }
                    object.insert(
                        "datatype".to_owned(),
                        json!({
                            "termType": "NamedNode",
                            "value": literal.datatype().as_str(),
                        }),
                    );
                    JsonValue::Object(object)
                }
            }
        }
    }
}

fn is_singular(singularize: &SingularizeVariables, path: &str) -> bool {
    singularize.get(path).copied().unwrap_or(false)
}
