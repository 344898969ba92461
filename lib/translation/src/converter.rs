use crate::error::TranslationError;
use crate::query::GraphQlQuery;
use crate::SingularizeVariables;
use apollo_compiler::ast;
use graphql_ld_context::ParsedJsonLdContext;
use oxrdf::vocab::{rdf, xsd};
use serde_json::{Map as JsonMap, Value as JsonValue};
use spargebra::algebra::{Expression, GraphPattern};
use spargebra::term::{
    BlankNode, Literal, NamedNode, NamedNodePattern, TermPattern, TriplePattern, Variable,
};
use spargebra::Query;
use std::borrow::Cow;
use std::collections::HashMap;

/// Joins result paths the same way the tree converter splits them.
const PATH_DELIMITER: char = '_';

/// Bounds fragment spread nesting.
const MAX_FRAGMENT_DEPTH: usize = 32;

/// Configuration of a [`GraphQlToSparqlConverter`].
#[derive(Debug, Clone, Default)]
pub struct ConverterConfig {
    /// Fail on field names the context cannot expand instead of treating them
    /// as IRIs directly.
    pub require_context: bool,
}

/// Options for a single conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Bindings for GraphQL variables referenced by the query, as JSON
    /// values. Scalars are converted to RDF literals during translation.
    pub variables: JsonMap<String, JsonValue>,
}

/// The output of a conversion: the SPARQL algebra expression and the paths
/// that singularization directives marked as singular.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    /// The translated query.
    pub query: Query,
    /// Result paths to collapse to a single value, keyed by
    /// delimiter-joined path (the root path is the empty string).
    pub singularize_variables: SingularizeVariables,
}

/// Converts GraphQL queries into SPARQL algebra, interpreting field names
/// through a JSON-LD context.
///
/// Every selected field becomes a triple pattern whose object variable is
/// named by the `_`-joined path of the field, so that the resulting flat
/// bindings can be reassembled into the original selection shape.
///
/// ```
/// use graphql_ld_context::{ContextParser, ContextParserOptions, JsonLdContextSource};
/// use graphql_ld_translation::{ConvertOptions, ConverterConfig, GraphQlToSparqlConverter};
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let source = JsonLdContextSource::from(json!({
///     "ex": "http://example.org/",
///     "label": "ex:label",
/// }));
/// let context = ContextParser::new()
///     .parse(&source, &ContextParserOptions::default())
///     .await?;
///
/// let converter = GraphQlToSparqlConverter::new(ConverterConfig::default());
/// let translation = converter.graphql_to_sparql_algebra(
///     "{ label }",
///     &context,
///     &ConvertOptions::default(),
/// )?;
/// assert!(matches!(translation.query, spargebra::Query::Select { .. }));
/// assert!(translation.singularize_variables.is_empty());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// # }).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphQlToSparqlConverter {
    config: ConverterConfig,
}

impl GraphQlToSparqlConverter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Translates `query` into SPARQL algebra plus a singularization map.
    ///
    /// The first operation definition of the document is translated; it must
    /// be a query operation.
    pub fn graphql_to_sparql_algebra(
        &self,
        query: impl Into<GraphQlQuery>,
        context: &ParsedJsonLdContext,
        options: &ConvertOptions,
    ) -> Result<Translation, TranslationError> {
        let document = query.into().into_document()?;

        let operation = document
            .definitions
            .iter()
            .find_map(|definition| match definition {
                ast::Definition::OperationDefinition(operation) => Some(operation),
                _ => None,
            })
            .ok_or(TranslationError::NoOperation)?;
        if operation.operation_type != ast::OperationType::Query {
            let kind = match operation.operation_type {
                ast::OperationType::Query => "query",
                ast::OperationType::Mutation => "mutation",
                ast::OperationType::Subscription => "subscription",
            };
            return Err(TranslationError::UnsupportedOperation(kind.to_owned()));
        }

        let fragments: HashMap<&str, &ast::FragmentDefinition> = document
            .definitions
            .iter()
            .filter_map(|definition| match definition {
                ast::Definition::FragmentDefinition(fragment) => {
                    Some((fragment.name.as_str(), fragment.as_ref()))
                }
                _ => None,
            })
            .collect();

        let mut state = ConvertState {
            context,
            config: &self.config,
            variables: &options.variables,
            fragments,
            singularize: SingularizeVariables::new(),
            projection: Vec::new(),
            active_fragments: Vec::new(),
        };

        // Singularization on the operation itself covers the root path, and
        // with `scope: all` every descendant.
        let mut inherited = None;
        if let Some(directive) = singularize_directive(&operation.directives) {
            if directive.single {
                state.singularize.insert(String::new(), true);
            }
            if directive.scope_all {
                inherited = Some(directive.single);
            }
        }

        // A top-level `id` field names the root subject; otherwise the root
        // is an anonymous node.
        let subject = match state.find_id_key(&operation.selection_set, 0)? {
            Some(key) => TermPattern::Variable(Variable::new_unchecked(key)),
            None => TermPattern::BlankNode(BlankNode::new_unchecked("b0")),
        };

        let pattern =
            state.convert_selection_set(&operation.selection_set, &subject, "", inherited)?;
        let pattern = GraphPattern::Project {
            inner: Box::new(pattern),
            variables: state.projection,
        };

        Ok(Translation {
            query: Query::Select {
                dataset: None,
                pattern,
                base_iri: None,
            },
            singularize_variables: state.singularize,
        })
    }
}

/// Per-conversion state: the resolved context, variable bindings, fragment
/// table and the accumulating outputs.
struct ConvertState<'a> {
    context: &'a ParsedJsonLdContext,
    config: &'a ConverterConfig,
    variables: &'a JsonMap<String, JsonValue>,
    fragments: HashMap<&'a str, &'a ast::FragmentDefinition>,
    singularize: SingularizeVariables,
    projection: Vec<Variable>,
    active_fragments: Vec<&'a str>,
}

/// Patterns collected while walking one selection set level.
#[derive(Default)]
struct Level {
    triples: Vec<TriplePattern>,
    children: Vec<GraphPattern>,
    optionals: Vec<GraphPattern>,
    extends: Vec<(Variable, Variable)>,
}

impl<'a> ConvertState<'a> {
    fn convert_selection_set(
        &mut self,
        selections: &'a [ast::Selection],
        subject: &TermPattern,
        path: &str,
        inherited: Option<bool>,
    ) -> Result<GraphPattern, TranslationError> {
        let mut level = Level::default();
        self.collect_level(selections, subject, path, inherited, &mut level)?;

        let mut pattern = GraphPattern::Bgp {
            patterns: level.triples,
        };
        for child in level.children {
            pattern = flatten_join(pattern, child);
        }
        for (variable, source) in level.extends {
            pattern = GraphPattern::Extend {
                inner: Box::new(pattern),
                variable,
                expression: Expression::Variable(source),
            };
        }
        for optional in level.optionals {
            pattern = GraphPattern::LeftJoin {
                left: Box::new(pattern),
                right: Box::new(optional),
                expression: None,
            };
        }
        Ok(pattern)
    }

    fn collect_level(
        &mut self,
        selections: &'a [ast::Selection],
        subject: &TermPattern,
        path: &str,
        inherited: Option<bool>,
        level: &mut Level,
    ) -> Result<(), TranslationError> {
        for selection in selections {
            match selection {
                ast::Selection::Field(field) => {
                    self.convert_field(field, subject, path, inherited, level)?;
                }
                ast::Selection::InlineFragment(fragment) => {
                    if self.is_skipped(&fragment.directives)? {
                        continue;
                    }
                    if let Some(condition) = &fragment.type_condition {
                        self.push_type_constraint(condition.as_str(), subject, level);
                    }
                    self.collect_level(
                        &fragment.selection_set,
                        subject,
                        path,
                        inherited,
                        level,
                    )?;
                }
                ast::Selection::FragmentSpread(spread) => {
                    if self.is_skipped(&spread.directives)? {
                        continue;
                    }
                    let name = spread.fragment_name.as_str();
                    let fragment = self
                        .fragments
                        .get(name)
                        .copied()
                        .ok_or_else(|| TranslationError::UnknownFragment(name.to_owned()))?;
                    if self.active_fragments.contains(&name)
                        || self.active_fragments.len() >= MAX_FRAGMENT_DEPTH
                    {
                        return Err(TranslationError::InvalidGraphQl(format!(
                            "cyclic fragment spread '{name}'"
                        )));
                    }
                    self.push_type_constraint(fragment.type_condition.as_str(), subject, level);
                    self.active_fragments.push(name);
                    let result = self.collect_level(
                        &fragment.selection_set,
                        subject,
                        path,
                        inherited,
                        level,
                    );
                    self.active_fragments.pop();
                    result?;
                }
            }
        }
        Ok(())
    }

    fn convert_field(
        &mut self,
        field: &'a ast::Field,
        subject: &TermPattern,
        parent_path: &str,
        inherited: Option<bool>,
        level: &mut Level,
    ) -> Result<(), TranslationError> {
        if self.is_skipped(&field.directives)? {
            return Ok(());
        }

        let key = field.alias.as_ref().unwrap_or(&field.name).as_str();
        let path = join_path(parent_path, key);
        let variable = Variable::new_unchecked(path.as_str());

        let own = singularize_directive(&field.directives);
        let effective = own.as_ref().map(|directive| directive.single).or(inherited);
        if effective == Some(true) {
            self.singularize.insert(path.clone(), true);
        }
        let child_inherited = match &own {
            Some(directive) if directive.scope_all => Some(directive.single),
            _ => inherited,
        };

        // `id` selects the subject itself rather than a property of it.
        if field.name.as_str() == "id" && field.selection_set.is_empty() {
            match subject {
                TermPattern::Variable(existing) if *existing == variable => {}
                TermPattern::Variable(existing) => {
                    level.extends.push((variable.clone(), existing.clone()));
                }
                _ => {}
            }
            self.project(variable);
            return Ok(());
        }

        let predicate = self.expand_to_named_node(field.name.as_str())?;
        let reverse = self
            .context
            .term_definition(field.name.as_str())
            .is_some_and(|definition| definition.reverse);

        let object = TermPattern::Variable(variable.clone());
        let connecting = if reverse {
            TriplePattern {
                subject: object,
                predicate: NamedNodePattern::NamedNode(predicate),
                object: subject.clone(),
            }
        } else {
            TriplePattern {
                subject: subject.clone(),
                predicate: NamedNodePattern::NamedNode(predicate),
                object,
            }
        };

        let mut field_triples = vec![connecting];
        for argument in &field.arguments {
            let predicate = self.expand_to_named_node(argument.name.as_str())?;
            let object = self.value_to_term(argument.name.as_str(), &argument.value)?;
            field_triples.push(TriplePattern {
                subject: TermPattern::Variable(variable.clone()),
                predicate: NamedNodePattern::NamedNode(predicate),
                object,
            });
        }

        let optional = field
            .directives
            .iter()
            .any(|directive| directive.name.as_str() == "optional");

        if field.selection_set.is_empty() {
            self.project(variable);
            if optional {
                level.optionals.push(GraphPattern::Bgp {
                    patterns: field_triples,
                });
            } else {
                level.triples.extend(field_triples);
            }
        } else {
            let child = self.convert_selection_set(
                &field.selection_set,
                &TermPattern::Variable(variable),
                &path,
                child_inherited,
            )?;
            if optional {
                level.optionals.push(flatten_join(
                    GraphPattern::Bgp {
                        patterns: field_triples,
                    },
                    child,
                ));
            } else {
                level.triples.extend(field_triples);
                level.children.push(child);
            }
        }
        Ok(())
    }

    /// A type condition becomes an `rdf:type` constraint when the context
    /// gives the type name a meaning; otherwise it is ignored.
    fn push_type_constraint(
        &mut self,
        type_name: &str,
        subject: &TermPattern,
        level: &mut Level,
    ) {
        let Some(expanded) = self.context.expand_term(type_name) else {
            return;
        };
        let Ok(class) = NamedNode::new(expanded.into_owned()) else {
            return;
        };
        level.triples.push(TriplePattern {
            subject: subject.clone(),
            predicate: NamedNodePattern::NamedNode(rdf::TYPE.into_owned()),
            object: TermPattern::NamedNode(class),
        });
    }

    /// Looks for an `id` field (through fragments, not into sub-selections)
    /// whose key then names the subject variable of this level.
    fn find_id_key(
        &self,
        selections: &'a [ast::Selection],
        depth: usize,
    ) -> Result<Option<String>, TranslationError> {
        if depth >= MAX_FRAGMENT_DEPTH {
            return Ok(None);
        }
        for selection in selections {
            match selection {
                ast::Selection::Field(field)
                    if field.name.as_str() == "id" && field.selection_set.is_empty() =>
                {
                    let key = field.alias.as_ref().unwrap_or(&field.name).as_str();
                    return Ok(Some(key.to_owned()));
                }
                ast::Selection::Field(_) => {}
                ast::Selection::InlineFragment(fragment) => {
                    if let Some(key) = self.find_id_key(&fragment.selection_set, depth + 1)? {
                        return Ok(Some(key));
                    }
                }
                ast::Selection::FragmentSpread(spread) => {
                    if let Some(fragment) =
                        self.fragments.get(spread.fragment_name.as_str()).copied()
                    {
                        if let Some(key) =
                            self.find_id_key(&fragment.selection_set, depth + 1)?
                        {
                            return Ok(Some(key));
                        }
                    }
                }
            }
        }
        Ok(None)
    }

    fn expand_to_named_node(&self, name: &str) -> Result<NamedNode, TranslationError> {
        let expanded = match self.context.expand_term(name) {
            Some(iri) => iri,
            None if self.config.require_context => {
                return Err(TranslationError::MissingContextEntry(name.to_owned()));
            }
            None => Cow::Borrowed(name),
        };
        let resolved = self.context.resolve_relative(expanded.as_ref());
        NamedNode::new(resolved.into_owned()).map_err(|source| TranslationError::InvalidIri {
            term: name.to_owned(),
            source,
        })
    }

    fn value_to_term(
        &self,
        argument: &str,
        value: &ast::Value,
    ) -> Result<TermPattern, TranslationError> {
        Ok(match value {
            ast::Value::Variable(name) => {
                let bound = self.variables.get(name.as_str()).ok_or_else(|| {
                    TranslationError::UndefinedVariable(name.as_str().to_owned())
                })?;
                json_to_term(name.as_str(), bound)?
            }
            ast::Value::String(text) => {
                TermPattern::Literal(Literal::new_simple_literal(text.as_str()))
            }
            ast::Value::Int(value) => TermPattern::Literal(Literal::new_typed_literal(
                value.to_string(),
                xsd::INTEGER,
            )),
            ast::Value::Float(value) => TermPattern::Literal(Literal::new_typed_literal(
                value.to_string(),
                xsd::DOUBLE,
            )),
            ast::Value::Boolean(value) => TermPattern::Literal(Literal::from(*value)),
            ast::Value::Enum(name) => {
                TermPattern::NamedNode(self.expand_to_named_node(name.as_str())?)
            }
            ast::Value::Null | ast::Value::List(_) | ast::Value::Object(_) => {
                return Err(TranslationError::UnsupportedArgumentValue(
                    argument.to_owned(),
                ));
            }
        })
    }

    /// Evaluates `@skip`/`@include` against the variable bindings.
    fn is_skipped(&self, directives: &ast::DirectiveList) -> Result<bool, TranslationError> {
        for directive in directives.iter() {
            let negate = match directive.name.as_str() {
                "skip" => false,
                "include" => true,
                _ => continue,
            };
            let argument = directive
                .arguments
                .iter()
                .find(|argument| argument.name.as_str() == "if")
                .ok_or_else(|| {
                    TranslationError::InvalidCondition(format!(
                        "@{} requires an 'if' argument",
                        directive.name
                    ))
                })?;
            let condition = match argument.value.as_ref() {
                ast::Value::Boolean(value) => *value,
                ast::Value::Variable(name) => match self.variables.get(name.as_str()) {
                    Some(JsonValue::Bool(value)) => *value,
                    Some(_) => {
                        return Err(TranslationError::InvalidCondition(format!(
                            "variable '${name}' must be bound to a boolean"
                        )));
                    }
                    None => {
                        return Err(TranslationError::UndefinedVariable(
                            name.as_str().to_owned(),
                        ));
                    }
                },
                _ => {
                    return Err(TranslationError::InvalidCondition(format!(
                        "'if' of @{} must be a boolean or a boolean variable",
                        directive.name
                    )));
                }
            };
            let skipped = if negate { !condition } else { condition };
            if skipped {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn project(&mut self, variable: Variable) {
        if !self.projection.contains(&variable) {
            self.projection.push(variable);
        }
    }
}

/// Merges adjacent basic graph patterns instead of introducing joins.
fn flatten_join(left: GraphPattern, right: GraphPattern) -> GraphPattern {
    match (left, right) {
        (
            GraphPattern::Bgp { patterns: mut left },
            GraphPattern::Bgp { patterns: right },
        ) => {
            left.extend(right);
            GraphPattern::Bgp { patterns: left }
        }
        (left, right) => GraphPattern::Join {
            left: Box::new(left),
            right: Box::new(right),
        },
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_owned()
    } else {
        format!("{parent}{PATH_DELIMITER}{key}")
    }
}

fn json_to_term(name: &str, value: &JsonValue) -> Result<TermPattern, TranslationError> {
    Ok(match value {
        JsonValue::String(text) => TermPattern::Literal(Literal::new_simple_literal(text)),
        JsonValue::Bool(value) => TermPattern::Literal(Literal::from(*value)),
        JsonValue::Number(number) if number.is_i64() || number.is_u64() => {
            TermPattern::Literal(Literal::new_typed_literal(number.to_string(), xsd::INTEGER))
        }
        JsonValue::Number(number) => {
            TermPattern::Literal(Literal::new_typed_literal(number.to_string(), xsd::DOUBLE))
        }
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => {
            return Err(TranslationError::UnsupportedVariableValue(name.to_owned()));
        }
    })
}

struct Singularize {
    single: bool,
    scope_all: bool,
}

fn singularize_directive(directives: &ast::DirectiveList) -> Option<Singularize> {
    for directive in directives.iter() {
        let single = match directive.name.as_str() {
            "single" => true,
            "plural" => false,
            _ => continue,
        };
        let scope_all = directive.arguments.iter().any(|argument| {
            argument.name.as_str() == "scope"
                && match argument.value.as_ref() {
                    ast::Value::Enum(value) => value.as_str() == "all",
                    ast::Value::String(value) => value.as_str() == "all",
                    _ => false,
                }
        });
        return Some(Singularize { single, scope_all });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_ld_context::{ContextParser, ContextParserOptions, JsonLdContextSource};
    use serde_json::json;

    async fn books_context() -> ParsedJsonLdContext {
        ContextParser::new()
            .parse(
                &JsonLdContextSource::from(json!({
                    "author": "ex:author",
                    "books": "ex:books",
                    "ex": "http://example.org/",
                    "name": "ex:name",
                })),
                &ContextParserOptions::default(),
            )
            .await
            .unwrap()
    }

    fn converter() -> GraphQlToSparqlConverter {
        GraphQlToSparqlConverter::new(ConverterConfig {
            require_context: true,
        })
    }

    fn ex(local: &str) -> NamedNodePattern {
        NamedNodePattern::NamedNode(NamedNode::new_unchecked(format!(
            "http://example.org/{local}"
        )))
    }

    fn var(name: &str) -> Variable {
        Variable::new_unchecked(name)
    }

    fn triple(subject: TermPattern, predicate: NamedNodePattern, object: TermPattern) -> TriplePattern {
        TriplePattern {
            subject,
            predicate,
            object,
        }
    }

    #[tokio::test]
    async fn converts_nested_selections_to_a_bgp() {
        let context = books_context().await;
        let translation = converter()
            .graphql_to_sparql_algebra(
                "{ books { name author { name } } }",
                &context,
                &ConvertOptions::default(),
            )
            .unwrap();

        let root = TermPattern::BlankNode(BlankNode::new_unchecked("b0"));
        let expected = Query::Select {
            dataset: None,
            base_iri: None,
            pattern: GraphPattern::Project {
                inner: Box::new(GraphPattern::Bgp {
                    patterns: vec![
                        triple(root, ex("books"), TermPattern::Variable(var("books"))),
                        triple(
                            TermPattern::Variable(var("books")),
                            ex("name"),
                            TermPattern::Variable(var("books_name")),
                        ),
                        triple(
                            TermPattern::Variable(var("books")),
                            ex("author"),
                            TermPattern::Variable(var("books_author")),
                        ),
                        triple(
                            TermPattern::Variable(var("books_author")),
                            ex("name"),
                            TermPattern::Variable(var("books_author_name")),
                        ),
                    ],
                }),
                variables: vec![var("books_name"), var("books_author_name")],
            },
        };
        assert_eq!(translation.query, expected);
        assert!(translation.singularize_variables.is_empty());
    }

    #[tokio::test]
    async fn string_and_parsed_queries_translate_identically() {
        let context = books_context().await;
        let source = "{ books { name author { name } } }";
        let document = ast::Document::parse(source, "query.graphql").unwrap();

        let from_string = converter()
            .graphql_to_sparql_algebra(source, &context, &ConvertOptions::default())
            .unwrap();
        let from_document = converter()
            .graphql_to_sparql_algebra(document, &context, &ConvertOptions::default())
            .unwrap();
        assert_eq!(from_string, from_document);
    }

    #[tokio::test]
    async fn operation_scope_all_singularizes_every_path() {
        let context = books_context().await;
        let translation = converter()
            .graphql_to_sparql_algebra(
                "query @single(scope: all) { books { name author { name } } }",
                &context,
                &ConvertOptions::default(),
            )
            .unwrap();

        let expected: SingularizeVariables = [
            ("", true),
            ("books", true),
            ("books_name", true),
            ("books_author", true),
            ("books_author_name", true),
        ]
        .into_iter()
        .map(|(path, single)| (path.to_owned(), single))
        .collect();
        assert_eq!(translation.singularize_variables, expected);
    }

    #[tokio::test]
    async fn field_level_single_marks_only_its_path() {
        let context = books_context().await;
        let translation = converter()
            .graphql_to_sparql_algebra(
                "{ books { name @single author { name } } }",
                &context,
                &ConvertOptions::default(),
            )
            .unwrap();

        let expected: SingularizeVariables =
            [("books_name".to_owned(), true)].into_iter().collect();
        assert_eq!(translation.singularize_variables, expected);
    }

    #[tokio::test]
    async fn plural_overrides_an_inherited_single() {
        let context = books_context().await;
        let translation = converter()
            .graphql_to_sparql_algebra(
                "query @single(scope: all) { books { name @plural } }",
                &context,
                &ConvertOptions::default(),
            )
            .unwrap();

        assert_eq!(
            translation.singularize_variables.get("books_name"),
            None,
            "a plural field must not be marked singular"
        );
        assert_eq!(translation.singularize_variables.get("books"), Some(&true));
    }

    #[tokio::test]
    async fn missing_context_entries_are_an_error() {
        let context = books_context().await;
        let error = converter()
            .graphql_to_sparql_algebra("{ unknown }", &context, &ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(
            error,
            TranslationError::MissingContextEntry(name) if name == "unknown"
        ));
    }

    #[tokio::test]
    async fn aliases_rename_paths_but_not_predicates() {
        let context = books_context().await;
        let translation = converter()
            .graphql_to_sparql_algebra(
                "{ myBooks: books { name } }",
                &context,
                &ConvertOptions::default(),
            )
            .unwrap();

        let root = TermPattern::BlankNode(BlankNode::new_unchecked("b0"));
        let Query::Select { pattern, .. } = translation.query else {
            panic!("expected a select query");
        };
        let GraphPattern::Project { inner, variables } = pattern else {
            panic!("expected a projection");
        };
        assert_eq!(variables, vec![var("myBooks_name")]);
        assert_eq!(
            *inner,
            GraphPattern::Bgp {
                patterns: vec![
                    triple(root, ex("books"), TermPattern::Variable(var("myBooks"))),
                    triple(
                        TermPattern::Variable(var("myBooks")),
                        ex("name"),
                        TermPattern::Variable(var("myBooks_name")),
                    ),
                ],
            }
        );
    }

    #[tokio::test]
    async fn arguments_become_value_constraints() {
        let context = books_context().await;
        let translation = converter()
            .graphql_to_sparql_algebra(
                r#"{ books(name: "Book 1") { author { name } } }"#,
                &context,
                &ConvertOptions::default(),
            )
            .unwrap();

        let Query::Select {
            pattern: GraphPattern::Project { inner, .. },
            ..
        } = translation.query
        else {
            panic!("expected a projected select query");
        };
        let GraphPattern::Bgp { patterns } = *inner else {
            panic!("expected a flat bgp");
        };
        assert!(patterns.contains(&triple(
            TermPattern::Variable(var("books")),
            ex("name"),
            TermPattern::Literal(Literal::new_simple_literal("Book 1")),
        )));
    }

    #[tokio::test]
    async fn variables_substitute_into_argument_values() {
        let context = books_context().await;
        let mut options = ConvertOptions::default();
        options
            .variables
            .insert("wanted".to_owned(), json!("Book 2"));
        let translation = converter()
            .graphql_to_sparql_algebra(
                "query($wanted: String) { books(name: $wanted) { name } }",
                &context,
                &options,
            )
            .unwrap();

        let Query::Select {
            pattern: GraphPattern::Project { inner, .. },
            ..
        } = translation.query
        else {
            panic!("expected a projected select query");
        };
        let GraphPattern::Bgp { patterns } = *inner else {
            panic!("expected a flat bgp");
        };
        assert!(patterns.contains(&triple(
            TermPattern::Variable(var("books")),
            ex("name"),
            TermPattern::Literal(Literal::new_simple_literal("Book 2")),
        )));
    }

    #[tokio::test]
    async fn unbound_variables_are_an_error() {
        let context = books_context().await;
        let error = converter()
            .graphql_to_sparql_algebra(
                "query($wanted: String) { books(name: $wanted) { name } }",
                &context,
                &ConvertOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(
            error,
            TranslationError::UndefinedVariable(name) if name == "wanted"
        ));
    }

    #[tokio::test]
    async fn skip_and_include_drop_fields_at_conversion_time() {
        let context = books_context().await;
        let mut options = ConvertOptions::default();
        options.variables.insert("wanted".to_owned(), json!(false));
        let translation = converter()
            .graphql_to_sparql_algebra(
                "query($wanted: Boolean) { books { name @skip(if: true) author @include(if: $wanted) { name } } }",
                &context,
                &options,
            )
            .unwrap();

        let Query::Select {
            pattern: GraphPattern::Project { variables, .. },
            ..
        } = translation.query
        else {
            panic!("expected a projected select query");
        };
        assert!(variables.is_empty(), "all leaves were skipped");
    }

    #[tokio::test]
    async fn optional_fields_become_left_joins() {
        let context = books_context().await;
        let translation = converter()
            .graphql_to_sparql_algebra(
                "{ books { name author @optional { name } } }",
                &context,
                &ConvertOptions::default(),
            )
            .unwrap();

        let Query::Select {
            pattern: GraphPattern::Project { inner, .. },
            ..
        } = translation.query
        else {
            panic!("expected a projected select query");
        };
        let GraphPattern::Join { right, .. } = *inner else {
            panic!("expected the books subtree joined below the root triple");
        };
        assert!(
            matches!(*right, GraphPattern::LeftJoin { expression: None, .. }),
            "optional subtree must be a bare left join"
        );
    }

    #[tokio::test]
    async fn id_fields_bind_the_subject() {
        let context = books_context().await;
        let translation = converter()
            .graphql_to_sparql_algebra(
                "{ id books { name } }",
                &context,
                &ConvertOptions::default(),
            )
            .unwrap();

        let Query::Select {
            pattern: GraphPattern::Project { inner, variables },
            ..
        } = translation.query
        else {
            panic!("expected a projected select query");
        };
        assert_eq!(variables, vec![var("id"), var("books_name")]);
        let GraphPattern::Bgp { patterns } = *inner else {
            panic!("expected a flat bgp");
        };
        assert_eq!(
            patterns[0],
            triple(
                TermPattern::Variable(var("id")),
                ex("books"),
                TermPattern::Variable(var("books")),
            )
        );
    }

    #[tokio::test]
    async fn fragment_spreads_expand_in_place() {
        let context = books_context().await;
        let translation = converter()
            .graphql_to_sparql_algebra(
                "{ books { ...bookFields } } fragment bookFields on Book { name }",
                &context,
                &ConvertOptions::default(),
            )
            .unwrap();

        let Query::Select {
            pattern: GraphPattern::Project { variables, .. },
            ..
        } = translation.query
        else {
            panic!("expected a projected select query");
        };
        assert_eq!(variables, vec![var("books_name")]);
    }

    #[tokio::test]
    async fn reverse_terms_swap_subject_and_object() {
        let context = ContextParser::new()
            .parse(
                &JsonLdContextSource::from(json!({
                    "ex": "http://example.org/",
                    "writings": { "@reverse": "ex:author" },
                    "name": "ex:name",
                })),
                &ContextParserOptions::default(),
            )
            .await
            .unwrap();
        let translation = converter()
            .graphql_to_sparql_algebra(
                "{ writings { name } }",
                &context,
                &ConvertOptions::default(),
            )
            .unwrap();

        let Query::Select {
            pattern: GraphPattern::Project { inner, .. },
            ..
        } = translation.query
        else {
            panic!("expected a projected select query");
        };
        let GraphPattern::Bgp { patterns } = *inner else {
            panic!("expected a flat bgp");
        };
        assert_eq!(
            patterns[0],
            triple(
                TermPattern::Variable(var("writings")),
                ex("author"),
                TermPattern::BlankNode(BlankNode::new_unchecked("b0")),
            )
        );
    }

    #[tokio::test]
    async fn mutations_are_rejected() {
        let context = books_context().await;
        let error = converter()
            .graphql_to_sparql_algebra(
                "mutation { books { name } }",
                &context,
                &ConvertOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(error, TranslationError::UnsupportedOperation(_)));
    }

    #[tokio::test]
    async fn syntax_errors_are_reported() {
        let context = books_context().await;
        let error = converter()
            .graphql_to_sparql_algebra("{ books {", &context, &ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(error, TranslationError::InvalidGraphQl(_)));
    }
}
