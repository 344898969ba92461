use oxiri::IriParseError;

/// An error raised while translating a GraphQL query into SPARQL algebra.
#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    /// The query text could not be parsed as GraphQL.
    #[error("Invalid GraphQL query: {0}")]
    InvalidGraphQl(String),
    /// The document contains no operation definition.
    #[error("The GraphQL document contains no operation definition")]
    NoOperation,
    /// Only query operations can be translated.
    #[error("Unsupported GraphQL operation type '{0}'")]
    UnsupportedOperation(String),
    /// A field name has no mapping in the JSON-LD context.
    #[error("The JSON-LD context does not expand field '{0}'")]
    MissingContextEntry(String),
    /// A field name expanded to something that is not a valid IRI.
    #[error("Field '{term}' does not expand to a valid IRI")]
    InvalidIri {
        /// The field or argument name as written in the query.
        term: String,
        /// The IRI parsing error.
        #[source]
        source: IriParseError,
    },
    /// A GraphQL variable is referenced but not bound.
    #[error("Undefined GraphQL variable '${0}'")]
    UndefinedVariable(String),
    /// A bound variable value cannot be converted to an RDF term.
    #[error("Unsupported value for variable '${0}': only scalars convert to RDF terms")]
    UnsupportedVariableValue(String),
    /// An argument value cannot be converted to an RDF term.
    #[error("Unsupported value for argument '{0}'")]
    UnsupportedArgumentValue(String),
    /// A fragment spread references an undefined fragment.
    #[error("Unknown fragment '{0}'")]
    UnknownFragment(String),
    /// An `@skip`/`@include` condition is not a boolean.
    #[error("Invalid @skip/@include condition: {0}")]
    InvalidCondition(String),
}
