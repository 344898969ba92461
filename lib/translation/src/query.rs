use crate::error::TranslationError;
use apollo_compiler::ast;

/// A GraphQL query as accepted by the converter: raw source text or an
/// already parsed document.
#[derive(Debug, Clone)]
pub enum GraphQlQuery {
    /// Raw GraphQL source text, parsed lazily during conversion.
    Source(String),
    /// A parsed GraphQL document.
    Document(ast::Document),
}

impl GraphQlQuery {
    pub(crate) fn into_document(self) -> Result<ast::Document, TranslationError> {
        match self {
            Self::Source(text) => ast::Document::parse(text, "query.graphql")
                .map_err(|errors| TranslationError::InvalidGraphQl(errors.to_string())),
            Self::Document(document) => Ok(document),
        }
    }
}

impl From<&str> for GraphQlQuery {
    fn from(text: &str) -> Self {
        Self::Source(text.to_owned())
    }
}

impl From<String> for GraphQlQuery {
    fn from(text: String) -> Self {
        Self::Source(text)
    }
}

impl From<ast::Document> for GraphQlQuery {
    fn from(document: ast::Document) -> Self {
        Self::Document(document)
    }
}
