/// An error raised while parsing a JSON-LD context.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// The context value is structurally invalid.
    #[error("Invalid JSON-LD context: {0}")]
    Invalid(String),
    /// A remote context document could not be fetched or decoded.
    #[error("Failed to load remote context from '{url}'")]
    Load {
        /// The URL of the remote context.
        url: String,
        /// The underlying HTTP or decoding error.
        #[source]
        source: reqwest::Error,
    },
    /// Remote contexts or term definitions reference each other in a cycle.
    #[error("Cyclic context reference while resolving '{0}'")]
    Cyclic(String),
    /// The base IRI is invalid.
    #[error("Invalid base IRI '{iri}': {source}")]
    InvalidBaseIri {
        /// The IRI itself.
        iri: String,
        /// The parsing error.
        #[source]
        source: oxiri::IriParseError,
    },
}
