use sparesults::QueryResultsParseError;

/// An error raised while reshaping query solutions into a tree.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// The SPARQL results document could not be parsed.
    #[error(transparent)]
    Parse(#[from] QueryResultsParseError),
    /// The document holds an ASK result instead of solutions.
    #[error("ASK results cannot be reshaped into a tree")]
    NotASolutionSet,
    /// A variable path contradicts the shape established by another
    /// variable (leaf where a subtree exists, or vice versa).
    #[error("Variable path '{0}' conflicts with an existing value")]
    ConflictingPath(String),
}
