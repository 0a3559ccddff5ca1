use thiserror::Error;

/// Failure taxonomy for parsing and model assembly.
///
/// All variants are terminal for the current parse call; retry (for example
/// re-issuing the network request) is a decision for the calling layer.
#[derive(Error, Debug)]
pub enum FmError {
    #[error("did not receive an XML document from the server")]
    EmptyDocument,

    #[error("XML error: {message} at line {line}")]
    MalformedXml { message: String, line: u64 },

    /// The document is well-formed but the embedded `error` element reports a
    /// non-zero code. This is how the server reports application-level
    /// failures such as "record not found".
    #[error("FileMaker Server returned error code {0}")]
    ServerError(i32),

    #[error("server version {found} is older than the minimum supported version {required}")]
    UnsupportedServerVersion { found: String, required: String },

    #[error("attempt to read results before parsing a document")]
    NotYetParsed,

    #[error("this parser instance has already consumed a document")]
    AlreadyParsed,

    #[error("field '{0}' not found")]
    FieldNotFound(String),

    #[error("related set '{0}' not found")]
    RelatedSetNotFound(String),

    /// Assembly was requested on a document that never carried the named
    /// head metadata. Counts are never silently defaulted.
    #[error("document is missing required metadata: {0}")]
    MissingMetadata(String),

    #[error("attribute '{attribute}' on <{element}> is not a valid number: '{value}'")]
    InvalidNumber {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
}
