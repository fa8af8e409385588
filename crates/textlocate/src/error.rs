use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextLocateError {
    #[error("Malformed query: {0}")]
    Malformed(#[from] MalformedInput),
    #[error("Gazetteer access error: {0}")]
    Access(#[from] crate::access::AccessError),
    #[error("Init logging error: {0}")]
    InitLogging(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Input problems the caller can fix before retrying.
///
/// These are the only errors a well-formed deployment should ever see;
/// everything else signals broken reference data or a failing backend.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedInput {
    #[error("query text is empty")]
    EmptyQuery,
    #[error("no preferred languages supplied")]
    NoLanguages,
}

pub type Result<T> = std::result::Result<T, TextLocateError>;
